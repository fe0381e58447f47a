use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use serde::Deserialize;

use crate::error::{FetchError, FetchResult};
use crate::models::{DownloadRequest, ProgressiveStream, VideoInfo};

/// Resolves video metadata and writes streams to disk.
pub trait VideoSource {
    fn fetch_info(&self, url: &str) -> FetchResult<VideoInfo>;

    /// Blocks until the stream is written into `request.destination`.
    /// Returns the path of the saved file.
    fn download(&self, request: &DownloadRequest, stream: &ProgressiveStream) -> FetchResult<PathBuf>;
}

/// `yt-dlp` driven as a subprocess.
pub struct YtDlpSource {
    binary: Option<PathBuf>,
}

impl YtDlpSource {
    pub fn new(binary: Option<PathBuf>) -> Self {
        Self { binary }
    }

    fn command(&self) -> FetchResult<Command> {
        let binary = match &self.binary {
            Some(path) => path.clone(),
            None => which::which("yt-dlp").map_err(|_| FetchError::BackendMissing)?,
        };
        let mut command = Command::new(binary);
        command.stdout(Stdio::piped()).stderr(Stdio::piped());
        Ok(command)
    }

    fn run(mut command: Command) -> FetchResult<Output> {
        log::debug!("running {:?}", command);
        let output = command.output().map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => FetchError::BackendMissing,
            _ => FetchError::Spawn(e),
        })?;

        if output.status.success() {
            Ok(output)
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(classify_failure(&stderr, output.status))
        }
    }
}

impl VideoSource for YtDlpSource {
    fn fetch_info(&self, url: &str) -> FetchResult<VideoInfo> {
        let url = url.trim();
        if url.is_empty() {
            return Err(FetchError::EmptyUrl);
        }

        let mut command = self.command()?;
        command
            .arg("-J")
            .arg("--no-playlist")
            .arg("--no-warnings")
            .arg(url);

        let output = Self::run(command)?;
        parse_info(&output.stdout)
    }

    fn download(&self, request: &DownloadRequest, stream: &ProgressiveStream) -> FetchResult<PathBuf> {
        let mut command = self.command()?;
        command
            .arg("--no-playlist")
            .arg("--no-warnings")
            .arg("--no-progress")
            .arg("-f")
            .arg(&stream.format_id)
            .arg("-P")
            .arg(&request.destination)
            .arg("-o")
            .arg("%(title)s.%(ext)s")
            .arg("--print")
            .arg("after_move:filepath")
            .arg(request.url.trim());

        let output = Self::run(command)?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        let saved = stdout
            .lines()
            .rev()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| guess_output_path(&request.destination, stream));
        Ok(saved)
    }
}

fn guess_output_path(destination: &Path, stream: &ProgressiveStream) -> PathBuf {
    destination.join(format!("video.{}", stream.ext))
}

/// Maps a failed yt-dlp run onto the error taxonomy.
pub fn classify_failure(stderr: &str, status: std::process::ExitStatus) -> FetchError {
    if stderr.contains("HTTP Error 410") {
        return FetchError::Gone;
    }

    let message = stderr
        .lines()
        .rev()
        .map(str::trim)
        .find(|line| line.starts_with("ERROR:"))
        .or_else(|| stderr.lines().rev().map(str::trim).find(|l| !l.is_empty()))
        .map(|line| line.trim_start_matches("ERROR:").trim().to_string())
        .unwrap_or_else(|| format!("yt-dlp exited with {}", status));
    FetchError::Backend(message)
}

#[derive(Debug, Deserialize)]
struct RawInfo {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    uploader: Option<String>,
    #[serde(default)]
    channel: Option<String>,
    #[serde(default)]
    duration: Option<f64>,
    #[serde(default)]
    thumbnail: Option<String>,
    #[serde(default)]
    formats: Vec<RawFormat>,
}

#[derive(Debug, Deserialize)]
struct RawFormat {
    format_id: String,
    #[serde(default)]
    vcodec: Option<String>,
    #[serde(default)]
    acodec: Option<String>,
    #[serde(default)]
    height: Option<u32>,
    #[serde(default)]
    format_note: Option<String>,
    #[serde(default)]
    filesize: Option<u64>,
    #[serde(default)]
    filesize_approx: Option<u64>,
    #[serde(default)]
    ext: Option<String>,
}

impl RawFormat {
    fn is_progressive(&self) -> bool {
        let present = |codec: &Option<String>| matches!(codec.as_deref(), Some(c) if c != "none");
        present(&self.vcodec) && present(&self.acodec)
    }

    fn resolution(&self) -> Option<String> {
        match self.height {
            Some(height) => Some(format!("{}p", height)),
            None => self.format_note.clone().filter(|note| !note.is_empty()),
        }
    }
}

/// Parses `yt-dlp -J` output, keeping only progressive formats in source order.
pub fn parse_info(json: &[u8]) -> FetchResult<VideoInfo> {
    let raw: RawInfo = serde_json::from_slice(json)?;

    let streams = raw
        .formats
        .into_iter()
        .filter(RawFormat::is_progressive)
        .filter_map(|format| {
            let resolution = format.resolution()?;
            Some(ProgressiveStream {
                resolution,
                filesize: format.filesize.or(format.filesize_approx),
                ext: format.ext.unwrap_or_else(|| "mp4".to_string()),
                format_id: format.format_id,
            })
        })
        .collect();

    Ok(VideoInfo {
        title: raw.title.unwrap_or_default(),
        author: raw.uploader.or(raw.channel).unwrap_or_default(),
        length_secs: raw.duration.map(|d| d.max(0.0) as u64).unwrap_or(0),
        thumbnail_url: raw.thumbnail,
        streams,
    })
}
