use eframe::egui::ColorImage;
use std::path::PathBuf;

/// A single file carrying both audio and video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressiveStream {
    pub format_id: String,
    pub resolution: String,
    pub filesize: Option<u64>,
    pub ext: String,
}

/// Metadata returned by a video lookup.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VideoInfo {
    pub title: String,
    pub author: String,
    pub length_secs: u64,
    pub thumbnail_url: Option<String>,
    pub streams: Vec<ProgressiveStream>,
}

impl VideoInfo {
    /// Distinct resolution labels in source order.
    pub fn quality_labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = Vec::with_capacity(self.streams.len());
        for stream in &self.streams {
            if !labels.contains(&stream.resolution) {
                labels.push(stream.resolution.clone());
            }
        }
        labels
    }

    pub fn stream_for(&self, quality: &str) -> Option<&ProgressiveStream> {
        self.streams.iter().find(|s| s.resolution == quality)
    }
}

/// Result of a successful preview refresh. Replaced wholesale on every refresh.
#[derive(Clone)]
pub struct PreviewResult {
    pub url: String,
    pub info: VideoInfo,
    pub qualities: Vec<String>,
    pub thumbnail: Option<ColorImage>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub url: String,
    pub quality: String,
    pub destination: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusKind {
    #[default]
    Info,
    Success,
    Error,
}

/// Visible widget values.
#[derive(Default)]
pub struct AppState {
    pub url: String,
    pub download_dir: String,
    pub status: String,
    pub status_kind: StatusKind,
    pub title_text: String,
    pub author_text: String,
    pub duration_text: String,
    pub file_size_text: String,
    pub qualities: Vec<String>,
    pub selected_quality: Option<String>,
    pub preview: Option<PreviewResult>,
    pub output_path: Option<PathBuf>,
}
