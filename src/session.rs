use std::path::PathBuf;

use crate::download::VideoSource;
use crate::error::{FetchError, FetchResult};
use crate::localizations::Localizations;
use crate::models::{AppState, DownloadRequest, PreviewResult, StatusKind};
use crate::thumbnail::ThumbnailSource;

/// One interactive session: the visible state plus the backends the handlers talk to.
/// Every handler runs to completion on the caller's thread.
pub struct Session<S, T> {
    pub state: AppState,
    source: S,
    thumbnails: T,
    localizer: Localizations,
}

/// `HH:MM:SS`, hours not wrapped at 24.
pub fn format_duration(total_secs: u64) -> String {
    let (hours, remainder) = (total_secs / 3600, total_secs % 3600);
    let (minutes, seconds) = (remainder / 60, remainder % 60);
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

pub fn bytes_to_megabytes(bytes: u64) -> f64 {
    bytes as f64 / (1024.0 * 1024.0)
}

/// File-size label for `quality` in `preview`.
pub fn file_size_text(
    preview: &PreviewResult,
    quality: &str,
    localizer: &Localizations,
) -> FetchResult<String> {
    let stream = preview
        .info
        .stream_for(quality)
        .ok_or_else(|| FetchError::QualityUnavailable(quality.to_string()))?;
    Ok(size_label(stream.filesize, localizer))
}

fn size_label(filesize: Option<u64>, localizer: &Localizations) -> String {
    let prefix = localizer.text("file-size-prefix");
    match filesize {
        Some(bytes) => format!("{}{:.2} MB", prefix, bytes_to_megabytes(bytes)),
        None => format!("{}{}", prefix, localizer.text("file-size-unknown")),
    }
}

/// Looks the URL up and fetches its thumbnail. Nothing is kept on failure.
pub fn build_preview<S, T>(source: &S, thumbnails: &T, url: &str) -> FetchResult<PreviewResult>
where
    S: VideoSource + ?Sized,
    T: ThumbnailSource + ?Sized,
{
    let info = source.fetch_info(url)?;
    let qualities = info.quality_labels();
    let thumbnail = match &info.thumbnail_url {
        Some(thumbnail_url) => Some(thumbnails.fetch(thumbnail_url)?),
        None => None,
    };

    Ok(PreviewResult {
        url: url.to_string(),
        info,
        qualities,
        thumbnail,
    })
}

impl<S: VideoSource, T: ThumbnailSource> Session<S, T> {
    pub fn new(source: S, thumbnails: T, localizer: Localizations, download_dir: String) -> Self {
        let mut session = Self {
            state: AppState {
                download_dir,
                ..Default::default()
            },
            source,
            thumbnails,
            localizer,
        };
        session.clear_preview_fields();
        session
    }

    /// Widget state for editing alongside the strings to label it with.
    pub fn parts_mut(&mut self) -> (&mut AppState, &Localizations) {
        (&mut self.state, &self.localizer)
    }

    /// Re-runs the preview for whatever is in the URL field.
    pub fn refresh_preview(&mut self) {
        let url = self.state.url.clone();
        log::info!("refreshing preview for {:?}", url);

        match build_preview(&self.source, &self.thumbnails, &url) {
            Ok(preview) => self.apply_preview(preview),
            Err(e) => {
                log::warn!("preview failed for {:?}: {}", url, e);
                self.clear_preview_fields();
                let message = if e.is_gone() {
                    self.localizer.text("status-video-gone")
                } else {
                    self.error_message(&e)
                };
                self.set_status(StatusKind::Error, message);
            }
        }
    }

    fn apply_preview(&mut self, preview: PreviewResult) {
        let l = &self.localizer;
        self.state.title_text = format!("{}{}", l.text("title-prefix"), preview.info.title);
        self.state.author_text = format!("{}{}", l.text("author-prefix"), preview.info.author);
        self.state.duration_text = format!(
            "{}{}",
            l.text("duration-prefix"),
            format_duration(preview.info.length_secs)
        );
        self.state.file_size_text = l.text("file-size-prefix");

        log::info!(
            "previewed {:?} with {} progressive qualities",
            preview.info.title,
            preview.qualities.len()
        );
        self.state.qualities = preview.qualities.clone();
        self.state.selected_quality = None;
        let first = preview.qualities.first().cloned();
        self.state.preview = Some(preview);

        let seeded = match first {
            Some(quality) => self.select_quality(&quality),
            None => true,
        };
        if seeded {
            let message = self.localizer.text("status-preview-updated");
            self.set_status(StatusKind::Success, message);
        }
    }

    fn clear_preview_fields(&mut self) {
        let l = &self.localizer;
        self.state.title_text = l.text("title-prefix");
        self.state.author_text = l.text("author-prefix");
        self.state.duration_text = l.text("duration-prefix");
        self.state.file_size_text = l.text("file-size-prefix");
        self.state.qualities.clear();
        self.state.selected_quality = None;
        self.state.preview = None;
    }

    /// Called whenever the quality control changes, and once after every successful preview.
    /// Labels outside the current preview's list leave the selection untouched.
    pub fn select_quality(&mut self, quality: &str) -> bool {
        let Some(preview) = &self.state.preview else {
            return false;
        };
        let result = if self.state.qualities.iter().any(|q| q == quality) {
            file_size_text(preview, quality, &self.localizer)
        } else {
            Err(FetchError::QualityUnavailable(quality.to_string()))
        };

        match result {
            Ok(text) => {
                self.state.file_size_text = text;
                self.state.selected_quality = Some(quality.to_string());
                true
            }
            Err(e) => {
                log::warn!("{}", e);
                let message = self.error_message(&e);
                self.set_status(StatusKind::Error, message);
                false
            }
        }
    }

    /// The URL text changed; whatever was previewed no longer describes it.
    pub fn url_edited(&mut self) {
        if self.state.preview.is_some() {
            self.clear_preview_fields();
        }
    }

    /// Result of the directory picker. `None` means the dialog was cancelled.
    pub fn choose_directory(&mut self, picked: Option<PathBuf>) {
        if let Some(path) = picked {
            self.state.download_dir = path.to_string_lossy().to_string();
        }
    }

    /// URL to open when the thumbnail is clicked.
    pub fn thumbnail_link(&self) -> Option<&str> {
        self.state
            .preview
            .as_ref()
            .map(|p| p.url.as_str())
            .filter(|url| !url.is_empty())
    }

    /// Blocking download of the selected quality into the destination field's directory.
    pub fn download(&mut self) {
        self.state.output_path = None;

        let result = self
            .download_request()
            .and_then(|request| self.run_download(&request));

        match result {
            Ok(path) => {
                log::info!("saved {}", path.display());
                self.state.output_path = Some(path);
                let message = self.localizer.text("status-download-complete");
                self.set_status(StatusKind::Success, message);
            }
            Err(e) => {
                log::warn!("download failed: {}", e);
                let message = self.error_message(&e);
                self.set_status(StatusKind::Error, message);
            }
        }
    }

    fn download_request(&self) -> FetchResult<DownloadRequest> {
        // A selection only counts for the URL it was previewed from.
        let previewed = self
            .state
            .preview
            .as_ref()
            .map_or(false, |p| p.url == self.state.url);
        let quality = self
            .state
            .selected_quality
            .clone()
            .filter(|_| previewed)
            .ok_or(FetchError::NoQualitySelected)?;

        let dir = self.state.download_dir.trim();
        let destination = if dir.is_empty() {
            std::env::current_dir()?
        } else {
            PathBuf::from(dir)
        };

        Ok(DownloadRequest {
            url: self.state.url.clone(),
            quality,
            destination,
        })
    }

    fn run_download(&mut self, request: &DownloadRequest) -> FetchResult<PathBuf> {
        log::info!(
            "downloading {:?} at {} into {}",
            request.url,
            request.quality,
            request.destination.display()
        );

        // Fresh lookup; the preview may be older than the remote data.
        let info = self.source.fetch_info(&request.url)?;
        let stream = info
            .stream_for(&request.quality)
            .ok_or_else(|| FetchError::QualityUnavailable(request.quality.clone()))?;
        self.state.file_size_text = size_label(stream.filesize, &self.localizer);

        if !request.destination.exists() {
            std::fs::create_dir_all(&request.destination)?;
        }
        self.source.download(request, stream)
    }

    fn error_message(&self, e: &FetchError) -> String {
        format!("{}{}", self.localizer.text("status-error-prefix"), e)
    }

    fn set_status(&mut self, kind: StatusKind, message: String) {
        self.state.status_kind = kind;
        self.state.status = message;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ProgressiveStream, VideoInfo};
    use eframe::egui::{Color32, ColorImage};
    use std::cell::RefCell;
    use std::collections::HashMap;
    use unic_langid::langid;

    enum Lookup {
        Found(VideoInfo),
        Gone,
        Fail(&'static str),
    }

    #[derive(Default)]
    struct FakeSource {
        videos: HashMap<String, Lookup>,
        download_error: Option<&'static str>,
        downloads: RefCell<Vec<(DownloadRequest, String)>>,
    }

    impl FakeSource {
        fn with(mut self, url: &str, lookup: Lookup) -> Self {
            self.videos.insert(url.to_string(), lookup);
            self
        }
    }

    impl VideoSource for FakeSource {
        fn fetch_info(&self, url: &str) -> FetchResult<VideoInfo> {
            match self.videos.get(url) {
                Some(Lookup::Found(info)) => Ok(info.clone()),
                Some(Lookup::Gone) => Err(FetchError::Gone),
                Some(Lookup::Fail(msg)) => Err(FetchError::Backend(msg.to_string())),
                None => Err(FetchError::Backend(format!("unsupported URL: {}", url))),
            }
        }

        fn download(
            &self,
            request: &DownloadRequest,
            stream: &ProgressiveStream,
        ) -> FetchResult<PathBuf> {
            self.downloads
                .borrow_mut()
                .push((request.clone(), stream.format_id.clone()));
            match self.download_error {
                Some(msg) => Err(FetchError::Backend(msg.to_string())),
                None => Ok(request.destination.join("clip.mp4")),
            }
        }
    }

    struct FakeThumbnails {
        gone: bool,
    }

    impl ThumbnailSource for FakeThumbnails {
        fn fetch(&self, _url: &str) -> FetchResult<ColorImage> {
            if self.gone {
                Err(FetchError::Http {
                    status: reqwest::StatusCode::GONE,
                })
            } else {
                Ok(ColorImage::new([160, 90], Color32::BLACK))
            }
        }
    }

    const URL: &str = "https://www.youtube.com/watch?v=abc";

    fn stream(id: &str, resolution: &str, size: Option<u64>) -> ProgressiveStream {
        ProgressiveStream {
            format_id: id.to_string(),
            resolution: resolution.to_string(),
            filesize: size,
            ext: "mp4".to_string(),
        }
    }

    fn video() -> VideoInfo {
        VideoInfo {
            title: "Big Buck Bunny".to_string(),
            author: "Blender".to_string(),
            length_secs: 3723,
            thumbnail_url: Some("https://i.ytimg.com/vi/abc/hq.jpg".to_string()),
            streams: vec![
                stream("22", "720p", Some(52_428_800)),
                stream("18", "360p", Some(1_572_864)),
                stream("17", "144p", None),
            ],
        }
    }

    fn session(source: FakeSource) -> Session<FakeSource, FakeThumbnails> {
        Session::new(
            source,
            FakeThumbnails { gone: false },
            Localizations::english(),
            "/tmp/ytdl-preview-tests".to_string(),
        )
    }

    fn previewed() -> Session<FakeSource, FakeThumbnails> {
        let mut s = session(FakeSource::default().with(URL, Lookup::Found(video())));
        s.state.url = URL.to_string();
        s.refresh_preview();
        s
    }

    fn assert_blank(state: &AppState) {
        assert_eq!(state.title_text, "Title: ");
        assert_eq!(state.author_text, "Author: ");
        assert_eq!(state.duration_text, "Duration: ");
        assert_eq!(state.file_size_text, "File Size: ");
        assert!(state.qualities.is_empty());
        assert!(state.selected_quality.is_none());
        assert!(state.preview.is_none());
    }

    #[test]
    fn durations_are_zero_padded() {
        assert_eq!(format_duration(0), "00:00:00");
        assert_eq!(format_duration(59), "00:00:59");
        assert_eq!(format_duration(3723), "01:02:03");
        assert_eq!(format_duration(100 * 3600 + 5), "100:00:05");
    }

    #[test]
    fn new_session_shows_blank_labels() {
        let s = session(FakeSource::default());
        assert_blank(&s.state);
        assert_eq!(s.state.download_dir, "/tmp/ytdl-preview-tests");
        assert!(s.state.status.is_empty());
    }

    #[test]
    fn preview_populates_fields_and_qualities() {
        let s = previewed();
        assert_eq!(s.state.title_text, "Title: Big Buck Bunny");
        assert_eq!(s.state.author_text, "Author: Blender");
        assert_eq!(s.state.duration_text, "Duration: 01:02:03");
        assert_eq!(s.state.qualities, ["720p", "360p", "144p"]);
        assert_eq!(s.state.selected_quality.as_deref(), Some("720p"));
        assert_eq!(s.state.file_size_text, "File Size: 50.00 MB");
        assert_eq!(s.state.status, "Link preview updated successfully!");
        assert_eq!(s.state.status_kind, StatusKind::Success);
        let preview = s.state.preview.as_ref().unwrap();
        assert_eq!(preview.thumbnail.as_ref().unwrap().size, [160, 90]);
    }

    #[test]
    fn duplicate_resolutions_are_listed_once() {
        let mut info = video();
        info.streams.insert(1, stream("59", "720p", Some(10)));
        let mut s = session(FakeSource::default().with(URL, Lookup::Found(info)));
        s.state.url = URL.to_string();
        s.refresh_preview();
        assert_eq!(s.state.qualities, ["720p", "360p", "144p"]);
        assert_eq!(s.state.file_size_text, "File Size: 50.00 MB");
    }

    #[test]
    fn switching_quality_updates_file_size() {
        let mut s = previewed();
        s.select_quality("360p");
        assert_eq!(s.state.file_size_text, "File Size: 1.50 MB");
        s.select_quality("144p");
        assert_eq!(s.state.file_size_text, "File Size: unknown");
        s.select_quality("720p");
        assert_eq!(s.state.file_size_text, "File Size: 50.00 MB");
    }

    #[test]
    fn unknown_quality_is_an_explicit_error() {
        let mut s = previewed();
        s.select_quality("360p");
        assert!(!s.select_quality("4320p"));
        assert_eq!(s.state.selected_quality.as_deref(), Some("360p"));
        assert_eq!(s.state.file_size_text, "File Size: 1.50 MB");
        assert_eq!(s.state.qualities, ["720p", "360p", "144p"]);
        assert_eq!(
            s.state.status,
            "An error occurred: quality 4320p is not available for this video"
        );
    }

    #[test]
    fn quality_without_preview_is_ignored() {
        let mut s = session(FakeSource::default());
        assert!(!s.select_quality("720p"));
        assert!(s.state.selected_quality.is_none());
        assert_eq!(s.state.file_size_text, "File Size: ");
    }

    #[test]
    fn gone_lookup_resets_fields() {
        let gone = "https://www.youtube.com/watch?v=removed";
        let mut s = previewed();
        *s.source_mut() = FakeSource::default().with(gone, Lookup::Gone);
        s.state.url = gone.to_string();
        s.refresh_preview();
        assert_blank(&s.state);
        assert!(s.state.status.contains("not found"));
        assert_eq!(s.state.status_kind, StatusKind::Error);
        assert_eq!(s.thumbnail_link(), None);
    }

    #[test]
    fn gone_thumbnail_is_reported_as_not_found() {
        let mut s = Session::new(
            FakeSource::default().with(URL, Lookup::Found(video())),
            FakeThumbnails { gone: true },
            Localizations::english(),
            String::new(),
        );
        s.state.url = URL.to_string();
        s.refresh_preview();
        assert_blank(&s.state);
        assert!(s.state.status.contains("not found"));
    }

    #[test]
    fn other_lookup_errors_are_echoed() {
        let mut s = session(FakeSource::default().with(URL, Lookup::Fail("regex_search: could not find match")));
        s.state.url = URL.to_string();
        s.refresh_preview();
        assert_blank(&s.state);
        assert_eq!(
            s.state.status,
            "An error occurred: regex_search: could not find match"
        );
    }

    #[test]
    fn thumbnail_link_requires_a_preview() {
        let s = session(FakeSource::default());
        assert_eq!(s.thumbnail_link(), None);

        let s = previewed();
        assert_eq!(s.thumbnail_link(), Some(URL));
    }

    #[test]
    fn cancelled_picker_keeps_destination() {
        let mut s = session(FakeSource::default());
        s.choose_directory(None);
        assert_eq!(s.state.download_dir, "/tmp/ytdl-preview-tests");

        s.choose_directory(Some(PathBuf::from("/home/me/Videos")));
        assert_eq!(s.state.download_dir, "/home/me/Videos");
    }

    #[test]
    fn download_writes_selected_stream() {
        let dir = std::env::temp_dir().join("ytdl-preview-session-download");
        let mut s = previewed();
        s.state.download_dir = dir.to_string_lossy().to_string();
        s.select_quality("360p");
        s.download();

        assert_eq!(s.state.status, "Download completed successfully!");
        assert_eq!(s.state.output_path, Some(dir.join("clip.mp4")));
        assert!(dir.is_dir());
        let downloads = s.source_mut().downloads.borrow().clone();
        assert_eq!(downloads.len(), 1);
        assert_eq!(downloads[0].0.quality, "360p");
        assert_eq!(downloads[0].0.destination, dir);
        assert_eq!(downloads[0].1, "18");
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn download_failure_reports_error() {
        let mut s = previewed();
        s.source_mut().download_error = Some("disk full");
        s.download();
        assert!(s.state.status.starts_with("An error occurred:"));
        assert!(s.state.status.ends_with("disk full"));
        assert_eq!(s.state.title_text, "Title: Big Buck Bunny");
    }

    #[test]
    fn download_without_preview_fails() {
        let mut s = session(FakeSource::default().with(URL, Lookup::Found(video())));
        s.state.url = URL.to_string();
        s.download();
        assert_eq!(s.state.status, "An error occurred: no quality selected");
        assert!(s.source_mut().downloads.borrow().is_empty());
    }

    #[test]
    fn edited_url_drops_previous_selection() {
        let other = "https://www.youtube.com/watch?v=other";
        let mut s = previewed();
        *s.source_mut() = FakeSource::default()
            .with(URL, Lookup::Found(video()))
            .with(other, Lookup::Found(video()));
        s.state.url = other.to_string();
        s.url_edited();
        assert_blank(&s.state);

        s.download();
        assert_eq!(s.state.status, "An error occurred: no quality selected");
        assert!(s.source_mut().downloads.borrow().is_empty());
    }

    #[test]
    fn selection_is_not_downloaded_against_a_different_url() {
        let other = "https://www.youtube.com/watch?v=other";
        let mut s = previewed();
        *s.source_mut() = FakeSource::default().with(other, Lookup::Found(video()));
        s.state.url = other.to_string();

        s.download();
        assert_eq!(s.state.status, "An error occurred: no quality selected");
        assert!(s.source_mut().downloads.borrow().is_empty());
    }

    #[test]
    fn status_messages_stay_english_under_spanish_locale() {
        let mut s = Session::new(
            FakeSource::default().with(URL, Lookup::Found(video())),
            FakeThumbnails { gone: false },
            Localizations::for_language(&langid!("es-ES")),
            std::env::temp_dir()
                .join("ytdl-preview-session-spanish")
                .to_string_lossy()
                .to_string(),
        );
        s.state.url = URL.to_string();
        s.refresh_preview();
        assert_eq!(s.state.status, "Link preview updated successfully!");
        assert_eq!(s.state.title_text, "Título: Big Buck Bunny");

        s.download();
        assert_eq!(s.state.status, "Download completed successfully!");

        s.source_mut().download_error = Some("disk full");
        s.download();
        assert!(s.state.status.starts_with("An error occurred:"));

        let gone = "https://www.youtube.com/watch?v=removed";
        *s.source_mut() = FakeSource::default().with(gone, Lookup::Gone);
        s.state.url = gone.to_string();
        s.refresh_preview();
        assert!(s.state.status.contains("not found"));
        let _ = std::fs::remove_dir_all(std::env::temp_dir().join("ytdl-preview-session-spanish"));
    }

    #[test]
    fn download_re_resolves_the_url() {
        let mut s = previewed();
        let mut changed = video();
        changed.streams.retain(|st| st.resolution != "720p");
        *s.source_mut() = FakeSource::default().with(URL, Lookup::Found(changed));
        s.download();
        assert_eq!(
            s.state.status,
            "An error occurred: quality 720p is not available for this video"
        );
    }

    impl<S, T> Session<S, T> {
        fn source_mut(&mut self) -> &mut S {
            &mut self.source
        }
    }
}
