use thiserror::Error;

/// Everything that can go wrong while previewing or downloading a video.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The remote answered `410 Gone`; the video was removed.
    #[error("video not found (HTTP 410 Gone)")]
    Gone,
    #[error("HTTP Error: {status}")]
    Http { status: reqwest::StatusCode },
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
    #[error("{0}")]
    Backend(String),
    #[error("yt-dlp not found. Please install yt-dlp and make sure it's in your PATH.")]
    BackendMissing,
    #[error("failed to run yt-dlp: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("unexpected yt-dlp output: {0}")]
    Json(#[from] serde_json::Error),
    #[error("could not decode thumbnail: {0}")]
    Image(#[from] image::ImageError),
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("no URL provided")]
    EmptyUrl,
    #[error("no quality selected")]
    NoQualitySelected,
    #[error("quality {0} is not available for this video")]
    QualityUnavailable(String),
}

impl FetchError {
    pub fn is_gone(&self) -> bool {
        match self {
            Self::Gone => true,
            Self::Http { status } => *status == reqwest::StatusCode::GONE,
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::GONE),
            _ => false,
        }
    }
}

pub type FetchResult<T> = Result<T, FetchError>;
