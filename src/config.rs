use std::path::PathBuf;
use std::time::Duration;

use unic_langid::{langid, LanguageIdentifier};

pub const ENV_DOWNLOAD_DIR: &str = "YTDL_PREVIEW_DOWNLOAD_DIR";
pub const ENV_YTDLP: &str = "YTDL_PREVIEW_YTDLP";
pub const ENV_DEBOUNCE_MS: &str = "YTDL_PREVIEW_DEBOUNCE_MS";

/// Start-up settings. Nothing is persisted; every run re-reads the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub download_dir: String,
    /// Explicit yt-dlp binary. `None` means look it up on PATH.
    pub ytdlp_path: Option<PathBuf>,
    /// Quiet period before a URL edit triggers a preview. Zero refreshes on every edit.
    pub debounce: Duration,
    pub language: LanguageIdentifier,
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let download_dir = lookup(ENV_DOWNLOAD_DIR)
            .filter(|dir| !dir.trim().is_empty())
            .unwrap_or_else(default_download_dir);

        let ytdlp_path = lookup(ENV_YTDLP)
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        let debounce = match lookup(ENV_DEBOUNCE_MS) {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(ms) => Duration::from_millis(ms),
                Err(e) => {
                    log::warn!("ignoring {}={:?}: {}", ENV_DEBOUNCE_MS, raw, e);
                    Duration::ZERO
                }
            },
            None => Duration::ZERO,
        };

        let language = lookup("LANG")
            .and_then(|lang| parse_posix_locale(&lang))
            .unwrap_or_else(|| langid!("en-US"));

        Self {
            download_dir,
            ytdlp_path,
            debounce,
            language,
        }
    }
}

fn default_download_dir() -> String {
    dirs::download_dir()
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_default())
        .to_string_lossy()
        .to_string()
}

/// `es_ES.UTF-8` -> `es-ES`. Returns `None` for `C`, `POSIX` and garbage.
pub fn parse_posix_locale(raw: &str) -> Option<LanguageIdentifier> {
    let tag = raw.split(['.', '@']).next()?.replace('_', "-");
    if tag.is_empty() || tag == "C" || tag == "POSIX" {
        return None;
    }
    tag.parse::<LanguageIdentifier>().ok()
}
