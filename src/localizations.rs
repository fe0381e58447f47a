use std::collections::HashMap;

use unic_langid::LanguageIdentifier;

const FALLBACK_LANG: &str = "en-US";

type Table = HashMap<&'static str, &'static str>;

/// Status lines stay in English whatever the UI language.
const UNTRANSLATED: &[&str] = &[
    "status-preview-updated",
    "status-download-complete",
    "status-video-gone",
    "status-error-prefix",
];

pub struct Localizations {
    translations: HashMap<&'static str, Table>,
    current_lang: &'static str,
}

impl Default for Localizations {
    fn default() -> Self {
        Self::english()
    }
}

impl Localizations {
    pub fn english() -> Self {
        let mut translations = HashMap::new();

        let en = Table::from([
            ("app-title", "YouTube Video Downloader"),
            ("url-label", "Enter YouTube URL:"),
            ("url-placeholder", "Paste a video URL"),
            ("title-prefix", "Title: "),
            ("author-prefix", "Author: "),
            ("duration-prefix", "Duration: "),
            ("file-size-prefix", "File Size: "),
            ("file-size-unknown", "unknown"),
            ("quality-label", "Select Quality:"),
            ("download-path-label", "Download Path:"),
            ("download-path-placeholder", "Select download directory"),
            ("choose-path-button", "Choose Path"),
            ("download-button", "Download"),
            ("thumbnail-hint", "Click to open the video in your browser"),
            ("status-preview-updated", "Link preview updated successfully!"),
            ("status-download-complete", "Download completed successfully!"),
            ("status-video-gone", "Video not found. It may have been removed."),
            ("status-error-prefix", "An error occurred: "),
            ("saved-to", "Saved to: "),
            ("footer", "Built with eframe and yt-dlp"),
        ]);
        translations.insert("en-US", en);

        let es = Table::from([
            ("app-title", "Descargador de videos de YouTube"),
            ("url-label", "Ingrese la URL de YouTube:"),
            ("url-placeholder", "Pegue la URL de un video"),
            ("title-prefix", "Título: "),
            ("author-prefix", "Autor: "),
            ("duration-prefix", "Duración: "),
            ("file-size-prefix", "Tamaño: "),
            ("file-size-unknown", "desconocido"),
            ("quality-label", "Seleccione la calidad:"),
            ("download-path-label", "Carpeta de descarga:"),
            ("download-path-placeholder", "Seleccione la carpeta de descarga"),
            ("choose-path-button", "Elegir carpeta"),
            ("download-button", "Descargar"),
            ("thumbnail-hint", "Haga clic para abrir el video en el navegador"),
            ("saved-to", "Guardado en: "),
            ("footer", "Hecho con eframe y yt-dlp"),
        ]);
        translations.insert("es-ES", es);

        Self {
            translations,
            current_lang: FALLBACK_LANG,
        }
    }

    pub fn for_language(lang: &LanguageIdentifier) -> Self {
        let mut localizer = Self::english();
        localizer.select(lang);
        localizer
    }

    pub fn current_language(&self) -> &str {
        self.current_lang
    }

    pub fn lookup_single_language(&self, key: &str) -> Option<String> {
        let lang = if UNTRANSLATED.iter().any(|k| *k == key) {
            FALLBACK_LANG
        } else {
            self.current_lang
        };
        self.translations
            .get(lang)
            .and_then(|t| t.get(key).copied())
            .or_else(|| {
                // Fallback to English if the current language doesn't have the key
                self.translations
                    .get(FALLBACK_LANG)
                    .and_then(|t| t.get(key).copied())
            })
            .map(|s| s.to_string())
    }

    /// Like `lookup_single_language`, but a missing key renders as the key itself.
    pub fn text(&self, key: &str) -> String {
        self.lookup_single_language(key).unwrap_or_else(|| {
            log::warn!("missing translation for {}", key);
            key.to_string()
        })
    }

    /// Picks the table matching `lang` by exact tag, then by language subtag.
    /// Unknown languages fall back to English.
    pub fn select(&mut self, lang: &LanguageIdentifier) {
        let tag = lang.to_string();
        if let Some((&key, _)) = self.translations.get_key_value(tag.as_str()) {
            self.current_lang = key;
            return;
        }

        let language = lang.language.as_str();
        let matched = self
            .translations
            .keys()
            .copied()
            .find(|key| key.split('-').next() == Some(language));
        self.current_lang = matched.unwrap_or(FALLBACK_LANG);
    }
}
