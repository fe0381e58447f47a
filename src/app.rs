use eframe::egui;
use std::time::{Duration, Instant};

use crate::config::Settings;
use crate::download::YtDlpSource;
use crate::error::FetchResult;
use crate::localizations::Localizations;
use crate::session::Session;
use crate::theme::*;
use crate::thumbnail::HttpThumbnails;
use crate::ui;

/// Delays preview refreshes until the URL has been left alone for `delay`.
/// A zero delay fires on the same frame as the edit.
#[derive(Debug)]
pub struct Debounce {
    delay: Duration,
    pending_since: Option<Instant>,
}

impl Debounce {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending_since: None,
        }
    }

    pub fn edited(&mut self, now: Instant) {
        self.pending_since = Some(now);
    }

    /// True exactly once per burst of edits, after the quiet period.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.pending_since {
            Some(since) if now.saturating_duration_since(since) >= self.delay => {
                self.pending_since = None;
                true
            }
            _ => false,
        }
    }

    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.pending_since
            .map(|since| self.delay.saturating_sub(now.saturating_duration_since(since)))
    }
}

pub struct PreviewApp {
    session: Session<YtDlpSource, HttpThumbnails>,
    thumbnail: Option<egui::TextureHandle>,
    debounce: Debounce,
}

impl PreviewApp {
    pub fn new(settings: &Settings) -> FetchResult<Self> {
        let localizer = Localizations::for_language(&settings.language);
        log::info!("using {} strings", localizer.current_language());

        let session = Session::new(
            YtDlpSource::new(settings.ytdlp_path.clone()),
            HttpThumbnails::new()?,
            localizer,
            settings.download_dir.clone(),
        );

        Ok(Self {
            session,
            thumbnail: None,
            debounce: Debounce::new(settings.debounce),
        })
    }

    fn refresh_preview(&mut self, ctx: &egui::Context) {
        self.session.refresh_preview();
        self.thumbnail = self
            .session
            .state
            .preview
            .as_ref()
            .and_then(|preview| preview.thumbnail.clone())
            .map(|image| ctx.load_texture("thumbnail", image, egui::TextureOptions::LINEAR));
    }

    pub fn update_ui(&mut self, ctx: &egui::Context) {
        let now = Instant::now();
        let mut events = ui::UiEvents::default();

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(BACKGROUND).inner_margin(20.0))
            .show(ctx, |ui| {
                let (state, localizer) = self.session.parts_mut();
                events = ui::render_main(ui, state, localizer, self.thumbnail.as_ref());
            });

        if events.url_changed {
            self.session.url_edited();
            self.thumbnail = None;
            self.debounce.edited(now);
        }
        if self.debounce.poll(now) {
            self.refresh_preview(ctx);
        } else if let Some(wait) = self.debounce.remaining(now) {
            ctx.request_repaint_after(wait);
        }

        if let Some(quality) = events.quality_selected {
            self.session.select_quality(&quality);
        }

        if events.choose_path {
            let picked = ui::pick_folder(&self.session.state.download_dir);
            self.session.choose_directory(picked);
        }

        if events.thumbnail_clicked {
            if let Some(url) = self.session.thumbnail_link() {
                log::info!("opening {} in the browser", url);
                ctx.open_url(egui::OpenUrl::new_tab(url));
            }
        }

        if events.download {
            self.session.download();
        }
    }
}

impl eframe::App for PreviewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.update_ui(ctx);
    }
}
