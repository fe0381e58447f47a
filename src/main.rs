use anyhow::anyhow;
use eframe::egui;

mod app;
mod config;
mod download;
mod error;
mod localizations;
mod models;
mod session;
mod theme;
mod thumbnail;
mod ui;

use app::PreviewApp;
use config::Settings;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = Settings::from_env();
    log::info!(
        "starting with download dir {:?}, language {}, debounce {:?}",
        settings.download_dir,
        settings.language,
        settings.debounce
    );

    let app = PreviewApp::new(&settings)?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([600.0, 550.0])
            .with_min_inner_size([480.0, 500.0])
            .with_title("YouTube Video Downloader"),
        ..Default::default()
    };

    eframe::run_native(
        "YouTube Video Downloader",
        options,
        Box::new(|cc| {
            cc.egui_ctx.set_visuals(egui::Visuals::dark());
            Box::new(app)
        }),
    )
    .map_err(|e| anyhow!("failed to open the main window: {}", e))
}
