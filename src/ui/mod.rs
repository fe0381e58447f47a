use eframe::egui::{self, RichText, Stroke};
use rfd::FileDialog;
use std::path::{Path, PathBuf};

use crate::localizations::Localizations;
use crate::models::{AppState, StatusKind};
use crate::theme::*;

/// What the user did during one frame. Handlers run after the frame is laid out.
#[derive(Debug, Default)]
pub struct UiEvents {
    pub url_changed: bool,
    pub quality_selected: Option<String>,
    pub choose_path: bool,
    pub download: bool,
    pub thumbnail_clicked: bool,
}

pub fn render_main(
    ui: &mut egui::Ui,
    state: &mut AppState,
    localizer: &Localizations,
    thumbnail: Option<&egui::TextureHandle>,
) -> UiEvents {
    let mut events = UiEvents::default();

    ui.vertical_centered(|ui| {
        ui.heading(RichText::new(localizer.text("app-title")).color(MAIN_TEXT));
        ui.add_space(16.0);

        events.url_changed = render_url_input(ui, state, localizer).changed();
        ui.add_space(8.0);

        render_preview_labels(ui, state);
        ui.add_space(8.0);

        events.quality_selected = render_quality_selector(ui, state, localizer);
        ui.label(RichText::new(&state.file_size_text).color(MAIN_TEXT));
        ui.add_space(8.0);

        events.thumbnail_clicked = render_thumbnail(ui, thumbnail, localizer);
        ui.add_space(8.0);

        events.choose_path = render_download_dir_selector(ui, state, localizer);
        ui.add_space(12.0);

        events.download = primary_button(ui, &localizer.text("download-button"));
        ui.add_space(8.0);

        render_status(ui, state, localizer);

        ui.with_layout(egui::Layout::bottom_up(egui::Align::Center), |ui| {
            ui.label(RichText::new(localizer.text("footer")).color(SECONDARY_TEXT).small());
        });
    });

    events
}

pub fn render_url_input(ui: &mut egui::Ui, state: &mut AppState, localizer: &Localizations) -> egui::Response {
    ui.label(RichText::new(localizer.text("url-label")).color(MAIN_TEXT));

    egui::Frame::none()
        .fill(INPUT_BG)
        .stroke(Stroke::new(1.0, BORDER_COLOR))
        .rounding(ROUNDING_FRAME)
        .show(ui, |ui| {
            ui.add_sized(
                [INPUT_WIDTH, 28.0],
                egui::TextEdit::singleline(&mut state.url)
                    .hint_text(localizer.text("url-placeholder"))
                    .text_color(MAIN_TEXT)
                    .frame(false),
            )
        })
        .inner
}

fn render_preview_labels(ui: &mut egui::Ui, state: &AppState) {
    for text in [&state.title_text, &state.author_text, &state.duration_text] {
        ui.label(RichText::new(text).color(MAIN_TEXT));
    }
}

/// Returns the newly picked label, if the user changed it this frame.
pub fn render_quality_selector(
    ui: &mut egui::Ui,
    state: &AppState,
    localizer: &Localizations,
) -> Option<String> {
    let mut picked = None;

    ui.label(RichText::new(localizer.text("quality-label")).color(MAIN_TEXT));
    ui.add_enabled_ui(!state.qualities.is_empty(), |ui| {
        egui::ComboBox::from_id_source("quality")
            .selected_text(state.selected_quality.clone().unwrap_or_default())
            .width(160.0)
            .show_ui(ui, |ui| {
                for quality in &state.qualities {
                    let selected = state.selected_quality.as_ref() == Some(quality);
                    if ui.selectable_label(selected, quality).clicked() && !selected {
                        picked = Some(quality.clone());
                    }
                }
            });
    });

    picked
}

/// Returns true when the thumbnail was clicked.
pub fn render_thumbnail(
    ui: &mut egui::Ui,
    thumbnail: Option<&egui::TextureHandle>,
    localizer: &Localizations,
) -> bool {
    match thumbnail {
        Some(texture) => {
            let image = egui::Image::from_texture(egui::load::SizedTexture::new(
                texture.id(),
                THUMBNAIL_SIZE,
            ));
            ui.add(image)
                .interact(egui::Sense::click())
                .on_hover_cursor(egui::CursorIcon::PointingHand)
                .on_hover_text(localizer.text("thumbnail-hint"))
                .clicked()
        }
        None => {
            ui.allocate_exact_size(THUMBNAIL_SIZE, egui::Sense::hover());
            false
        }
    }
}

/// Returns true when "Choose Path" was pressed.
pub fn render_download_dir_selector(
    ui: &mut egui::Ui,
    state: &mut AppState,
    localizer: &Localizations,
) -> bool {
    ui.label(RichText::new(localizer.text("download-path-label")).color(MAIN_TEXT));

    egui::Frame::none()
        .fill(INPUT_BG)
        .stroke(Stroke::new(1.0, BORDER_COLOR))
        .rounding(ROUNDING_FRAME)
        .show(ui, |ui| {
            ui.add_sized(
                [INPUT_WIDTH, 28.0],
                egui::TextEdit::singleline(&mut state.download_dir)
                    .hint_text(localizer.text("download-path-placeholder"))
                    .text_color(MAIN_TEXT)
                    .frame(false),
            );
        });

    ui.add_space(4.0);
    primary_button(ui, &localizer.text("choose-path-button"))
}

/// Native folder picker, opened next to the current destination.
/// `None` when the dialog is cancelled.
pub fn pick_folder(current: &str) -> Option<PathBuf> {
    let current = Path::new(current);
    let start = if current.is_dir() {
        current
    } else {
        current.parent().unwrap_or_else(|| Path::new("."))
    };
    FileDialog::new().set_directory(start).pick_folder()
}

fn primary_button(ui: &mut egui::Ui, text: &str) -> bool {
    let button = egui::Button::new(
        RichText::new(text)
            .size(BUTTON_FONT_SIZE)
            .color(BUTTON_MAIN_TEXT),
    )
    .min_size(MIN_SIZE_BUTTON)
    .fill(PRIMARY_BUTTON_BG)
    .rounding(ROUNDING_BUTTON)
    .stroke(Stroke::new(1.0, BORDER_COLOR));

    ui.add(button).clicked()
}

pub fn render_status(ui: &mut egui::Ui, state: &AppState, localizer: &Localizations) {
    let color = match state.status_kind {
        StatusKind::Info => SECONDARY_TEXT,
        StatusKind::Success => TEXT_SUCCESS,
        StatusKind::Error => TEXT_ERROR,
    };
    ui.label(RichText::new(&state.status).color(color));

    if let Some(path) = &state.output_path {
        ui.label(
            RichText::new(format!("{}{}", localizer.text("saved-to"), path.display()))
                .color(SECONDARY_TEXT),
        );
    }
}
