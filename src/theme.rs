use eframe::egui::{self, Color32};

// Surfaces
pub const BACKGROUND: Color32 = Color32::from_rgb(0, 0, 0);
pub const INPUT_BG: Color32 = Color32::from_rgb(34, 34, 34);

// Text
pub const MAIN_TEXT: Color32 = Color32::from_rgb(255, 255, 255);
pub const SECONDARY_TEXT: Color32 = Color32::from_rgb(138, 138, 143);
pub const TEXT_ERROR: Color32 = Color32::from_rgb(255, 82, 82);
pub const TEXT_SUCCESS: Color32 = Color32::from_rgb(0, 200, 83);

// Buttons
pub const PRIMARY_BUTTON_BG: Color32 = Color32::from_rgb(211, 47, 47);
pub const BUTTON_MAIN_TEXT: Color32 = Color32::from_rgb(255, 255, 255);
pub const BORDER_COLOR: Color32 = Color32::from_rgb(60, 60, 67);

// Sizing & Spacing
pub const ROUNDING_FRAME: f32 = 2.0;
pub const ROUNDING_BUTTON: f32 = 6.0;
pub const MIN_SIZE_BUTTON: egui::Vec2 = egui::Vec2::new(120.0, 36.0);
pub const INPUT_WIDTH: f32 = 360.0;
pub const THUMBNAIL_SIZE: egui::Vec2 = egui::Vec2::new(160.0, 90.0);

pub const BUTTON_FONT_SIZE: f32 = 15.0;
