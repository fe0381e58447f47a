use eframe::egui::ColorImage;
use image::imageops::FilterType;

use crate::error::{FetchError, FetchResult};

pub const THUMBNAIL_WIDTH: u32 = 160;
pub const THUMBNAIL_HEIGHT: u32 = 90;

pub trait ThumbnailSource {
    fn fetch(&self, url: &str) -> FetchResult<ColorImage>;
}

/// Downloads thumbnails with a blocking reqwest client.
pub struct HttpThumbnails {
    client: reqwest::blocking::Client,
}

impl HttpThumbnails {
    pub fn new() -> FetchResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

impl ThumbnailSource for HttpThumbnails {
    fn fetch(&self, url: &str) -> FetchResult<ColorImage> {
        let response = self.client.get(url).send()?;
        let status = response.status();
        if status == reqwest::StatusCode::GONE {
            return Err(FetchError::Gone);
        }
        if !status.is_success() {
            return Err(FetchError::Http { status });
        }

        let bytes: bytes::Bytes = response.bytes()?;
        decode_thumbnail(&bytes)
    }
}

/// Decodes any supported image format and scales it to exactly 160x90.
pub fn decode_thumbnail(data: &[u8]) -> FetchResult<ColorImage> {
    let img = image::load_from_memory(data)?
        .resize_exact(THUMBNAIL_WIDTH, THUMBNAIL_HEIGHT, FilterType::Triangle)
        .to_rgba8();
    let size = [img.width() as usize, img.height() as usize];
    Ok(ColorImage::from_rgba_unmultiplied(size, img.as_raw()))
}
