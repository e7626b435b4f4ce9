//! Captured surface images.
//!
//! A capture is always a PNG: lossless, RGBA8, at the surface's pixel size.
//! There is no quality knob.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::RgbaImage;
use tiny_skia::Pixmap;

use crate::error::{RenderError, RenderResult};

/// MIME type of every capture.
pub const PNG_MIME: &str = "image/png";

const PNG_MAGIC: [u8; 4] = [0x89, 0x50, 0x4E, 0x47];

/// An encoded snapshot of the drawing surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedImage {
    width: u32,
    height: u32,
    png: Vec<u8>,
}

impl CapturedImage {
    /// Wrap already-encoded PNG bytes.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Decode`] if the bytes are not a PNG.
    pub fn from_png(png: Vec<u8>) -> RenderResult<Self> {
        if !png.starts_with(&PNG_MAGIC) {
            return Err(RenderError::Decode("missing PNG signature".to_string()));
        }
        let decoded = image::load_from_memory_with_format(&png, image::ImageFormat::Png)
            .map_err(|e| RenderError::Decode(e.to_string()))?;
        Ok(Self {
            width: decoded.width(),
            height: decoded.height(),
            png,
        })
    }

    /// Encode a raster as PNG.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Encode`] if the PNG encoder fails.
    pub fn encode(pixmap: &Pixmap) -> RenderResult<Self> {
        let png = pixmap
            .encode_png()
            .map_err(|e| RenderError::Encode(e.to_string()))?;
        Ok(Self {
            width: pixmap.width(),
            height: pixmap.height(),
            png,
        })
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The encoded PNG bytes.
    #[must_use]
    pub fn png_bytes(&self) -> &[u8] {
        &self.png
    }

    /// MIME type of the encoded bytes.
    #[must_use]
    pub fn mime_type(&self) -> &'static str {
        PNG_MIME
    }

    /// The PNG bytes as standard base64.
    #[must_use]
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.png)
    }

    /// The capture as a `data:image/png;base64,...` URL.
    #[must_use]
    pub fn to_data_url(&self) -> String {
        format!("data:{PNG_MIME};base64,{}", self.to_base64())
    }

    /// Parse a `data:image/png;base64,...` URL.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::DataUrl`] if the URL is not a base64 PNG data URL,
    /// or [`RenderError::Decode`] if the payload is not a PNG.
    pub fn from_data_url(url: &str) -> RenderResult<Self> {
        let rest = url
            .strip_prefix("data:")
            .ok_or_else(|| RenderError::DataUrl("not a data URL".to_string()))?;
        let (meta, payload) = rest
            .split_once(',')
            .ok_or_else(|| RenderError::DataUrl("missing comma separator".to_string()))?;
        let Some(mime) = meta.strip_suffix(";base64") else {
            return Err(RenderError::DataUrl("payload is not base64".to_string()));
        };
        if !mime.eq_ignore_ascii_case(PNG_MIME) {
            return Err(RenderError::DataUrl(format!("unsupported MIME type {mime}")));
        }
        let png = STANDARD
            .decode(payload.trim())
            .map_err(|e| RenderError::DataUrl(format!("invalid base64: {e}")))?;
        Self::from_png(png)
    }

    /// Decode back to straight-alpha RGBA pixels.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Decode`] if the PNG cannot be decoded.
    pub fn decode(&self) -> RenderResult<RgbaImage> {
        image::load_from_memory_with_format(&self.png, image::ImageFormat::Png)
            .map(|img| img.to_rgba8())
            .map_err(|e| RenderError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_png() -> Vec<u8> {
        let mut pixmap = tiny_skia::Pixmap::new(2, 2).expect("pixmap");
        pixmap.fill(tiny_skia::Color::WHITE);
        pixmap.encode_png().expect("encode")
    }

    #[test]
    fn data_url_round_trip() {
        let capture = CapturedImage::from_png(tiny_png()).expect("png");
        let url = capture.to_data_url();
        assert!(url.starts_with("data:image/png;base64,"));

        let parsed = CapturedImage::from_data_url(&url).expect("parse");
        assert_eq!(parsed, capture);
        assert_eq!((parsed.width(), parsed.height()), (2, 2));
    }

    #[test]
    fn encode_keeps_raster_size() {
        let mut pixmap = tiny_skia::Pixmap::new(3, 2).expect("pixmap");
        pixmap.fill(tiny_skia::Color::BLACK);
        let capture = CapturedImage::encode(&pixmap).expect("encode");
        assert_eq!((capture.width(), capture.height()), (3, 2));
        assert!(capture.png_bytes().starts_with(&PNG_MAGIC));

        let decoded = capture.decode().expect("decode");
        assert_eq!(decoded.get_pixel(2, 1).0, [0, 0, 0, 255]);
    }

    #[test]
    fn encode_error_names_the_stage() {
        let err = RenderError::Encode("zlib failure".to_string());
        assert_eq!(err.to_string(), "Failed to encode capture: zlib failure");
    }

    #[test]
    fn rejects_non_png_bytes() {
        assert!(CapturedImage::from_png(b"GIF89a".to_vec()).is_err());
    }

    #[test]
    fn rejects_malformed_data_urls() {
        assert!(CapturedImage::from_data_url("image/png;base64,AAAA").is_err());
        assert!(CapturedImage::from_data_url("data:image/png;base64").is_err());
        assert!(CapturedImage::from_data_url("data:image/jpeg;base64,AAAA").is_err());
        assert!(CapturedImage::from_data_url("data:image/png,AAAA").is_err());
        assert!(CapturedImage::from_data_url("data:image/png;base64,!!!").is_err());
    }

    #[test]
    fn decode_yields_rgba() {
        let capture = CapturedImage::from_png(tiny_png()).expect("png");
        let pixels = capture.decode().expect("decode");
        assert_eq!(pixels.get_pixel(1, 1).0, [255, 255, 255, 255]);
    }
}
