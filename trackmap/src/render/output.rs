//! Image encoding and file output.

use std::io::Cursor;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, RgbaImage};
use tracing::info;

use super::error::RenderError;
use crate::cache::write_atomic;
use crate::config::DEFAULT_JPEG_QUALITY;

/// Output file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Jpeg { quality: u8 },
}

impl OutputFormat {
    /// Picks the format from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self, RenderError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("png") => Ok(OutputFormat::Png),
            Some("jpg") | Some("jpeg") => Ok(OutputFormat::Jpeg {
                quality: DEFAULT_JPEG_QUALITY,
            }),
            _ => Err(RenderError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Encodes `image` in memory. JPEG drops the alpha channel.
    pub fn encode(&self, image: &RgbaImage) -> Result<Vec<u8>, RenderError> {
        let mut out = Cursor::new(Vec::new());
        match *self {
            OutputFormat::Png => image.write_to(&mut out, ImageFormat::Png)?,
            OutputFormat::Jpeg { quality } => {
                let rgb = DynamicImage::ImageRgba8(image.clone()).to_rgb8();
                JpegEncoder::new_with_quality(&mut out, quality).encode_image(&rgb)?;
            }
        }
        Ok(out.into_inner())
    }
}

/// Encodes `image` for `path` and writes it atomically.
pub fn save_image(image: &RgbaImage, path: &Path) -> Result<(), RenderError> {
    let format = OutputFormat::from_path(path)?;
    let bytes = format.encode(image)?;
    write_atomic(path, &bytes).map_err(|source| RenderError::Output {
        path: path.to_path_buf(),
        source,
    })?;
    info!(
        path = %path.display(),
        width = image.width(),
        height = image.height(),
        bytes = bytes.len(),
        "Map written"
    );
    Ok(())
}
