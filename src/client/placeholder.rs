use std::io::Cursor;

use image::{ImageFormat, Rgba, RgbaImage};

use crate::error::{Result, VgenError};
use crate::models::ImageData;

/// Edge length of the substituted blank image.
pub const PLACEHOLDER_SIDE: u32 = 512;

/// The service requires an image part unconditionally; when the user attaches
/// nothing, a blank white PNG stands in.
pub fn blank_png() -> Result<ImageData> {
    let blank = RgbaImage::from_pixel(
        PLACEHOLDER_SIDE,
        PLACEHOLDER_SIDE,
        Rgba([255, 255, 255, 255]),
    );
    let mut buffer = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(blank)
        .write_to(&mut buffer, ImageFormat::Png)
        .map_err(|e| VgenError::InternalError(format!("failed to encode placeholder: {}", e)))?;
    Ok(ImageData::from_bytes(buffer.into_inner(), "image/png"))
}
