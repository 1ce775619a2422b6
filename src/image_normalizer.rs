use std::io::Cursor;

use image::{DynamicImage, ImageFormat, RgbaImage};

use crate::{
    error::{InstallError, InstallResult},
    info,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Rgba8,
}

/// A fully decoded bitmap, detached from whatever container it came from.
#[derive(Debug, Clone)]
pub struct NormalizedImage {
    pixels: RgbaImage,
}

impl NormalizedImage {
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixel_format(&self) -> PixelFormat {
        PixelFormat::Rgba8
    }

    #[cfg(test)]
    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn is_opaque(&self) -> bool {
        self.pixels.pixels().all(|p| p.0[3] == u8::MAX)
    }

    /// Encodes the bitmap as an uncompressed BMP. Opaque images are written
    /// as 24-bit, anything with transparency keeps its alpha channel.
    pub fn to_bmp_bytes(&self) -> InstallResult<Vec<u8>> {
        let image = if self.is_opaque() {
            DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(self.pixels.clone()).to_rgb8())
        } else {
            DynamicImage::ImageRgba8(self.pixels.clone())
        };

        let mut buf = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Bmp)
            .map_err(|e| InstallError::Encode(e.to_string()))?;
        Ok(buf)
    }
}

/// Decodes any raster container the `image` crate understands.
pub fn normalize(bytes: &[u8]) -> InstallResult<NormalizedImage> {
    if bytes.is_empty() {
        return Err(InstallError::UnsupportedImageFormat("image data is empty".into()));
    }

    let format = image::guess_format(bytes)
        .map_err(|e| InstallError::UnsupportedImageFormat(e.to_string()))?;
    let decoded = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| InstallError::UnsupportedImageFormat(format!("{format:?}: {e}")))?;

    let image = NormalizedImage {
        pixels: decoded.to_rgba8(),
    };
    info!(
        "Normalized {:?} image to {}x{} {:?}",
        format,
        image.width(),
        image.height(),
        image.pixel_format()
    );
    Ok(image)
}
