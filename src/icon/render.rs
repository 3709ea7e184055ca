use base64::Engine as _;
use image::codecs::png::PngEncoder;
use image::imageops::{self, FilterType};
use image::{ColorType, RgbaImage};
use std::borrow::Cow;
use tracing::debug;

use super::drawable::IconResource;
use super::{DEFAULT_ICON_SIZE, INLINE_ICON_SIZE, MAX_ICON_DIMENSION};
use crate::error::{Result, TelemetryError};

/// Rasterizes icon resources. Pure: same resource, same pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconRenderer {
    default_size: u32,
    inline_size: u32,
}

impl Default for IconRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_ICON_SIZE, INLINE_ICON_SIZE)
    }
}

impl IconRenderer {
    pub fn new(default_size: u32, inline_size: u32) -> Self {
        Self {
            default_size: default_size.max(1),
            inline_size: inline_size.max(1),
        }
    }

    pub fn default_size(&self) -> u32 {
        self.default_size
    }

    pub fn inline_size(&self) -> u32 {
        self.inline_size
    }

    /// Ready rasters are borrowed untouched, unless they have no pixels. Everything
    /// else is drawn at its intrinsic size, or at the default size when that is
    /// missing or invalid.
    pub fn render<'a>(&self, resource: &'a IconResource) -> Result<Cow<'a, RgbaImage>> {
        match resource {
            IconResource::Raster(img) if img.width() == 0 || img.height() == 0 => Err(TelemetryError::Render(
                format!("empty raster {}x{}", img.width(), img.height()),
            )),
            IconResource::Raster(img) => Ok(Cow::Borrowed(img)),
            IconResource::Vector(drawable) => {
                let (width, height) = match drawable.intrinsic_size() {
                    Some((w, h)) if w > 0 && h > 0 => (w as u32, h as u32),
                    other => {
                        debug!(intrinsic = ?other, size = self.default_size, "No usable intrinsic size, using default");
                        (self.default_size, self.default_size)
                    }
                };

                if width > MAX_ICON_DIMENSION || height > MAX_ICON_DIMENSION {
                    return Err(TelemetryError::Render(format!(
                        "intrinsic size {}x{} exceeds {}",
                        width, height, MAX_ICON_DIMENSION
                    )));
                }

                let mut canvas = RgbaImage::new(width, height);
                drawable.draw(&mut canvas);
                Ok(Cow::Owned(canvas))
            }
        }
    }

    /// Render, downsample to the inline size, PNG-encode, base64-encode.
    /// Any failure yields `None`.
    pub fn inline(&self, resource: &IconResource) -> Option<String> {
        let bitmap = match self.render(resource) {
            Ok(b) => b,
            Err(e) => {
                debug!("Inline icon render failed: {}", e);
                return None;
            }
        };

        let small = if bitmap.dimensions() == (self.inline_size, self.inline_size) {
            bitmap.into_owned()
        } else {
            imageops::resize(&*bitmap, self.inline_size, self.inline_size, FilterType::Triangle)
        };

        match encode_png(&small) {
            Ok(bytes) => Some(base64::engine::general_purpose::STANDARD.encode(bytes)),
            Err(e) => {
                debug!("Inline icon encode failed: {}", e);
                None
            }
        }
    }
}

/// PNG-encode an RGBA bitmap. Deterministic for identical pixels.
pub fn encode_png(bitmap: &RgbaImage) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    PngEncoder::new(&mut out).encode(
        bitmap.as_raw(),
        bitmap.width(),
        bitmap.height(),
        ColorType::Rgba8,
    )?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::icon::drawable::ColorDrawable;

    #[test]
    fn test_negative_intrinsic_size_uses_default() {
        let renderer = IconRenderer::default();
        let res = IconResource::vector(ColorDrawable::new([1, 2, 3, 255]).with_size(-1, -1));
        let img = renderer.render(&res).unwrap();
        assert_eq!(img.dimensions(), (48, 48));
    }

    #[test]
    fn test_intrinsic_size_is_respected() {
        let renderer = IconRenderer::default();
        let res = IconResource::vector(ColorDrawable::new([1, 2, 3, 255]).with_size(96, 72));
        let img = renderer.render(&res).unwrap();
        assert_eq!(img.dimensions(), (96, 72));
    }

    #[test]
    fn test_oversize_is_a_render_error() {
        let renderer = IconRenderer::default();
        let res = IconResource::vector(ColorDrawable::new([0, 0, 0, 255]).with_size(10_000, 10));
        assert!(renderer.render(&res).is_err());
        assert!(renderer.inline(&res).is_none());
    }

    #[test]
    fn test_empty_raster_is_a_render_error() {
        let renderer = IconRenderer::default();
        for (w, h) in [(0, 0), (0, 16), (16, 0)] {
            let res = IconResource::Raster(RgbaImage::new(w, h));
            assert!(renderer.render(&res).is_err());
            assert!(renderer.inline(&res).is_none());
        }
    }

    #[test]
    fn test_raster_is_borrowed() {
        let renderer = IconRenderer::default();
        let res = IconResource::Raster(RgbaImage::new(5, 7));
        let img = renderer.render(&res).unwrap();
        assert!(matches!(img, Cow::Borrowed(_)));
        assert_eq!(img.dimensions(), (5, 7));
    }
}
