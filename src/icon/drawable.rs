use image::{Rgba, RgbaImage};
use std::fmt;

/// Something that can paint itself into a canvas, filling its full bounds.
pub trait Drawable: Send + Sync {
    /// Preferred size in pixels. `None` or non-positive values mean "no
    /// intrinsic size", the same way the OS reports `-1`.
    fn intrinsic_size(&self) -> Option<(i32, i32)>;

    /// Paint into `canvas`. Must be deterministic.
    fn draw(&self, canvas: &mut RgbaImage);
}

/// An icon as handed over by the OS.
pub enum IconResource {
    /// Already rasterized, used as-is.
    Raster(RgbaImage),
    /// Needs rasterizing.
    Vector(Box<dyn Drawable>),
}

impl IconResource {
    pub fn vector(drawable: impl Drawable + 'static) -> Self {
        IconResource::Vector(Box::new(drawable))
    }
}

impl fmt::Debug for IconResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IconResource::Raster(img) => {
                write!(f, "IconResource::Raster({}x{})", img.width(), img.height())
            }
            IconResource::Vector(d) => write!(f, "IconResource::Vector({:?})", d.intrinsic_size()),
        }
    }
}

/// Flat fill. Has no intrinsic size unless one is given, like a color drawable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorDrawable {
    pub color: [u8; 4],
    pub intrinsic: Option<(i32, i32)>,
}

impl ColorDrawable {
    pub fn new(color: [u8; 4]) -> Self {
        Self { color, intrinsic: None }
    }

    pub fn with_size(mut self, width: i32, height: i32) -> Self {
        self.intrinsic = Some((width, height));
        self
    }
}

impl Drawable for ColorDrawable {
    fn intrinsic_size(&self) -> Option<(i32, i32)> {
        self.intrinsic
    }

    fn draw(&self, canvas: &mut RgbaImage) {
        for pixel in canvas.pixels_mut() {
            *pixel = Rgba(self.color);
        }
    }
}

/// Background layer with a centered round foreground, roughly how launcher
/// icons are composed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdaptiveIconDrawable {
    pub background: [u8; 4],
    pub foreground: [u8; 4],
    pub intrinsic: Option<(i32, i32)>,
}

impl Drawable for AdaptiveIconDrawable {
    fn intrinsic_size(&self) -> Option<(i32, i32)> {
        self.intrinsic
    }

    fn draw(&self, canvas: &mut RgbaImage) {
        let (w, h) = canvas.dimensions();
        let cx = w as f32 / 2.0;
        let cy = h as f32 / 2.0;
        // Foreground occupies the inner two thirds (safe zone).
        let radius = w.min(h) as f32 / 3.0;
        let r2 = radius * radius;

        for (x, y, pixel) in canvas.enumerate_pixels_mut() {
            let dx = x as f32 + 0.5 - cx;
            let dy = y as f32 + 0.5 - cy;
            *pixel = if dx * dx + dy * dy <= r2 {
                Rgba(self.foreground)
            } else {
                Rgba(self.background)
            };
        }
    }
}
