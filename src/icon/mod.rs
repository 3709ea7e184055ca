//! Icon materialization.
//!
//! OS icon resources are opaque: either a ready raster or something that can
//! draw itself into a canvas. They are rasterized to RGBA, then either cached
//! as PNG files (inventory) or inlined as base64 PNG (usage lists).

pub mod drawable;
pub mod render;
pub mod cache;

pub use drawable::{AdaptiveIconDrawable, ColorDrawable, Drawable, IconResource};
pub use render::IconRenderer;
pub use cache::{cache_file_name, IconCache};

/// Fallback raster size for resources without a usable intrinsic size.
pub const DEFAULT_ICON_SIZE: u32 = 48;
/// Edge length of inlined icons.
pub const INLINE_ICON_SIZE: u32 = 64;
/// Larger intrinsic sizes are treated as a broken resource.
pub const MAX_ICON_DIMENSION: u32 = 4096;
