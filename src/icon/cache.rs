use image::RgbaImage;
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, warn};
use uuid::Uuid;

use super::drawable::IconResource;
use super::render::{encode_png, IconRenderer};
use crate::error::Result;

/// On-disk icon cache, one PNG per package.
///
/// The directory lives under the app's cache root and may be purged by the OS
/// at any time; files are regenerable, never authoritative. Writes go to a
/// unique temp file first and are renamed into place, so readers see either
/// the old or the new file, never a partial one.
#[derive(Debug, Clone)]
pub struct IconCache {
    dir: PathBuf,
    renderer: IconRenderer,
}

impl IconCache {
    pub fn new(dir: impl Into<PathBuf>, renderer: IconRenderer) -> Self {
        Self {
            dir: dir.into(),
            renderer,
        }
    }

    pub fn renderer(&self) -> &IconRenderer {
        &self.renderer
    }

    pub fn path_for(&self, package_id: &str) -> PathBuf {
        self.dir.join(cache_file_name(package_id))
    }

    /// Render `resource` and persist it for `package_id`.
    pub fn materialize(&self, resource: &IconResource, package_id: &str) -> Option<PathBuf> {
        match self.renderer.render(resource) {
            Ok(bitmap) => self.persist(&bitmap, package_id),
            Err(e) => {
                debug!(package = package_id, "Icon render failed: {}", e);
                None
            }
        }
    }

    /// Write `bitmap` as `<sanitized id>.png`. I/O failures yield `None`.
    pub fn persist(&self, bitmap: &RgbaImage, package_id: &str) -> Option<PathBuf> {
        match self.try_persist(bitmap, package_id) {
            Ok(path) => Some(path),
            Err(e) => {
                warn!(package = package_id, "Failed to cache icon: {}", e);
                None
            }
        }
    }

    fn try_persist(&self, bitmap: &RgbaImage, package_id: &str) -> Result<PathBuf> {
        let bytes = encode_png(bitmap)?;

        // Created lazily; the OS may have wiped it since the last call.
        fs::create_dir_all(&self.dir)?;

        let dest = self.path_for(package_id);
        let tmp = self
            .dir
            .join(format!(".{}.{}.tmp", cache_file_name(package_id), Uuid::new_v4()));

        let written = (|| -> Result<()> {
            let mut file = File::create(&tmp)?;
            file.write_all(&bytes)?;
            file.sync_all()?;
            Ok(())
        })();

        if let Err(e) = written.and_then(|_| fs::rename(&tmp, &dest).map_err(Into::into)) {
            let _ = fs::remove_file(&tmp);
            return Err(e);
        }

        Ok(dest)
    }
}

/// `com.app.browser` -> `com_app_browser.png`. Anything outside
/// `[A-Za-z0-9_-]` becomes `_`.
pub fn cache_file_name(package_id: &str) -> String {
    let stem: String = package_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
        .collect();
    format!("{}.png", stem)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_file_name_replaces_unsafe_chars() {
        assert_eq!(cache_file_name("com.app.browser"), "com_app_browser.png");
        assert_eq!(cache_file_name("../etc/passwd"), "___etc_passwd.png");
        assert_eq!(cache_file_name("a-b_c"), "a-b_c.png");
        assert_eq!(cache_file_name("ü.x"), "__x.png");
    }
}
