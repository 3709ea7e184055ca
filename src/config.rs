use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

use crate::error::{Result, TelemetryError};
use crate::icon::{DEFAULT_ICON_SIZE, INLINE_ICON_SIZE, MAX_ICON_DIMENSION};
use crate::platform::PlatformKind;

pub const ICON_DIR_NAME: &str = "app_icons";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    pub platform: PlatformKind,
    /// The application's private cache root. Icons go in `ICON_DIR_NAME` below it.
    pub cache_root: PathBuf,
    /// JSON device profile for the simulated OS.
    pub device_profile: Option<PathBuf>,
    pub default_icon_size: u32,
    pub inline_icon_size: u32,
    pub log_filter: String,
}

impl TelemetryConfig {
    /// Load configuration from environment variables or defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(platform) = env::var("DEVICE_TELEMETRY_PLATFORM") {
            config.platform = platform.parse()?;
        }

        if let Ok(dir) = env::var("DEVICE_TELEMETRY_CACHE_DIR") {
            config.cache_root = PathBuf::from(dir);
        }

        config.device_profile = env::var_os("DEVICE_TELEMETRY_PROFILE").map(PathBuf::from);

        if let Some(size) = parse_size_var("DEVICE_TELEMETRY_ICON_SIZE")? {
            config.default_icon_size = size;
        }
        if let Some(size) = parse_size_var("DEVICE_TELEMETRY_INLINE_ICON_SIZE")? {
            config.inline_icon_size = size;
        }

        if let Ok(filter) = env::var("DEVICE_TELEMETRY_LOG") {
            config.log_filter = filter;
        }

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.cache_root.as_os_str().is_empty() {
            return Err(TelemetryError::Config("cache root is required".to_string()));
        }

        for (name, size) in [
            ("default icon size", self.default_icon_size),
            ("inline icon size", self.inline_icon_size),
        ] {
            if size == 0 || size > MAX_ICON_DIMENSION {
                return Err(TelemetryError::Config(format!(
                    "{} must be between 1 and {}, got {}",
                    name, MAX_ICON_DIMENSION, size
                )));
            }
        }

        Ok(())
    }

    pub fn icon_dir(&self) -> PathBuf {
        self.cache_root.join(ICON_DIR_NAME)
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        let cache_root = dirs::cache_dir()
            .unwrap_or_else(env::temp_dir)
            .join("device_telemetry");

        Self {
            platform: PlatformKind::Android,
            cache_root,
            device_profile: None,
            default_icon_size: DEFAULT_ICON_SIZE,
            inline_icon_size: INLINE_ICON_SIZE,
            log_filter: "info".to_string(),
        }
    }
}

fn parse_size_var(name: &'static str) -> Result<Option<u32>> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<u32>()
            .map(Some)
            .map_err(|e| TelemetryError::Config(format!("{}: {}", name, e))),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = TelemetryConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.default_icon_size, 48);
        assert_eq!(config.inline_icon_size, 64);
        assert!(config.icon_dir().ends_with("app_icons"));
    }

    #[test]
    fn test_validate_rejects_zero_icon_size() {
        let config = TelemetryConfig {
            default_icon_size: 0,
            ..Default::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_cache_root() {
        let config = TelemetryConfig {
            cache_root: PathBuf::new(),
            ..Default::default()
        };

        assert!(config.validate().is_err());
    }
}
