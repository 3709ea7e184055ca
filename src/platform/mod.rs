// Platform-specific backends behind one interface

pub mod android;
pub mod ios;
pub mod simulated;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

use crate::config::TelemetryConfig;
use crate::error::{Result, TelemetryError};
use crate::icon::{IconCache, IconRenderer};
use crate::models::{AppRecord, Capabilities, SoundProfile, UsageRecord};

pub use android::{AndroidBackend, AndroidSystem};
pub use ios::{IosBackend, IosSystem};

/// Everything the bridge can ask of a device.
///
/// All methods are blocking. `list_apps` and `screen_time` are expensive and
/// must not be called on an interactive thread; the bridge moves them onto
/// the blocking pool.
pub trait DeviceBackend: Send + Sync {
    fn name(&self) -> &'static str;
    fn capabilities(&self) -> Capabilities;
    fn sound_profile(&self) -> SoundProfile;
    fn list_apps(&self, include_system_apps: bool) -> Result<Vec<AppRecord>>;
    fn screen_time(&self) -> Result<Vec<UsageRecord>>;
    fn has_usage_access(&self) -> bool;
    /// `Ok(true)` means the settings screen was opened, not that access was granted.
    fn open_usage_settings(&self) -> Result<bool>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformKind {
    Android,
    Ios,
}

impl fmt::Display for PlatformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformKind::Android => f.write_str("android"),
            PlatformKind::Ios => f.write_str("ios"),
        }
    }
}

impl FromStr for PlatformKind {
    type Err = TelemetryError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "android" => Ok(PlatformKind::Android),
            "ios" => Ok(PlatformKind::Ios),
            other => Err(TelemetryError::Config(format!("unknown platform `{}`", other))),
        }
    }
}

/// Build the backend selected by `config`, wired to the simulated OS described
/// by the configured device profile (or an empty device when none is set).
pub fn build_backend(config: &TelemetryConfig) -> Result<Arc<dyn DeviceBackend>> {
    let profile = match &config.device_profile {
        Some(path) => simulated::DeviceProfile::load(path)?,
        None => simulated::DeviceProfile::default(),
    };

    let backend: Arc<dyn DeviceBackend> = match config.platform {
        PlatformKind::Android => {
            let renderer = IconRenderer::new(config.default_icon_size, config.inline_icon_size);
            let icons = IconCache::new(config.icon_dir(), renderer);
            let system = simulated::SimulatedAndroid::from_profile(profile.android);
            Arc::new(AndroidBackend::new(Arc::new(system), icons))
        }
        PlatformKind::Ios => {
            let system = simulated::SimulatedIos::from_profile(profile.ios);
            Arc::new(IosBackend::new(Arc::new(system)))
        }
    };

    info!(platform = backend.name(), capabilities = ?backend.capabilities(), "Backend ready");
    Ok(backend)
}
