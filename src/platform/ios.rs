//! Restricted platform.
//!
//! There is no package enumeration, no usage statistics and no public
//! silent-switch API. Inventory is probed from a fixed allowlist of URL
//! schemes, screen time is always empty and the sound probe can only ever
//! answer `sound`. This is a platform limitation, not an error.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::DeviceBackend;
use crate::collectors::inventory::{AppInventoryCollector, ProbeInventory};
use crate::collectors::permission::{PermissionGate, RestrictedGate};
use crate::collectors::sound::SoundProfileProbe;
use crate::error::Result;
use crate::models::{AppRecord, Capabilities, SoundProfile, UsageRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AudioCategory {
    Ambient,
    SoloAmbient,
    Playback,
    Record,
    PlayAndRecord,
    MultiRoute,
    #[serde(other)]
    Unknown,
}

impl AudioCategory {
    /// Categories under which the session expects audible output.
    pub fn expects_playback(&self) -> bool {
        matches!(
            self,
            AudioCategory::Playback | AudioCategory::PlayAndRecord | AudioCategory::MultiRoute
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioSessionState {
    pub category: AudioCategory,
    /// 0.0 ..= 1.0, `None` if the session could not report it.
    pub output_volume: Option<f32>,
}

pub trait IosSystem: Send + Sync {
    /// Whether some installed app handles `url`'s scheme.
    fn can_open_url(&self, url: &str) -> bool;
    /// Ask the OS to open `url`. Returns whether it accepted.
    fn open_url(&self, url: &str) -> bool;
    fn audio_session(&self) -> Option<AudioSessionState>;
}

pub struct IosBackend {
    system: Arc<dyn IosSystem>,
}

impl IosBackend {
    pub fn new(system: Arc<dyn IosSystem>) -> Self {
        Self { system }
    }
}

impl DeviceBackend for IosBackend {
    fn name(&self) -> &'static str {
        "ios"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::RESTRICTED
    }

    fn sound_profile(&self) -> SoundProfile {
        SoundProfileProbe::from_audio_session(self.system.audio_session().as_ref())
    }

    fn list_apps(&self, include_system_apps: bool) -> Result<Vec<AppRecord>> {
        ProbeInventory::new(self.system.as_ref()).list_apps(include_system_apps)
    }

    fn screen_time(&self) -> Result<Vec<UsageRecord>> {
        // Usage data is only reachable through the system's own Screen Time UI.
        tracing::debug!("Screen time unavailable on restricted platform");
        Ok(Vec::new())
    }

    fn has_usage_access(&self) -> bool {
        RestrictedGate::new(self.system.as_ref()).has_usage_access()
    }

    fn open_usage_settings(&self) -> Result<bool> {
        RestrictedGate::new(self.system.as_ref()).request_usage_access()
    }
}
