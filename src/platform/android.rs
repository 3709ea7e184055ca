//! Capable platform: full package enumeration and usage-stats aggregation.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use super::DeviceBackend;
use crate::collectors::inventory::{AppInventoryCollector, PackageInventory};
use crate::collectors::permission::{AppOpsGate, PermissionGate};
use crate::collectors::sound::SoundProfileProbe;
use crate::collectors::usage::UsageAggregator;
use crate::error::Result;
use crate::icon::{IconCache, IconResource};
use crate::models::{AppRecord, Capabilities, SoundProfile, UsageRecord};

/// Bundled with the system image.
pub const FLAG_SYSTEM: u32 = 1 << 0;
/// System app whose binary was replaced by a user-initiated update.
pub const FLAG_UPDATED_SYSTEM_APP: u32 = 1 << 7;

pub const RINGER_MODE_SILENT: i32 = 0;
pub const RINGER_MODE_VIBRATE: i32 = 1;
pub const RINGER_MODE_NORMAL: i32 = 2;

/// Identity of the running application, used for the app-op check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppIdentity {
    pub package_name: String,
    pub uid: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationInfo {
    pub package_name: String,
    pub flags: u32,
    pub uid: u32,
}

impl ApplicationInfo {
    pub fn is_system(&self) -> bool {
        self.flags & FLAG_SYSTEM != 0
    }

    pub fn is_updated_system(&self) -> bool {
        self.flags & FLAG_UPDATED_SYSTEM_APP != 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageInfo {
    pub package_name: String,
    pub version_name: Option<String>,
    pub version_code: Option<i64>,
    pub application_info: Option<ApplicationInfo>,
}

/// Aggregated usage of one package over the queried window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageStats {
    pub package_name: String,
    pub total_time_in_foreground_ms: i64,
    /// Epoch millis, `0` when unknown.
    pub last_time_used_ms: i64,
}

/// Result of the usage-stats app-op check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpMode {
    Allowed,
    Ignored,
    Errored,
    /// No explicit decision; the manifest permission decides.
    Default,
}

/// The slice of the OS this crate needs on the capable platform.
/// Real bindings live with the host application.
pub trait AndroidSystem: Send + Sync {
    fn identity(&self) -> AppIdentity;

    fn check_usage_stats_op(&self, uid: u32, package_name: &str) -> Result<OpMode>;
    fn usage_stats_permission_granted(&self) -> bool;
    fn start_usage_access_settings(&self) -> Result<()>;

    fn installed_packages(&self) -> Result<Vec<PackageInfo>>;
    fn application_info(&self, package_name: &str) -> Result<ApplicationInfo>;
    fn application_label(&self, info: &ApplicationInfo) -> Result<String>;
    fn load_icon(&self, info: &ApplicationInfo) -> Result<IconResource>;
    fn has_launch_intent(&self, package_name: &str) -> bool;

    /// Entries come back in OS enumeration order.
    fn query_and_aggregate_usage_stats(&self, begin_ms: i64, end_ms: i64) -> Result<Vec<UsageStats>>;

    fn ringer_mode(&self) -> Result<i32>;
}

pub struct AndroidBackend {
    system: Arc<dyn AndroidSystem>,
    icons: IconCache,
}

impl AndroidBackend {
    pub fn new(system: Arc<dyn AndroidSystem>, icons: IconCache) -> Self {
        Self { system, icons }
    }

    fn gate(&self) -> AppOpsGate<'_> {
        AppOpsGate::new(self.system.as_ref())
    }
}

impl DeviceBackend for AndroidBackend {
    fn name(&self) -> &'static str {
        "android"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::CAPABLE
    }

    fn sound_profile(&self) -> SoundProfile {
        SoundProfileProbe::from_ringer(self.system.ringer_mode())
    }

    fn list_apps(&self, include_system_apps: bool) -> Result<Vec<AppRecord>> {
        PackageInventory::new(self.system.as_ref(), &self.icons).list_apps(include_system_apps)
    }

    fn screen_time(&self) -> Result<Vec<UsageRecord>> {
        let gate = self.gate();
        let records = UsageAggregator::new(self.system.as_ref(), &gate, self.icons.renderer()).screen_time()?;
        info!(count = records.len(), "Screen time collected");
        Ok(records)
    }

    fn has_usage_access(&self) -> bool {
        self.gate().has_usage_access()
    }

    fn open_usage_settings(&self) -> Result<bool> {
        self.gate().request_usage_access()
    }
}
