use tracing::{debug, warn};

use crate::error::{Result, TelemetryError};
use crate::platform::android::{AndroidSystem, OpMode};
use crate::platform::ios::IosSystem;

/// Usage-access grant. Never cached: the user can revoke it from system
/// settings at any time and the OS does not tell us.
pub trait PermissionGate {
    fn has_usage_access(&self) -> bool;

    /// Opens the OS settings surface. `Ok(true)` reports successful navigation
    /// only; the grant itself has to be polled again later.
    fn request_usage_access(&self) -> Result<bool>;
}

/// Capable platform: app-op check for our own `(uid, package)`.
pub struct AppOpsGate<'a> {
    system: &'a dyn AndroidSystem,
}

impl<'a> AppOpsGate<'a> {
    pub fn new(system: &'a dyn AndroidSystem) -> Self {
        Self { system }
    }
}

impl PermissionGate for AppOpsGate<'_> {
    fn has_usage_access(&self) -> bool {
        let identity = self.system.identity();
        match self.system.check_usage_stats_op(identity.uid, &identity.package_name) {
            Ok(OpMode::Allowed) => true,
            Ok(OpMode::Default) => self.system.usage_stats_permission_granted(),
            Ok(mode) => {
                debug!(?mode, "Usage access not granted");
                false
            }
            Err(e) => {
                warn!("Usage access check failed, assuming denied: {}", e);
                false
            }
        }
    }

    fn request_usage_access(&self) -> Result<bool> {
        self.system.start_usage_access_settings()?;
        Ok(true)
    }
}

/// Restricted platform: there is no usage-access grant to query. The best we
/// can do is send the user to our own settings page.
pub struct RestrictedGate<'a> {
    system: &'a dyn IosSystem,
}

pub const APP_SETTINGS_URL: &str = "app-settings:";

impl<'a> RestrictedGate<'a> {
    pub fn new(system: &'a dyn IosSystem) -> Self {
        Self { system }
    }
}

impl PermissionGate for RestrictedGate<'_> {
    fn has_usage_access(&self) -> bool {
        false
    }

    fn request_usage_access(&self) -> Result<bool> {
        if !self.system.open_url(APP_SETTINGS_URL) {
            return Err(TelemetryError::platform("openURL", "app settings refused"));
        }
        Ok(true)
    }
}
