use std::collections::HashSet;
use tracing::{debug, info};

use crate::error::{Result, TelemetryError};
use crate::icon::IconCache;
use crate::models::AppRecord;
use crate::platform::android::{AndroidSystem, PackageInfo};
use crate::platform::ios::IosSystem;

pub trait AppInventoryCollector {
    /// Installed apps sorted by display name. A failure on one app drops that
    /// app only.
    fn list_apps(&self, include_system_apps: bool) -> Result<Vec<AppRecord>>;
}

/// Capable platform: full enumeration through the package manager.
pub struct PackageInventory<'a> {
    system: &'a dyn AndroidSystem,
    icons: &'a IconCache,
}

impl<'a> PackageInventory<'a> {
    pub fn new(system: &'a dyn AndroidSystem, icons: &'a IconCache) -> Self {
        Self { system, icons }
    }

    /// `Ok(None)` means "filtered out", `Err` means "could not process".
    fn describe(&self, package: PackageInfo, include_system_apps: bool) -> Result<Option<AppRecord>> {
        let info = package
            .application_info
            .ok_or_else(|| TelemetryError::platform("applicationInfo", "missing application info"))?;

        let is_system_app = info.is_system();
        if is_system_app && !include_system_apps {
            return Ok(None);
        }

        let display_name = match self.system.application_label(&info) {
            Ok(label) => label,
            Err(e) => {
                debug!(package = %package.package_name, "Label unavailable, using package name: {}", e);
                package.package_name.clone()
            }
        };

        let icon_ref = match self.system.load_icon(&info) {
            Ok(resource) => self
                .icons
                .materialize(&resource, &package.package_name)
                .map(|p| p.to_string_lossy().into_owned()),
            Err(e) => {
                debug!(package = %package.package_name, "Icon unavailable: {}", e);
                None
            }
        };

        Ok(Some(AppRecord {
            package_id: package.package_name,
            display_name,
            icon_ref,
            is_system_app,
            version_name: package.version_name,
            version_code: package.version_code,
        }))
    }
}

impl AppInventoryCollector for PackageInventory<'_> {
    fn list_apps(&self, include_system_apps: bool) -> Result<Vec<AppRecord>> {
        let packages = self.system.installed_packages()?;
        let total = packages.len();

        let mut seen = HashSet::new();
        let mut apps = Vec::with_capacity(total);
        let mut skipped = 0usize;

        for package in packages {
            if package.package_name.is_empty() || !seen.insert(package.package_name.clone()) {
                skipped += 1;
                continue;
            }

            let name = package.package_name.clone();
            match self.describe(package, include_system_apps) {
                Ok(Some(record)) => apps.push(record),
                Ok(None) => {}
                Err(e) => {
                    // Skip apps that can't be processed
                    debug!(package = %name, "Skipping package: {}", e);
                    skipped += 1;
                }
            }
        }

        apps.sort_by(|a, b| a.display_name.cmp(&b.display_name));

        info!(total, returned = apps.len(), skipped, include_system_apps, "Inventory collected");
        Ok(apps)
    }
}

/// A well-known system capability probed by URL scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnownCapability {
    pub bundle_id: &'static str,
    pub display_name: &'static str,
    pub probe_url: &'static str,
}

/// The fixed allowlist. Without an enumeration API these are the only apps
/// whose presence we can test.
pub const KNOWN_CAPABILITIES: &[KnownCapability] = &[
    KnownCapability { bundle_id: "com.apple.Preferences", display_name: "Settings", probe_url: "app-settings:" },
    KnownCapability { bundle_id: "com.apple.mobilesafari", display_name: "Safari", probe_url: "https://" },
    KnownCapability { bundle_id: "com.apple.mobilemail", display_name: "Mail", probe_url: "mailto:" },
    KnownCapability { bundle_id: "com.apple.MobileSMS", display_name: "Messages", probe_url: "sms:" },
    KnownCapability { bundle_id: "com.apple.mobilephone", display_name: "Phone", probe_url: "tel:" },
    KnownCapability { bundle_id: "com.apple.camera", display_name: "Camera", probe_url: "camera:" },
    KnownCapability { bundle_id: "com.apple.mobileslideshow", display_name: "Photos", probe_url: "photos-redirect:" },
    KnownCapability { bundle_id: "com.apple.Maps", display_name: "Maps", probe_url: "maps:" },
    KnownCapability { bundle_id: "com.apple.facetime", display_name: "FaceTime", probe_url: "facetime:" },
];

/// Restricted platform: best-effort presence probe over `KNOWN_CAPABILITIES`.
pub struct ProbeInventory<'a> {
    system: &'a dyn IosSystem,
}

impl<'a> ProbeInventory<'a> {
    pub fn new(system: &'a dyn IosSystem) -> Self {
        Self { system }
    }
}

impl AppInventoryCollector for ProbeInventory<'_> {
    fn list_apps(&self, include_system_apps: bool) -> Result<Vec<AppRecord>> {
        // Everything on the allowlist ships with the OS.
        if !include_system_apps {
            return Ok(Vec::new());
        }

        let mut apps: Vec<AppRecord> = KNOWN_CAPABILITIES
            .iter()
            .filter(|cap| self.system.can_open_url(cap.probe_url))
            .map(|cap| AppRecord {
                package_id: cap.bundle_id.to_string(),
                display_name: cap.display_name.to_string(),
                icon_ref: None,
                is_system_app: true,
                version_name: None,
                version_code: None,
            })
            .collect();

        apps.sort_by(|a, b| a.display_name.cmp(&b.display_name));

        debug!(probed = KNOWN_CAPABILITIES.len(), present = apps.len(), "Capability probe finished");
        Ok(apps)
    }
}
