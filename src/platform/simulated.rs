//! Fixture-driven stand-ins for the OS.
//!
//! A `DeviceProfile` (JSON) describes what the device would report: packages,
//! their flags, labels, icons and today's usage on the capable platform; which
//! URL schemes open and what the audio session looks like on the restricted
//! one. The stdio driver serves from it and the tests build on it.

use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;
use tracing::debug;

use super::android::{
    AndroidSystem, AppIdentity, ApplicationInfo, OpMode, PackageInfo, UsageStats, FLAG_SYSTEM,
    FLAG_UPDATED_SYSTEM_APP,
};
use super::ios::{AudioSessionState, IosSystem};
use crate::error::{Result, TelemetryError};
use crate::icon::{AdaptiveIconDrawable, ColorDrawable, IconResource};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceProfile {
    pub android: AndroidProfile,
    pub ios: IosProfile,
}

impl DeviceProfile {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let profile = serde_json::from_str(&content)?;
        debug!(path = %path.display(), "Loaded device profile");
        Ok(profile)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AndroidProfile {
    pub identity: AppIdentity,
    pub usage_access: OpMode,
    /// Consulted only when `usage_access` is `default`.
    pub usage_permission_granted: bool,
    pub settings_available: bool,
    /// `None` makes the ringer read fail.
    pub ringer_mode: Option<i32>,
    pub enumeration_fails: bool,
    pub packages: Vec<SimulatedPackage>,
    /// Usage attributed to packages that are no longer installed.
    pub orphan_usage: Vec<UsageStats>,
}

impl Default for AndroidProfile {
    fn default() -> Self {
        Self {
            identity: AppIdentity {
                package_name: "com.example.child_track".to_string(),
                uid: 10_123,
            },
            usage_access: OpMode::Default,
            usage_permission_granted: false,
            settings_available: true,
            ringer_mode: Some(super::android::RINGER_MODE_NORMAL),
            enumeration_fails: false,
            packages: Vec::new(),
            orphan_usage: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum IconSpec {
    Color {
        rgba: [u8; 4],
        #[serde(default)]
        width: i32,
        #[serde(default)]
        height: i32,
    },
    Adaptive {
        background: [u8; 4],
        foreground: [u8; 4],
        #[serde(default)]
        size: i32,
    },
    /// Already-decoded bitmap of one flat color.
    Raster {
        rgba: [u8; 4],
        width: u32,
        height: u32,
    },
    Png {
        path: PathBuf,
    },
}

impl IconSpec {
    fn to_resource(&self) -> Result<IconResource> {
        Ok(match self {
            IconSpec::Color { rgba, width, height } => {
                IconResource::vector(ColorDrawable::new(*rgba).with_size(*width, *height))
            }
            IconSpec::Adaptive { background, foreground, size } => {
                IconResource::vector(AdaptiveIconDrawable {
                    background: *background,
                    foreground: *foreground,
                    intrinsic: Some((*size, *size)),
                })
            }
            IconSpec::Raster { rgba, width, height } => {
                IconResource::Raster(RgbaImage::from_pixel(*width, *height, Rgba(*rgba)))
            }
            IconSpec::Png { path } => {
                let img: RgbaImage = image::open(path)?.to_rgba8();
                IconResource::Raster(img)
            }
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatedPackage {
    pub package_name: String,
    /// `None` makes label resolution fail.
    pub label: Option<String>,
    pub flags: u32,
    pub uid: u32,
    pub version_name: Option<String>,
    pub version_code: Option<i64>,
    pub launchable: bool,
    /// `None` makes icon loading fail.
    pub icon: Option<IconSpec>,
    pub foreground_ms: i64,
    pub last_used_ms: i64,
    /// Package shows up in enumeration but has no application info.
    pub missing_application_info: bool,
}

impl SimulatedPackage {
    pub fn new(package_name: &str) -> Self {
        Self {
            package_name: package_name.to_string(),
            label: Some(package_name.rsplit('.').next().unwrap_or(package_name).to_string()),
            launchable: true,
            icon: Some(IconSpec::Color { rgba: [0x33, 0x66, 0x99, 0xff], width: 0, height: 0 }),
            ..Default::default()
        }
    }

    pub fn with_label(mut self, label: Option<&str>) -> Self {
        self.label = label.map(str::to_string);
        self
    }

    pub fn system(mut self) -> Self {
        self.flags |= FLAG_SYSTEM;
        self
    }

    pub fn updated_system(mut self) -> Self {
        self.flags |= FLAG_SYSTEM | FLAG_UPDATED_SYSTEM_APP;
        self
    }

    pub fn launchable(mut self, launchable: bool) -> Self {
        self.launchable = launchable;
        self
    }

    pub fn with_version(mut self, name: &str, code: i64) -> Self {
        self.version_name = Some(name.to_string());
        self.version_code = Some(code);
        self
    }

    pub fn with_icon(mut self, icon: Option<IconSpec>) -> Self {
        self.icon = icon;
        self
    }

    pub fn foreground_secs(mut self, secs: i64) -> Self {
        self.foreground_ms = secs * 1000;
        self
    }

    pub fn foreground_ms(mut self, ms: i64) -> Self {
        self.foreground_ms = ms;
        self
    }

    pub fn without_application_info(mut self) -> Self {
        self.missing_application_info = true;
        self
    }

    fn application_info(&self) -> ApplicationInfo {
        ApplicationInfo {
            package_name: self.package_name.clone(),
            flags: self.flags,
            uid: self.uid,
        }
    }
}

pub struct SimulatedAndroid {
    profile: AndroidProfile,
    usage_access: RwLock<OpMode>,
    settings_opened: AtomicUsize,
}

impl SimulatedAndroid {
    pub fn from_profile(profile: AndroidProfile) -> Self {
        Self {
            usage_access: RwLock::new(profile.usage_access),
            profile,
            settings_opened: AtomicUsize::new(0),
        }
    }

    pub fn with_packages(packages: Vec<SimulatedPackage>) -> Self {
        Self::from_profile(AndroidProfile {
            usage_access: OpMode::Allowed,
            packages,
            ..Default::default()
        })
    }

    /// Flip the grant, as a user would from the settings screen.
    pub fn set_usage_access(&self, mode: OpMode) {
        if let Ok(mut guard) = self.usage_access.write() {
            *guard = mode;
        }
    }

    pub fn settings_opened(&self) -> usize {
        self.settings_opened.load(Ordering::SeqCst)
    }

    fn find(&self, package_name: &str) -> Option<&SimulatedPackage> {
        self.profile.packages.iter().find(|p| p.package_name == package_name)
    }
}

impl AndroidSystem for SimulatedAndroid {
    fn identity(&self) -> AppIdentity {
        self.profile.identity.clone()
    }

    fn check_usage_stats_op(&self, _uid: u32, _package_name: &str) -> Result<OpMode> {
        self.usage_access
            .read()
            .map(|mode| *mode)
            .map_err(|_| TelemetryError::platform("checkOpNoThrow", "app-ops state poisoned"))
    }

    fn usage_stats_permission_granted(&self) -> bool {
        self.profile.usage_permission_granted
    }

    fn start_usage_access_settings(&self) -> Result<()> {
        if !self.profile.settings_available {
            return Err(TelemetryError::platform(
                "startActivity",
                "no activity found to handle usage access settings",
            ));
        }
        self.settings_opened.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn installed_packages(&self) -> Result<Vec<PackageInfo>> {
        if self.profile.enumeration_fails {
            return Err(TelemetryError::platform("getInstalledPackages", "package manager has died"));
        }

        Ok(self
            .profile
            .packages
            .iter()
            .map(|p| PackageInfo {
                package_name: p.package_name.clone(),
                version_name: p.version_name.clone(),
                version_code: p.version_code,
                application_info: if p.missing_application_info {
                    None
                } else {
                    Some(p.application_info())
                },
            })
            .collect())
    }

    fn application_info(&self, package_name: &str) -> Result<ApplicationInfo> {
        match self.find(package_name) {
            Some(p) if !p.missing_application_info => Ok(p.application_info()),
            _ => Err(TelemetryError::platform("getApplicationInfo", format!("{} not found", package_name))),
        }
    }

    fn application_label(&self, info: &ApplicationInfo) -> Result<String> {
        self.find(&info.package_name)
            .and_then(|p| p.label.clone())
            .ok_or_else(|| TelemetryError::platform("getApplicationLabel", "label resource missing"))
    }

    fn load_icon(&self, info: &ApplicationInfo) -> Result<IconResource> {
        match self.find(&info.package_name).and_then(|p| p.icon.as_ref()) {
            Some(spec) => spec.to_resource(),
            None => Err(TelemetryError::platform("loadIcon", "icon resource missing")),
        }
    }

    fn has_launch_intent(&self, package_name: &str) -> bool {
        self.find(package_name).map(|p| p.launchable).unwrap_or(false)
    }

    fn query_and_aggregate_usage_stats(&self, begin_ms: i64, end_ms: i64) -> Result<Vec<UsageStats>> {
        let in_window = |last_used: i64| last_used == 0 || (last_used >= begin_ms && last_used <= end_ms);

        let mut stats: Vec<UsageStats> = self
            .profile
            .packages
            .iter()
            .filter(|p| in_window(p.last_used_ms))
            .map(|p| UsageStats {
                package_name: p.package_name.clone(),
                total_time_in_foreground_ms: p.foreground_ms,
                last_time_used_ms: p.last_used_ms,
            })
            .collect();
        stats.extend(
            self.profile
                .orphan_usage
                .iter()
                .filter(|s| in_window(s.last_time_used_ms))
                .cloned(),
        );
        Ok(stats)
    }

    fn ringer_mode(&self) -> Result<i32> {
        self.profile
            .ringer_mode
            .ok_or_else(|| TelemetryError::platform("getRingerMode", "audio service unavailable"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IosProfile {
    /// URL schemes some installed app handles, e.g. `mailto`, `tel:`.
    pub openable_schemes: Vec<String>,
    pub audio_session: Option<AudioSessionState>,
    pub settings_available: bool,
}

impl Default for IosProfile {
    fn default() -> Self {
        Self {
            openable_schemes: Vec::new(),
            audio_session: None,
            settings_available: true,
        }
    }
}

pub struct SimulatedIos {
    profile: IosProfile,
    opened: RwLock<Vec<String>>,
}

impl SimulatedIos {
    pub fn from_profile(profile: IosProfile) -> Self {
        Self {
            profile,
            opened: RwLock::new(Vec::new()),
        }
    }

    pub fn with_schemes(schemes: &[&str]) -> Self {
        Self::from_profile(IosProfile {
            openable_schemes: schemes.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        })
    }

    /// URLs the OS accepted through `open_url`, in order.
    pub fn opened_urls(&self) -> Vec<String> {
        self.opened.read().map(|v| v.clone()).unwrap_or_default()
    }
}

fn scheme_of(url: &str) -> &str {
    url.split(':').next().unwrap_or("")
}

impl IosSystem for SimulatedIos {
    fn can_open_url(&self, url: &str) -> bool {
        let scheme = scheme_of(url);
        !scheme.is_empty()
            && self
                .profile
                .openable_schemes
                .iter()
                .any(|s| scheme_of(s).eq_ignore_ascii_case(scheme))
    }

    fn open_url(&self, url: &str) -> bool {
        let accepted = if scheme_of(url).eq_ignore_ascii_case("app-settings") {
            self.profile.settings_available
        } else {
            self.can_open_url(url)
        };
        if accepted {
            if let Ok(mut opened) = self.opened.write() {
                opened.push(url.to_string());
            }
        }
        accepted
    }

    fn audio_session(&self) -> Option<AudioSessionState> {
        self.profile.audio_session
    }
}
