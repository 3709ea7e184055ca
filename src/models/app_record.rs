use serde::{Deserialize, Serialize};

/// One installed application, as reported by `getInstalledApps`.
/// Built fresh for every request and never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppRecord {
    #[serde(rename = "packageName")]
    pub package_id: String,
    #[serde(rename = "appName")]
    pub display_name: String,
    /// Absolute path of the cached PNG, if the icon could be materialized.
    #[serde(rename = "iconPath")]
    pub icon_ref: Option<String>,
    pub is_system_app: bool,
    pub version_name: Option<String>,
    pub version_code: Option<i64>,
}
