use serde::{Deserialize, Serialize};

/// Foreground time of one application since local midnight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageRecord {
    #[serde(rename = "packageName")]
    pub package_id: String,
    #[serde(rename = "appName")]
    pub display_name: String,
    /// Always > 0; zero-usage packages never produce a record.
    pub seconds_foreground: u64,
    /// Milliseconds since the Unix epoch.
    pub last_used_at: Option<i64>,
    /// Base64 of a 64x64 PNG.
    #[serde(rename = "iconBase64")]
    pub icon_ref: Option<String>,
}
