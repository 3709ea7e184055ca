use chrono::{DateTime, Duration, Local, NaiveTime, TimeZone};
use std::collections::HashMap;
use tracing::{debug, info};

use super::permission::PermissionGate;
use crate::error::Result;
use crate::icon::IconRenderer;
use crate::models::UsageRecord;
use crate::platform::android::{AndroidSystem, ApplicationInfo, UsageStats};

const MINUTES_PER_DAY: i64 = 24 * 60;

/// Query window in epoch millis, `[begin, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsageWindow {
    pub begin_ms: i64,
    pub end_ms: i64,
}

impl UsageWindow {
    /// From local midnight of `now`'s day up to `now`. When a DST jump skips
    /// midnight, the window opens at the first local minute that exists.
    pub fn today<Tz: TimeZone>(now: &DateTime<Tz>) -> Self {
        let tz = now.timezone();
        let day_start = now.date_naive().and_time(NaiveTime::MIN);

        let start = (0..MINUTES_PER_DAY)
            .map(|minute| day_start + Duration::minutes(minute))
            .take_while(|local| *local <= now.naive_local())
            .find_map(|local| tz.from_local_datetime(&local).earliest())
            .unwrap_or_else(|| now.clone());

        UsageWindow {
            begin_ms: start.timestamp_millis(),
            end_ms: now.timestamp_millis(),
        }
    }
}

/// Hidden = a system package that was never user-updated and has no launcher
/// entry. Those are background services, not apps a person uses.
pub fn is_hidden_system_package(info: &ApplicationInfo, launchable: bool) -> bool {
    info.is_system() && !info.is_updated_system() && !launchable
}

/// Today's per-app foreground time. Expensive: one OS query plus a label and
/// an inline icon per package. Must run off the interactive thread.
pub struct UsageAggregator<'a> {
    system: &'a dyn AndroidSystem,
    gate: &'a dyn PermissionGate,
    renderer: &'a IconRenderer,
}

impl<'a> UsageAggregator<'a> {
    pub fn new(system: &'a dyn AndroidSystem, gate: &'a dyn PermissionGate, renderer: &'a IconRenderer) -> Self {
        Self { system, gate, renderer }
    }

    pub fn screen_time(&self) -> Result<Vec<UsageRecord>> {
        self.screen_time_at(&Local::now())
    }

    pub fn screen_time_at<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Result<Vec<UsageRecord>> {
        // No permission is an empty answer, not an error.
        if !self.gate.has_usage_access() {
            info!("Usage access not granted, returning empty screen time");
            return Ok(Vec::new());
        }

        let window = UsageWindow::today(now);
        let stats = self.system.query_and_aggregate_usage_stats(window.begin_ms, window.end_ms)?;
        debug!(entries = stats.len(), begin = window.begin_ms, end = window.end_ms, "Usage stats queried");

        let mut records = Vec::new();
        for stat in merge_by_package(stats) {
            let seconds = stat.total_time_in_foreground_ms / 1000;
            if seconds <= 0 {
                continue;
            }

            match self.describe(&stat, seconds as u64) {
                Ok(Some(record)) => records.push(record),
                Ok(None) => debug!(package = %stat.package_name, "Suppressed background system package"),
                Err(e) => debug!(package = %stat.package_name, "Skipping usage entry: {}", e),
            }
        }

        // Stable: ties keep OS enumeration order.
        records.sort_by(|a, b| b.seconds_foreground.cmp(&a.seconds_foreground));
        Ok(records)
    }

    fn describe(&self, stat: &UsageStats, seconds: u64) -> Result<Option<UsageRecord>> {
        let info = self.system.application_info(&stat.package_name)?;

        let launchable = self.system.has_launch_intent(&stat.package_name);
        if is_hidden_system_package(&info, launchable) {
            return Ok(None);
        }

        let display_name = self
            .system
            .application_label(&info)
            .unwrap_or_else(|_| stat.package_name.clone());

        let icon_ref = self
            .system
            .load_icon(&info)
            .ok()
            .and_then(|resource| self.renderer.inline(&resource));

        Ok(Some(UsageRecord {
            package_id: stat.package_name.clone(),
            display_name,
            seconds_foreground: seconds,
            last_used_at: (stat.last_time_used_ms > 0).then_some(stat.last_time_used_ms),
            icon_ref,
        }))
    }
}

/// Sum repeated entries for a package into its first occurrence.
fn merge_by_package(stats: Vec<UsageStats>) -> Vec<UsageStats> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut merged: Vec<UsageStats> = Vec::with_capacity(stats.len());

    for stat in stats {
        match index.get(&stat.package_name) {
            Some(&i) => {
                let entry = &mut merged[i];
                entry.total_time_in_foreground_ms = entry
                    .total_time_in_foreground_ms
                    .saturating_add(stat.total_time_in_foreground_ms);
                entry.last_time_used_ms = entry.last_time_used_ms.max(stat.last_time_used_ms);
            }
            None => {
                index.insert(stat.package_name.clone(), merged.len());
                merged.push(stat);
            }
        }
    }
    merged
}
