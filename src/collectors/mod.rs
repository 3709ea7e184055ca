//! The telemetry components proper: permission gating, inventory, usage
//! aggregation and the sound probe. Each works against the narrow OS traits in
//! `crate::platform` and owns nothing beyond a single request.

pub mod permission;
pub mod inventory;
pub mod usage;
pub mod sound;

pub use inventory::{AppInventoryCollector, PackageInventory, ProbeInventory};
pub use permission::{AppOpsGate, PermissionGate, RestrictedGate};
pub use sound::SoundProfileProbe;
pub use usage::UsageAggregator;
