use serde::{Deserialize, Serialize};

/// What a backend can actually do on its platform.
/// The restricted backend is a strict subset of the capable one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Capabilities {
    pub enumerate_inventory: bool,
    pub aggregate_usage: bool,
    pub probe_sound: bool,
    pub probe_launchability: bool,
}

impl Capabilities {
    pub const CAPABLE: Capabilities = Capabilities {
        enumerate_inventory: true,
        aggregate_usage: true,
        probe_sound: true,
        probe_launchability: true,
    };

    pub const RESTRICTED: Capabilities = Capabilities {
        enumerate_inventory: false,
        aggregate_usage: false,
        probe_sound: true,
        probe_launchability: true,
    };
}
