pub mod bridge;
pub mod collectors;
pub mod config;
pub mod error;
pub mod icon;
pub mod models;
pub mod platform;

// Re-export the pieces a host application wires together
pub use bridge::{MethodCall, MethodResponse, PlatformBridge};
pub use config::TelemetryConfig;
pub use error::TelemetryError;
pub use platform::{build_backend, DeviceBackend, PlatformKind};
