//! The `device_info` dispatch surface.
//!
//! One call in, one `MethodResponse` out. Cheap methods run inline on the
//! caller's task; inventory and screen time go to the blocking pool so the
//! interactive context never stalls. Calls share nothing except the icon
//! cache on disk.

pub mod message;
pub mod stdio;

use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info_span, warn, Instrument};
use uuid::Uuid;

use crate::error::{Result, TelemetryError};
use crate::platform::DeviceBackend;

pub use message::{MethodCall, MethodResponse, ReplyFrame, RequestFrame, CHANNEL, ERROR_CODE};

pub const GET_SOUND_PROFILE: &str = "getSoundProfile";
pub const GET_INSTALLED_APPS: &str = "getInstalledApps";
pub const GET_SCREEN_TIME: &str = "getScreenTime";
pub const CHECK_USAGE_PERMISSION: &str = "checkUsagePermission";
pub const OPEN_USAGE_SETTINGS: &str = "openUsageSettings";
pub const GET_CAPABILITIES: &str = "getCapabilities";

#[derive(Clone)]
pub struct PlatformBridge {
    backend: Arc<dyn DeviceBackend>,
}

impl PlatformBridge {
    pub fn new(backend: Arc<dyn DeviceBackend>) -> Self {
        Self { backend }
    }

    /// Route `call` to exactly one operation.
    pub async fn handle(&self, call: MethodCall) -> MethodResponse {
        let invocation = Uuid::new_v4();
        let span = info_span!("bridge_call", method = %call.method, %invocation);

        async move {
            debug!("Dispatching");
            let response = self.dispatch(&call).await;
            if let MethodResponse::Error { message, .. } = &response {
                error!("{}", message);
            }
            response
        }
        .instrument(span)
        .await
    }

    async fn dispatch(&self, call: &MethodCall) -> MethodResponse {
        match call.method.as_str() {
            GET_SOUND_PROFILE => to_success(self.backend.sound_profile()),

            GET_INSTALLED_APPS => {
                let include_system_apps = match call.bool_argument("includeSystemApps") {
                    Ok(value) => value.unwrap_or(true),
                    Err(reason) => {
                        let e = TelemetryError::InvalidArgument { name: "includeSystemApps", reason };
                        return MethodResponse::error(format!("Failed to get installed apps: {}", e));
                    }
                };
                let backend = Arc::clone(&self.backend);
                let outcome = run_blocking(move || backend.list_apps(include_system_apps)).await;
                respond(outcome, "get installed apps")
            }

            GET_SCREEN_TIME => {
                let backend = Arc::clone(&self.backend);
                let outcome = run_blocking(move || backend.screen_time()).await;
                respond(outcome, "get screen time")
            }

            CHECK_USAGE_PERMISSION => to_success(self.backend.has_usage_access()),

            OPEN_USAGE_SETTINGS => respond(self.backend.open_usage_settings(), "open usage settings"),

            GET_CAPABILITIES => to_success(self.backend.capabilities()),

            other => {
                warn!(method = other, "Method not implemented");
                MethodResponse::NotImplemented
            }
        }
    }
}

/// Run `f` on the blocking pool and wait for its single result. A panic in
/// the worker becomes an error instead of tearing down the caller.
async fn run_blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| TelemetryError::Worker(e.to_string()))?
}

fn respond<T: Serialize>(outcome: Result<T>, what: &str) -> MethodResponse {
    match outcome {
        Ok(value) => to_success(value),
        Err(e) => MethodResponse::error(format!("Failed to {}: {}", what, e)),
    }
}

fn to_success<T: Serialize>(value: T) -> MethodResponse {
    match serde_json::to_value(value) {
        Ok(v) => MethodResponse::success(v),
        Err(e) => MethodResponse::error(format!("Failed to encode result: {}", e)),
    }
}
