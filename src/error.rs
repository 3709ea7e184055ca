use thiserror::Error;

/// Everything that can go wrong inside the telemetry module.
///
/// Per-item failures are swallowed by the collectors; only top-level failures
/// ever reach the bridge, which turns them into an `ERROR` reply.
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("platform call `{call}` failed: {reason}")]
    Platform { call: &'static str, reason: String },

    #[error("icon rendering failed: {0}")]
    Render(String),

    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    #[error("worker task failed: {0}")]
    Worker(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl TelemetryError {
    pub fn platform(call: &'static str, reason: impl Into<String>) -> Self {
        TelemetryError::Platform {
            call,
            reason: reason.into(),
        }
    }
}

pub type Result<T, E = TelemetryError> = std::result::Result<T, E>;
