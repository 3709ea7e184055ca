use device_telemetry::bridge::stdio::{send_reply, write_replies};
use device_telemetry::bridge::{MethodResponse, PlatformBridge, ReplyFrame, RequestFrame, CHANNEL};
use device_telemetry::{build_backend, TelemetryConfig};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Serves the `device_info` channel over stdio, one JSON object per line.
/// Requests are handled concurrently; replies carry the request id.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = TelemetryConfig::from_env()?;

    // Logs go to stderr, stdout is the reply stream
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    config.validate()?;
    info!(
        platform = %config.platform,
        cache = %config.cache_root.display(),
        "Device telemetry bridge starting"
    );

    let bridge = PlatformBridge::new(build_backend(&config)?);

    // Every request task sends exactly one frame here
    let (reply_tx, reply_rx) = mpsc::channel::<ReplyFrame>(64);

    let writer = tokio::spawn(write_replies(reply_rx, tokio::io::stdout()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let frame: RequestFrame = match serde_json::from_str(line) {
            Ok(frame) => frame,
            Err(e) => {
                warn!("Dropping malformed request: {}", e);
                continue;
            }
        };

        let bridge = bridge.clone();
        let tx = reply_tx.clone();
        tokio::spawn(async move {
            let response = if frame.channel == CHANNEL {
                bridge.handle(frame.call).await
            } else {
                warn!(channel = %frame.channel, "No handler registered for channel");
                MethodResponse::NotImplemented
            };
            send_reply(&tx, ReplyFrame { id: frame.id, response }).await;
        });
    }

    // stdin closed: in-flight requests still hold senders, wait for them
    drop(reply_tx);
    let written = writer.await?;

    info!(replies = written, "Bridge shut down");
    Ok(())
}
