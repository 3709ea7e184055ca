//! Reply side of the line-delimited stdio transport.

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{error, warn};

use super::message::ReplyFrame;

/// Drain `replies` into `out`, one JSON object per line, until every sender is
/// gone or the output closes. Returns how many lines were written.
pub async fn write_replies<W>(mut replies: mpsc::Receiver<ReplyFrame>, mut out: W) -> usize
where
    W: AsyncWrite + Unpin,
{
    let mut written = 0;
    while let Some(frame) = replies.recv().await {
        let mut line = match serde_json::to_vec(&frame) {
            Ok(bytes) => bytes,
            Err(e) => {
                error!(id = frame.id, "Failed to encode reply: {}", e);
                continue;
            }
        };
        line.push(b'\n');

        if let Err(e) = out.write_all(&line).await {
            error!("Reply output closed: {}", e);
            break;
        }
        written += 1;

        if let Err(e) = out.flush().await {
            warn!(id = frame.id, "Failed to flush reply: {}", e);
        }
    }
    written
}

/// Hand `frame` to the writer. Returns false if the writer is gone.
pub async fn send_reply(tx: &mpsc::Sender<ReplyFrame>, frame: ReplyFrame) -> bool {
    let id = frame.id;
    if tx.send(frame).await.is_err() {
        warn!(id, "Reply writer gone, dropping reply");
        return false;
    }
    true
}
