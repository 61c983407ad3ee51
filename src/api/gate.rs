/*!
 * Input Gate
 * Per-connection adapter from the inbound frame stream to the input queue
 */

use crate::pipe::{InputAttachment, PipeError};
use futures::{Stream, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Notice sent back on the submitting connection when the input queue is
/// full. The rejected payload is dropped, not retried.
pub const QUEUE_FULL_NOTICE: &str = "processing queue is full, try again later";

/// One unit of the inbound transport stream.
#[derive(Debug, Clone)]
pub enum InboundFrame {
    Text(String),
    Binary(Vec<u8>),
    Close,
}

/// Drive one attachment cycle: read frames until the stream ends, errors,
/// or a close frame arrives. Full-queue rejections are reported on
/// `notices`, back toward the same client. Dropping the attachment at the
/// end of this function is the teardown (queue close + closed flag) and
/// runs on every exit path.
pub async fn run_input_gate<S, E>(
    attachment: InputAttachment,
    mut frames: S,
    notices: mpsc::Sender<String>,
) where
    S: Stream<Item = Result<InboundFrame, E>> + Unpin,
    E: std::fmt::Display,
{
    while let Some(frame) = frames.next().await {
        let frame = match frame {
            Ok(frame) => frame,
            Err(e) => {
                warn!(session = %attachment.session(), "input transport error: {}", e);
                break;
            }
        };
        match frame {
            InboundFrame::Text(payload) => match attachment.submit(payload) {
                Ok(()) => {}
                Err(PipeError::QueueFull { .. }) => {
                    debug!(session = %attachment.session(), "input queue full, payload dropped");
                    if notices.send(QUEUE_FULL_NOTICE.to_string()).await.is_err() {
                        // notice channel gone means the connection is gone
                        break;
                    }
                }
                Err(PipeError::Closed) => {
                    warn!(session = %attachment.session(), "input queue closed mid-session");
                    break;
                }
            },
            InboundFrame::Binary(_) => {
                debug!(session = %attachment.session(), "non-text frame, skip");
            }
            InboundFrame::Close => {
                info!(session = %attachment.session(), "close frame received");
                break;
            }
        }
    }
}
