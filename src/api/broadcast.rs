/*!
 * Output Broadcaster
 * Per-connection adapter draining the output queue into one push sink
 */

use crate::pipe::BoundedQueue;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::info;

/// Drain the shared output queue into `sink` until the queue closes or the
/// consumer goes away.
///
/// Concurrent broadcasters drain competitively: each output item is
/// delivered to exactly one of them. Consumer cancellation never closes
/// the shared queue; only process shutdown does that.
pub async fn run_output_broadcaster(queue: Arc<BoundedQueue<String>>, sink: mpsc::Sender<String>) {
    loop {
        tokio::select! {
            item = queue.pop() => match item {
                Some(reply) => {
                    if sink.send(reply).await.is_err() {
                        info!("output consumer disconnected");
                        return;
                    }
                }
                None => {
                    info!("output queue closed, broadcaster ending");
                    return;
                }
            },
            _ = sink.closed() => {
                info!("output consumer cancelled");
                return;
            }
        }
    }
}
