/*!
 * Processing Loop
 * The single worker that moves payloads from the input queue through the
 * completion service into the output queue
 */

use super::manager::PipeConnectionManager;
use crate::completion::CompletionClient;
use std::sync::Arc;
use tracing::{debug, info};

/// The relay's one worker task.
///
/// Drains whichever input queue is current, one payload at a time, and
/// re-acquires the queue after each attachment cycle ends. Exits only when
/// the output queue closes.
pub struct ProcessingLoop {
    manager: Arc<PipeConnectionManager>,
    client: Arc<dyn CompletionClient>,
}

impl ProcessingLoop {
    pub fn new(manager: Arc<PipeConnectionManager>, client: Arc<dyn CompletionClient>) -> Self {
        Self { manager, client }
    }

    /// Run for the lifetime of the process. Spawn on a dedicated task.
    pub async fn run(self) {
        info!("processing loop started");
        loop {
            let input = self.manager.current_input();
            while let Some(payload) = input.pop().await {
                if self
                    .manager
                    .process_payload(self.client.as_ref(), payload)
                    .await
                    .is_err()
                {
                    info!("output queue closed, processing loop exiting");
                    return;
                }
            }
            if self.manager.output().is_closed() {
                info!("output queue closed, processing loop exiting");
                return;
            }
            debug!("input queue drained, waiting for next attachment");
            self.manager.wait_for_replacement(&input).await;
        }
    }
}
