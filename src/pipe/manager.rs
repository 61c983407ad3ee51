/*!
 * Pipe Connection Manager
 * Owns the relay's two bounded queues and the input-queue lifecycle
 * across client reconnects
 */

use super::queue::BoundedQueue;
use super::types::{PipeResult, FALLBACK_REPLY};
use crate::completion::CompletionClient;
use arc_swap::ArcSwap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, Notify, OwnedMutexGuard};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Connection manager for the relay pipe.
///
/// Holds the replaceable input queue behind an atomic pointer swap and the
/// single process-lifetime output queue. Constructed once at startup and
/// shared via `Arc`; the worker and every transport adapter receive it by
/// injection.
pub struct PipeConnectionManager {
    /// Current input queue. Swapped (never mutated in place) when a new
    /// attachment follows a closed cycle.
    input: ArcSwap<BoundedQueue<String>>,
    output: Arc<BoundedQueue<String>>,
    /// Set by a detaching input cycle, consumed by the next attach.
    input_closed: Arc<AtomicBool>,
    /// Serializes attachment cycles. The guard lives inside the
    /// [`InputAttachment`], so a second attach waits out the first cycle.
    attach_lock: Arc<Mutex<()>>,
    /// Signaled whenever a fresh input queue is installed.
    swapped: Notify,
    shutting_down: AtomicBool,
    capacity: usize,
}

impl PipeConnectionManager {
    pub fn new(capacity: usize) -> Self {
        info!(capacity, "pipe connection manager initialized");
        Self {
            input: ArcSwap::from_pointee(BoundedQueue::new(capacity)),
            output: Arc::new(BoundedQueue::new(capacity)),
            input_closed: Arc::new(AtomicBool::new(false)),
            attach_lock: Arc::new(Mutex::new(())),
            swapped: Notify::new(),
            shutting_down: AtomicBool::new(false),
            capacity,
        }
    }

    /// Begin one attachment cycle for an inbound client session.
    ///
    /// Waits until no other cycle is active, then installs a fresh input
    /// queue if the previous cycle closed its queue. The returned
    /// attachment tears the cycle down (queue close + flag) when dropped,
    /// on every exit path.
    pub async fn attach(&self) -> InputAttachment {
        let permit = self.attach_lock.clone().lock_owned().await;

        if !self.shutting_down.load(Ordering::Acquire)
            && self
                .input_closed
                .compare_exchange(true, false, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
        {
            self.input
                .store(Arc::new(BoundedQueue::new(self.capacity)));
            self.swapped.notify_waiters();
            debug!("installed fresh input queue");
        }

        let session = Uuid::new_v4();
        info!(session = %session, "input pipe attached");
        InputAttachment {
            queue: self.input.load_full(),
            input_closed: Arc::clone(&self.input_closed),
            session,
            _permit: permit,
        }
    }

    /// The input queue the worker should currently drain.
    pub fn current_input(&self) -> Arc<BoundedQueue<String>> {
        self.input.load_full()
    }

    /// The single long-lived output queue. No ownership transfer; closing
    /// it is reserved for [`shutdown`](Self::shutdown).
    pub fn output(&self) -> Arc<BoundedQueue<String>> {
        Arc::clone(&self.output)
    }

    /// Park until a queue other than `old` is installed, or the output
    /// queue closes. The worker's reconnect mechanism: called after a
    /// drained cycle so the worker never spins on a closed queue.
    pub async fn wait_for_replacement(&self, old: &Arc<BoundedQueue<String>>) {
        loop {
            let notified = self.swapped.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            if !Arc::ptr_eq(&self.input.load_full(), old) || self.output.is_closed() {
                return;
            }
            notified.await;
        }
    }

    /// Run one payload through the completion service and enqueue the
    /// result. Invoked only by the processing loop, so at most one call is
    /// in flight at any time.
    ///
    /// A completion failure becomes the fixed fallback reply; the only
    /// error this returns is the output queue having closed, which is
    /// terminal for the caller.
    pub async fn process_payload(
        &self,
        client: &dyn CompletionClient,
        payload: String,
    ) -> PipeResult<()> {
        let reply = match client.complete(&payload).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!("completion request failed: {}", e);
                FALLBACK_REPLY.to_string()
            }
        };
        // Results are never dropped: wait for space rather than rejecting.
        // A full output queue with no consumer intentionally stalls the
        // worker and, through it, all input processing.
        self.output.push(reply).await
    }

    /// Close both queues. Terminal: the output queue has no replacement
    /// policy, so this ends the processing loop and every broadcaster.
    pub fn shutdown(&self) {
        if self.shutting_down.swap(true, Ordering::AcqRel) {
            return;
        }
        info!("pipe connection manager shutting down");
        self.input.load().close();
        self.output.close();
        self.swapped.notify_waiters();
    }
}

/// RAII handle for one attachment cycle.
///
/// Field order matters: teardown (queue close + flag) runs before the
/// attach permit is released.
pub struct InputAttachment {
    queue: Arc<BoundedQueue<String>>,
    input_closed: Arc<AtomicBool>,
    session: Uuid,
    _permit: OwnedMutexGuard<()>,
}

impl InputAttachment {
    /// Offer one payload to this cycle's input queue. Never blocks; a full
    /// queue is reported to the caller and the payload dropped.
    pub fn submit(&self, payload: String) -> PipeResult<()> {
        self.queue.try_push(payload)
    }

    pub fn session(&self) -> Uuid {
        self.session
    }
}

impl Drop for InputAttachment {
    fn drop(&mut self) {
        self.queue.close();
        self.input_closed.store(true, Ordering::Release);
        info!(
            session = %self.session,
            pending = self.queue.len(),
            "input pipe detached, queue closed"
        );
    }
}
