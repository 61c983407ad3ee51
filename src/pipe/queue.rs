/*!
 * Bounded Queue
 * Fixed-capacity FIFO used for both sides of the relay pipe
 */

use super::types::{PipeError, PipeResult, MAX_QUEUE_CAPACITY};
use parking_lot::Mutex;
use std::collections::VecDeque;
use tokio::sync::Notify;

/// Fixed-capacity FIFO with non-blocking enqueue and async drain.
///
/// Producers that may drop work use [`try_push`](Self::try_push); the one
/// producer that must never lose an item uses the waiting
/// [`push`](Self::push). [`pop`](Self::pop) yields items in arrival order
/// until the queue is closed and drained, then returns `None`.
pub struct BoundedQueue<T> {
    capacity: usize,
    state: Mutex<QueueState<T>>,
    readable: Notify,
    writable: Notify,
}

struct QueueState<T> {
    items: VecDeque<T>,
    closed: bool,
}

impl<T> BoundedQueue<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.clamp(1, MAX_QUEUE_CAPACITY),
            state: Mutex::new(QueueState {
                items: VecDeque::new(),
                closed: false,
            }),
            readable: Notify::new(),
            writable: Notify::new(),
        }
    }

    /// Enqueue without waiting. Reports full rather than blocking.
    pub fn try_push(&self, item: T) -> PipeResult<()> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(PipeError::Closed);
        }
        if state.items.len() >= self.capacity {
            return Err(PipeError::QueueFull {
                length: state.items.len(),
                capacity: self.capacity,
            });
        }
        state.items.push_back(item);
        drop(state);
        self.readable.notify_one();
        Ok(())
    }

    /// Enqueue, waiting for space. Fails only once the queue is closed.
    pub async fn push(&self, item: T) -> PipeResult<()> {
        loop {
            // Register for wakeups before re-checking state, so a close or
            // dequeue landing in between is not lost.
            let notified = self.writable.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            {
                let mut state = self.state.lock();
                if state.closed {
                    return Err(PipeError::Closed);
                }
                if state.items.len() < self.capacity {
                    state.items.push_back(item);
                    drop(state);
                    self.readable.notify_one();
                    return Ok(());
                }
            }
            notified.await;
        }
    }

    /// Dequeue the next item, waiting while the queue is open and empty.
    /// Returns `None` once the queue is closed and fully drained.
    pub async fn pop(&self) -> Option<T> {
        loop {
            let notified = self.readable.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            {
                let mut state = self.state.lock();
                if let Some(item) = state.items.pop_front() {
                    drop(state);
                    self.writable.notify_one();
                    return Some(item);
                }
                if state.closed {
                    return None;
                }
            }
            notified.await;
        }
    }

    /// Close the queue and wake all waiters. Pending items remain
    /// drainable; further pushes fail with [`PipeError::Closed`].
    /// Returns whether this call performed the close.
    pub fn close(&self) -> bool {
        let mut state = self.state.lock();
        if state.closed {
            return false;
        }
        state.closed = true;
        drop(state);
        self.readable.notify_waiters();
        self.writable.notify_waiters();
        true
    }

    pub fn len(&self) -> usize {
        self.state.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().items.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
