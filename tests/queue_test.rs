/*!
 * Bounded Queue Tests
 * FIFO semantics, backpressure, and the close lifecycle
 */

use completion_relay::pipe::{BoundedQueue, PipeError};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn try_push_and_pop_preserve_fifo_order() {
    let queue = BoundedQueue::new(10);

    for i in 1..=5 {
        queue.try_push(format!("message {}", i)).unwrap();
    }

    for i in 1..=5 {
        assert_eq!(queue.pop().await, Some(format!("message {}", i)));
    }
}

#[tokio::test]
async fn try_push_reports_full_at_capacity() {
    let queue = BoundedQueue::new(20);
    for i in 0..20 {
        queue.try_push(i.to_string()).unwrap();
    }

    let err = queue.try_push("overflow".to_string()).unwrap_err();
    assert_eq!(
        err,
        PipeError::QueueFull {
            length: 20,
            capacity: 20
        }
    );
    assert_eq!(queue.len(), 20);

    // Once capacity frees up, submission succeeds again
    queue.pop().await.unwrap();
    queue.try_push("fits".to_string()).unwrap();
    assert_eq!(queue.len(), 20);
}

#[tokio::test]
async fn push_onto_closed_queue_fails() {
    let queue = BoundedQueue::new(4);
    assert!(queue.close());

    assert_eq!(
        queue.try_push("late".to_string()),
        Err(PipeError::Closed)
    );
    assert_eq!(queue.push("late".to_string()).await, Err(PipeError::Closed));
}

#[tokio::test]
async fn pop_drains_remaining_items_after_close_then_ends() {
    let queue = BoundedQueue::new(4);
    queue.try_push("a".to_string()).unwrap();
    queue.try_push("b".to_string()).unwrap();
    queue.close();

    assert_eq!(queue.pop().await, Some("a".to_string()));
    assert_eq!(queue.pop().await, Some("b".to_string()));
    assert_eq!(queue.pop().await, None);
    assert_eq!(queue.pop().await, None);
}

#[tokio::test]
async fn close_is_effective_only_once() {
    let queue: BoundedQueue<String> = BoundedQueue::new(4);
    assert!(queue.close());
    assert!(!queue.close());
}

#[tokio::test]
async fn blocking_push_waits_for_space() {
    let queue = Arc::new(BoundedQueue::new(1));
    queue.try_push("first".to_string()).unwrap();

    let writer = {
        let queue = Arc::clone(&queue);
        tokio::spawn(async move { queue.push("second".to_string()).await })
    };

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!writer.is_finished());

    assert_eq!(queue.pop().await, Some("first".to_string()));
    writer.await.unwrap().unwrap();
    assert_eq!(queue.pop().await, Some("second".to_string()));
}

#[tokio::test]
async fn close_wakes_blocked_consumer() {
    let queue: Arc<BoundedQueue<String>> = Arc::new(BoundedQueue::new(4));

    let reader = {
        let queue = Arc::clone(&queue);
        tokio::spawn(async move { queue.pop().await })
    };

    tokio::time::sleep(Duration::from_millis(20)).await;
    queue.close();
    assert_eq!(reader.await.unwrap(), None);
}

#[tokio::test]
async fn capacity_is_clamped_to_at_least_one() {
    let queue = BoundedQueue::new(0);
    assert_eq!(queue.capacity(), 1);
    queue.try_push("only".to_string()).unwrap();
    assert!(queue.try_push("extra".to_string()).is_err());
}
