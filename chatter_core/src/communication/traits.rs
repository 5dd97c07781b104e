//! Common traits for all transports in chatter
//!
//! Transports move opaque byte payloads between key expressions. Typed
//! publishers and subscribers (see `hub.rs`) sit on top and own encoding, so
//! the Zenoh and in-process backends can be swapped without touching nodes.

use crate::config::Backend;
use crate::error::ChatterResult;
use crossbeam::channel::{self, Receiver, Sender, TrySendError};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Byte sink for one declared topic
pub trait RawPublisher: Send + Sync {
    /// Hand one payload to the middleware
    fn put(&self, payload: Vec<u8>) -> ChatterResult<()>;

    /// Key expression this publisher writes to
    fn key_expr(&self) -> &str;
}

/// Keeps a subscription alive; dropping it undeclares the subscription
pub type SubscriptionGuard = Box<dyn std::any::Any + Send>;

/// A middleware session able to declare publishers and subscribers
pub trait Transport: Send + Sync {
    fn backend(&self) -> Backend;

    fn declare_publisher(&self, key_expr: &str) -> ChatterResult<Arc<dyn RawPublisher>>;

    /// Deliver every payload published on `key_expr` into `queue`
    fn declare_subscriber(
        &self,
        key_expr: &str,
        queue: SubscriberQueue,
    ) -> ChatterResult<SubscriptionGuard>;
}

/// Bounded inbox between a transport's delivery thread and a subscriber
///
/// When full, the oldest pending payload is dropped to make room, matching
/// the usual ROS `queue_size` behavior. A capacity of 0 means unbounded.
#[derive(Clone)]
pub struct SubscriberQueue {
    tx: Sender<Vec<u8>>,
    // Second handle on the receiving end, used only to evict the oldest entry
    evict: Receiver<Vec<u8>>,
    dropped: Arc<AtomicU64>,
}

impl SubscriberQueue {
    pub fn new(capacity: usize) -> (Self, Receiver<Vec<u8>>) {
        let (tx, rx) = if capacity == 0 {
            channel::unbounded()
        } else {
            channel::bounded(capacity)
        };
        let queue = Self {
            tx,
            evict: rx.clone(),
            dropped: Arc::new(AtomicU64::new(0)),
        };
        (queue, rx)
    }

    /// Enqueue a payload, evicting the oldest one if the queue is full
    pub fn push(&self, mut payload: Vec<u8>) {
        loop {
            match self.tx.try_send(payload) {
                Ok(()) => return,
                Err(TrySendError::Full(returned)) => {
                    if self.evict.try_recv().is_ok() {
                        self.dropped.fetch_add(1, Ordering::Relaxed);
                    }
                    payload = returned;
                }
                // Unreachable while `evict` is alive
                Err(TrySendError::Disconnected(_)) => return,
            }
        }
    }

    /// Number of payloads evicted because the queue was full
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_drops_oldest_when_full() {
        let (queue, rx) = SubscriberQueue::new(2);
        queue.push(vec![1]);
        queue.push(vec![2]);
        queue.push(vec![3]);

        assert_eq!(rx.try_recv().unwrap(), vec![2]);
        assert_eq!(rx.try_recv().unwrap(), vec![3]);
        assert!(rx.try_recv().is_err());
        assert_eq!(queue.dropped(), 1);
    }

    #[test]
    fn test_unbounded_queue() {
        let (queue, rx) = SubscriberQueue::new(0);
        for i in 0..100u8 {
            queue.push(vec![i]);
        }
        assert_eq!(rx.len(), 100);
        assert_eq!(queue.dropped(), 0);
    }
}
