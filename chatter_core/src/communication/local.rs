//! In-process transport
//!
//! Every node sharing one `LocalTransport` sees every other node's topics.
//! Delivery is synchronous: `put` pushes into each subscriber queue before it
//! returns. Key expressions match exactly; wildcards are not supported.

use super::traits::{RawPublisher, SubscriberQueue, SubscriptionGuard, Transport};
use crate::config::Backend;
use crate::error::ChatterResult;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Default)]
struct LocalBus {
    topics: Mutex<HashMap<String, Vec<(u64, SubscriberQueue)>>>,
    next_id: AtomicU64,
}

impl LocalBus {
    fn publish(&self, key_expr: &str, payload: Vec<u8>) {
        let topics = self.topics.lock();
        if let Some(queues) = topics.get(key_expr) {
            for (_, queue) in queues {
                queue.push(payload.clone());
            }
        }
    }

    fn remove(&self, key_expr: &str, id: u64) {
        let mut topics = self.topics.lock();
        if let Some(queues) = topics.get_mut(key_expr) {
            queues.retain(|(queue_id, _)| *queue_id != id);
            if queues.is_empty() {
                topics.remove(key_expr);
            }
        }
    }
}

/// Transport backed by an in-process topic table
#[derive(Clone, Default)]
pub struct LocalTransport {
    bus: Arc<LocalBus>,
}

impl LocalTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live subscriptions on a key expression
    pub fn subscriber_count(&self, key_expr: &str) -> usize {
        self.bus
            .topics
            .lock()
            .get(key_expr)
            .map_or(0, |queues| queues.len())
    }
}

struct LocalPublisher {
    bus: Arc<LocalBus>,
    key_expr: String,
}

impl RawPublisher for LocalPublisher {
    fn put(&self, payload: Vec<u8>) -> ChatterResult<()> {
        self.bus.publish(&self.key_expr, payload);
        Ok(())
    }

    fn key_expr(&self) -> &str {
        &self.key_expr
    }
}

struct LocalSubscription {
    bus: Arc<LocalBus>,
    key_expr: String,
    id: u64,
}

impl Drop for LocalSubscription {
    fn drop(&mut self) {
        self.bus.remove(&self.key_expr, self.id);
    }
}

impl Transport for LocalTransport {
    fn backend(&self) -> Backend {
        Backend::Local
    }

    fn declare_publisher(&self, key_expr: &str) -> ChatterResult<Arc<dyn RawPublisher>> {
        Ok(Arc::new(LocalPublisher {
            bus: self.bus.clone(),
            key_expr: key_expr.to_string(),
        }))
    }

    fn declare_subscriber(
        &self,
        key_expr: &str,
        queue: SubscriberQueue,
    ) -> ChatterResult<SubscriptionGuard> {
        let id = self.bus.next_id.fetch_add(1, Ordering::Relaxed);
        self.bus
            .topics
            .lock()
            .entry(key_expr.to_string())
            .or_default()
            .push((id, queue));
        tracing::debug!(key_expr, id, "local subscription declared");

        Ok(Box::new(LocalSubscription {
            bus: self.bus.clone(),
            key_expr: key_expr.to_string(),
            id,
        }))
    }
}
