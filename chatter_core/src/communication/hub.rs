use super::traits::{RawPublisher, SubscriberQueue, SubscriptionGuard};
use crate::core::node::NodeInfo;
use crate::error::{ChatterError, ChatterResult};
use crate::messages::Message;
use crate::scheduling::Shutdown;
use crossbeam::channel::{Receiver, RecvTimeoutError, TryRecvError};
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Lock-free counters shared by clones of a publisher or subscriber
#[derive(Debug, Default)]
pub struct AtomicHubMetrics {
    pub messages_sent: AtomicU64,
    pub messages_received: AtomicU64,
    pub send_failures: AtomicU64,
    pub recv_failures: AtomicU64,
}

impl AtomicHubMetrics {
    /// Get current metrics snapshot
    pub fn snapshot(&self) -> HubMetrics {
        HubMetrics {
            messages_sent: self.messages_sent.load(Ordering::Relaxed),
            messages_received: self.messages_received.load(Ordering::Relaxed),
            send_failures: self.send_failures.load(Ordering::Relaxed),
            recv_failures: self.recv_failures.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HubMetrics {
    pub messages_sent: u64,
    pub messages_received: u64,
    pub send_failures: u64,
    pub recv_failures: u64,
}

/// Typed publisher bound to one resolved topic
pub struct Publisher<T> {
    topic: String,
    raw: Arc<dyn RawPublisher>,
    metrics: Arc<AtomicHubMetrics>,
    _phantom: PhantomData<fn(T)>,
}

impl<T> Clone for Publisher<T> {
    fn clone(&self) -> Self {
        Self {
            topic: self.topic.clone(),
            raw: self.raw.clone(),
            metrics: self.metrics.clone(),
            _phantom: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for Publisher<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Publisher")
            .field("topic", &self.topic)
            .field("key_expr", &self.raw.key_expr())
            .finish_non_exhaustive()
    }
}

impl<T: Message> Publisher<T> {
    pub fn new(topic: impl Into<String>, raw: Arc<dyn RawPublisher>) -> Self {
        Self {
            topic: topic.into(),
            raw,
            metrics: Arc::new(AtomicHubMetrics::default()),
            _phantom: PhantomData,
        }
    }

    /// Encode and publish `msg`
    ///
    /// When `ctx` is given the publish is recorded against the node.
    pub fn send(&self, msg: T, ctx: Option<&mut NodeInfo>) -> ChatterResult<()> {
        let payload = msg.encode()?;
        // Summary taken before the message is dropped
        let summary = ctx.as_ref().map(|_| msg.log_summary());

        match self.raw.put(payload) {
            Ok(()) => {
                self.metrics.messages_sent.fetch_add(1, Ordering::Relaxed);
                if let (Some(ctx), Some(summary)) = (ctx, summary) {
                    ctx.log_pub_summary(&self.topic, &summary);
                }
                Ok(())
            }
            Err(e) => {
                self.metrics.send_failures.fetch_add(1, Ordering::Relaxed);
                Err(e)
            }
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn key_expr(&self) -> &str {
        self.raw.key_expr()
    }

    pub fn metrics(&self) -> HubMetrics {
        self.metrics.snapshot()
    }
}

/// Outcome of a blocking receive
#[derive(Debug, Clone, PartialEq)]
pub enum Received<T> {
    Message(T),
    Shutdown,
}

/// Typed subscriber bound to one resolved topic
///
/// Dropping it undeclares the subscription.
pub struct Subscriber<T> {
    topic: String,
    key_expr: String,
    rx: Receiver<Vec<u8>>,
    queue: SubscriberQueue,
    metrics: Arc<AtomicHubMetrics>,
    _guard: SubscriptionGuard,
    _phantom: PhantomData<fn() -> T>,
}

impl<T> std::fmt::Debug for Subscriber<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscriber")
            .field("topic", &self.topic)
            .field("key_expr", &self.key_expr)
            .field("pending", &self.rx.len())
            .finish_non_exhaustive()
    }
}

impl<T: Message> Subscriber<T> {
    pub fn new(
        topic: impl Into<String>,
        key_expr: impl Into<String>,
        rx: Receiver<Vec<u8>>,
        queue: SubscriberQueue,
        guard: SubscriptionGuard,
    ) -> Self {
        Self {
            topic: topic.into(),
            key_expr: key_expr.into(),
            rx,
            queue,
            metrics: Arc::new(AtomicHubMetrics::default()),
            _guard: guard,
            _phantom: PhantomData,
        }
    }

    /// Receive a message without blocking
    pub fn try_recv(&self, ctx: Option<&mut NodeInfo>) -> ChatterResult<Option<T>> {
        match self.rx.try_recv() {
            Ok(payload) => self.decode(payload, ctx).map(Some),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(ChatterError::Disconnected(self.topic.clone())),
        }
    }

    /// Block until a message arrives or `shutdown` fires
    pub fn recv(&self, shutdown: &Shutdown, ctx: Option<&mut NodeInfo>) -> ChatterResult<Received<T>> {
        if shutdown.is_triggered() {
            return Ok(Received::Shutdown);
        }

        crossbeam::channel::select! {
            recv(self.rx) -> payload => match payload {
                Ok(payload) => self.decode(payload, ctx).map(Received::Message),
                Err(_) => Err(ChatterError::Disconnected(self.topic.clone())),
            },
            recv(shutdown.receiver()) -> _ => Ok(Received::Shutdown),
        }
    }

    /// Block for at most `timeout`
    pub fn recv_timeout(&self, timeout: Duration, ctx: Option<&mut NodeInfo>) -> ChatterResult<Option<T>> {
        match self.rx.recv_timeout(timeout) {
            Ok(payload) => self.decode(payload, ctx).map(Some),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => {
                Err(ChatterError::Disconnected(self.topic.clone()))
            }
        }
    }

    fn decode(&self, payload: Vec<u8>, ctx: Option<&mut NodeInfo>) -> ChatterResult<T> {
        match T::decode(&payload) {
            Ok(msg) => {
                self.metrics.messages_received.fetch_add(1, Ordering::Relaxed);
                if let Some(ctx) = ctx {
                    ctx.log_sub(&self.topic, &msg);
                }
                Ok(msg)
            }
            Err(e) => {
                self.metrics.recv_failures.fetch_add(1, Ordering::Relaxed);
                Err(e)
            }
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn key_expr(&self) -> &str {
        &self.key_expr
    }

    /// Messages waiting to be received
    pub fn pending(&self) -> usize {
        self.rx.len()
    }

    /// Messages evicted because the queue was full
    pub fn dropped(&self) -> u64 {
        self.queue.dropped()
    }

    pub fn metrics(&self) -> HubMetrics {
        self.metrics.snapshot()
    }
}
