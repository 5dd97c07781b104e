use super::rate::Rate;
use super::shutdown::Shutdown;
use crate::communication::hub::{Received, Subscriber};
use crate::core::{Node, NodeInfo};
use crate::error::{ChatterError, ChatterResult};
use crate::messages::Message;

/// Drives nodes until the shutdown latch trips
///
/// Two loop shapes are supported: `run` ticks a node at a fixed rate, and
/// `spin` hands each message of a subscription to a callback.
pub struct Scheduler {
    shutdown: Shutdown,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(Shutdown::new())
    }
}

impl Scheduler {
    pub fn new(shutdown: Shutdown) -> Self {
        Self { shutdown }
    }

    pub fn shutdown(&self) -> &Shutdown {
        &self.shutdown
    }

    /// Tick `node` at `rate_hz` until shutdown
    ///
    /// A failing tick is logged and counted; the loop keeps its rate.
    /// Returns the node's context so callers can inspect its counters.
    pub fn run(&self, node: &mut dyn Node, rate_hz: f64) -> ChatterResult<NodeInfo> {
        let mut ctx = NodeInfo::new(node.name());
        let mut rate = Rate::new(rate_hz, self.shutdown.clone())?;

        node.init(&mut ctx)?;
        tracing::info!(node = node.name(), rate_hz, "Node running");

        while !self.shutdown.is_triggered() {
            ctx.start_tick();
            match node.tick(&mut ctx) {
                Ok(()) => ctx.record_tick(),
                Err(e) => ctx.record_tick_failure(&format!("Tick failed: {}", e)),
            }

            if !rate.sleep() {
                break;
            }
        }

        self.finish(node, ctx)
    }

    /// Deliver every message on `subscriber` to `callback` until shutdown
    ///
    /// Payloads that fail to decode are logged and skipped, as are callback
    /// errors. Only a broken subscription ends the loop early.
    pub fn spin<T, F>(
        &self,
        ctx: &mut NodeInfo,
        subscriber: &Subscriber<T>,
        mut callback: F,
    ) -> ChatterResult<()>
    where
        T: Message,
        F: FnMut(T, &mut NodeInfo) -> ChatterResult<()>,
    {
        tracing::info!(node = ctx.name(), topic = subscriber.topic(), "Spinning");

        loop {
            match subscriber.recv(&self.shutdown, Some(&mut *ctx)) {
                Ok(Received::Message(msg)) => {
                    if let Err(e) = callback(msg, ctx) {
                        ctx.log_error(&format!("Callback failed: {}", e));
                    }
                }
                Ok(Received::Shutdown) => break,
                Err(e @ ChatterError::Deserialization { .. }) => {
                    ctx.log_warning(&format!("Dropping message on {}: {}", subscriber.topic(), e));
                }
                Err(e) => return Err(e),
            }
        }

        ctx.begin_shutdown(&self.shutdown_reason());
        Ok(())
    }

    fn finish(&self, node: &mut dyn Node, mut ctx: NodeInfo) -> ChatterResult<NodeInfo> {
        ctx.begin_shutdown(&self.shutdown_reason());
        node.shutdown(&mut ctx)?;
        tracing::info!(
            node = node.name(),
            ticks = ctx.metrics().total_ticks,
            sent = ctx.metrics().messages_sent,
            "Node stopped"
        );
        Ok(ctx)
    }

    fn shutdown_reason(&self) -> String {
        self.shutdown
            .reason()
            .unwrap_or_else(|| "shutdown".to_string())
    }
}
