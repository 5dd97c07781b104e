use crate::error::ChatterResult;
use std::collections::HashMap;
use std::fmt;
use std::time::{Duration, Instant};

/// Trait for providing lightweight logging summaries of message types
///
/// Used by the pub/sub logging helpers so large payloads can log a compact
/// description instead of their full contents.
pub trait LogSummary {
    /// Return a compact string representation suitable for logging
    fn log_summary(&self) -> String;
}

/// Node states for lifecycle management
///
/// A node is `Running` from construction until the process is told to stop;
/// the only transition is the externally triggered move to `ShuttingDown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
    Running,
    ShuttingDown,
}

impl fmt::Display for NodeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeState::Running => write!(f, "Running"),
            NodeState::ShuttingDown => write!(f, "ShuttingDown"),
        }
    }
}

/// Counters for node execution
#[derive(Debug, Clone, Default)]
pub struct NodeMetrics {
    pub total_ticks: u64,
    pub failed_ticks: u64,
    pub messages_sent: u64,
    pub messages_received: u64,
    pub errors_count: u64,
    pub warnings_count: u64,
}

/// Runtime context handed to a node by the scheduler
pub struct NodeInfo {
    name: String,
    instance_id: String,
    state: NodeState,
    metrics: NodeMetrics,
    creation_time: Instant,
    tick_start_time: Option<Instant>,

    // topic -> message count
    published_topics: HashMap<String, u64>,
    subscribed_topics: HashMap<String, u64>,
}

impl NodeInfo {
    pub fn new(node_name: impl Into<String>) -> Self {
        Self {
            name: node_name.into(),
            instance_id: uuid::Uuid::new_v4().to_string(),
            state: NodeState::Running,
            metrics: NodeMetrics::default(),
            creation_time: Instant::now(),
            tick_start_time: None,
            published_topics: HashMap::new(),
            subscribed_topics: HashMap::new(),
        }
    }

    // State Management Methods
    pub fn state(&self) -> NodeState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == NodeState::Running
    }

    /// Move to `ShuttingDown`. Idempotent.
    pub fn begin_shutdown(&mut self, reason: &str) {
        if self.state == NodeState::Running {
            self.state = NodeState::ShuttingDown;
            tracing::info!(node = %self.name, reason, "node shutting down");
        }
    }

    // Tick Management
    pub fn start_tick(&mut self) {
        self.tick_start_time = Some(Instant::now());
    }

    pub fn record_tick(&mut self) {
        self.metrics.total_ticks += 1;
        self.tick_start_time = None;
    }

    pub fn record_tick_failure(&mut self, error_msg: &str) {
        self.metrics.total_ticks += 1;
        self.metrics.failed_ticks += 1;
        self.tick_start_time = None;
        self.log_error(error_msg);
    }

    // Logging Methods
    pub fn log_pub<T: LogSummary>(&mut self, topic: &str, data: &T) {
        let summary = data.log_summary();
        self.log_pub_summary(topic, &summary);
    }

    pub fn log_sub<T: LogSummary>(&mut self, topic: &str, data: &T) {
        let summary = data.log_summary();
        self.log_sub_summary(topic, &summary);
    }

    /// Record a publish using a summary computed before the message was moved
    pub fn log_pub_summary(&mut self, topic: &str, summary: &str) {
        tracing::debug!(
            node = %self.name,
            topic,
            tick_us = self.current_tick_us(),
            "--PUB--> {}",
            summary
        );
        *self.published_topics.entry(topic.to_string()).or_insert(0) += 1;
        self.metrics.messages_sent += 1;
    }

    pub fn log_sub_summary(&mut self, topic: &str, summary: &str) {
        tracing::debug!(
            node = %self.name,
            topic,
            tick_us = self.current_tick_us(),
            "<--SUB-- {}",
            summary
        );
        *self.subscribed_topics.entry(topic.to_string()).or_insert(0) += 1;
        self.metrics.messages_received += 1;
    }

    pub fn log_info(&self, message: &str) {
        tracing::info!(node = %self.name, "{}", message);
    }

    pub fn log_warning(&mut self, message: &str) {
        tracing::warn!(node = %self.name, "{}", message);
        self.metrics.warnings_count += 1;
    }

    pub fn log_error(&mut self, message: &str) {
        tracing::error!(node = %self.name, "{}", message);
        self.metrics.errors_count += 1;
    }

    pub fn log_debug(&self, message: &str) {
        tracing::debug!(node = %self.name, "{}", message);
    }

    fn current_tick_us(&self) -> u64 {
        self.tick_start_time
            .map(|start| start.elapsed().as_micros() as u64)
            .unwrap_or(0)
    }

    // Getters
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }
    pub fn metrics(&self) -> &NodeMetrics {
        &self.metrics
    }
    pub fn published_topics(&self) -> &HashMap<String, u64> {
        &self.published_topics
    }
    pub fn subscribed_topics(&self) -> &HashMap<String, u64> {
        &self.subscribed_topics
    }
    pub fn uptime(&self) -> Duration {
        self.creation_time.elapsed()
    }
}

/// A periodically ticked computational unit
pub trait Node: Send {
    /// Get the node's name (must be unique)
    fn name(&self) -> &'static str;

    /// Initialize the node (called once at startup)
    fn init(&mut self, ctx: &mut NodeInfo) -> ChatterResult<()> {
        ctx.log_info("Node initialized successfully");
        Ok(())
    }

    /// Main execution step (called once per rate period)
    fn tick(&mut self, ctx: &mut NodeInfo) -> ChatterResult<()>;

    /// Shutdown the node (called once at cleanup)
    fn shutdown(&mut self, ctx: &mut NodeInfo) -> ChatterResult<()> {
        ctx.log_info("Node shutdown successfully");
        Ok(())
    }
}

impl LogSummary for bool {
    fn log_summary(&self) -> String {
        self.to_string()
    }
}

impl LogSummary for String {
    fn log_summary(&self) -> String {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_node_is_running() {
        let info = NodeInfo::new("talker");
        assert_eq!(info.state(), NodeState::Running);
        assert!(info.is_running());
        assert_eq!(info.name(), "talker");
        assert!(!info.instance_id().is_empty());
    }

    #[test]
    fn test_shutdown_transition_is_one_way() {
        let mut info = NodeInfo::new("talker");
        info.begin_shutdown("test");
        info.begin_shutdown("again");
        assert_eq!(info.state(), NodeState::ShuttingDown);
    }

    #[test]
    fn test_pub_sub_counters() {
        let mut info = NodeInfo::new("listener");
        info.log_sub("/chatter", &"hello".to_string());
        info.log_sub("/chatter", &"hello".to_string());
        info.log_pub("/got_it", &true);

        assert_eq!(info.subscribed_topics().get("/chatter"), Some(&2));
        assert_eq!(info.published_topics().get("/got_it"), Some(&1));
        assert_eq!(info.metrics().messages_received, 2);
        assert_eq!(info.metrics().messages_sent, 1);
    }

    #[test]
    fn test_tick_failure_counts_error() {
        let mut info = NodeInfo::new("talker");
        info.start_tick();
        info.record_tick_failure("boom");
        info.start_tick();
        info.record_tick();

        assert_eq!(info.metrics().total_ticks, 2);
        assert_eq!(info.metrics().failed_ticks, 1);
        assert_eq!(info.metrics().errors_count, 1);
    }
}
