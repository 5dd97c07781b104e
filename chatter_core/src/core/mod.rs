//! # Core types and traits for chatter nodes
//!
//! Node lifecycle:
//! 1. **Construction** - node is created with its publishers/subscribers
//! 2. **Initialization** - `init()` is called once
//! 3. **Execution** - `tick()` is called at the node's rate
//! 4. **Shutdown** - `shutdown()` is called once the shutdown signal fires

pub mod node;

pub use node::{LogSummary, Node, NodeInfo, NodeMetrics, NodeState};
