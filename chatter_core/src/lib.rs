//! # chatter core
//!
//! Runtime pieces shared by the `talker` and `listener` test nodes:
//!
//! - **Nodes**: lifecycle trait and per-node context
//! - **Communication**: typed pub/sub over Zenoh or an in-process bus
//! - **Scheduling**: fixed-rate ticking, subscription spinning, shutdown
//! - **Messages**: `std_msgs/String` and `std_msgs/Bool`
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chatter_core::prelude::*;
//!
//! struct Greeter {
//!     output: Publisher<StringMsg>,
//! }
//!
//! impl Node for Greeter {
//!     fn name(&self) -> &'static str { "greeter" }
//!
//!     fn tick(&mut self, ctx: &mut NodeInfo) -> ChatterResult<()> {
//!         self.output.send(StringMsg::new("hello"), Some(ctx))
//!     }
//! }
//!
//! let session = Session::open("greeter", &MiddlewareConfig::load()?)?;
//! let mut greeter = Greeter { output: session.advertise("chatter")? };
//! Scheduler::new(Shutdown::new()).run(&mut greeter, 10.0)?;
//! # Ok::<(), ChatterError>(())
//! ```

pub mod communication;
pub mod config;
pub mod core;
pub mod error;
pub mod messages;
pub mod scheduling;

pub use crate::communication::{Publisher, Session, Subscriber};
pub use crate::config::MiddlewareConfig;
pub use crate::core::{Node, NodeInfo, NodeState};
pub use crate::error::{ChatterError, ChatterResult};
pub use crate::scheduling::{Clock, Rate, Scheduler, Shutdown};

/// Everything a node implementation needs
pub mod prelude {
    pub use crate::communication::{Publisher, Received, Session, Subscriber};
    pub use crate::config::MiddlewareConfig;
    pub use crate::core::{LogSummary, Node, NodeInfo, NodeState};
    pub use crate::error::{ChatterError, ChatterResult};
    pub use crate::messages::{BoolMsg, Message, StringMsg};
    pub use crate::scheduling::{Clock, Rate, Scheduler, Shutdown};
}
