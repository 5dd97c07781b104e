//! # Communication layer for chatter
//!
//! - **Session**: a node's handle on the middleware; resolves names and
//!   declares typed publishers/subscribers
//! - **Publisher / Subscriber**: typed endpoints with JSON payloads
//! - **Transports**: Zenoh for real deployments, an in-process bus for tests
//!
//! ```rust,no_run
//! use chatter_core::communication::Session;
//! use chatter_core::config::MiddlewareConfig;
//! use chatter_core::messages::StringMsg;
//!
//! let session = Session::open("Publisher", &MiddlewareConfig::load()?)?;
//! let chatter = session.advertise::<StringMsg>("chatter")?;
//! chatter.send(StringMsg::new("hello world"), None)?;
//! # Ok::<(), chatter_core::ChatterError>(())
//! ```

pub mod hub;
pub mod local;
pub mod names;
pub mod session;
pub mod traits;
pub mod zenoh;

pub use hub::{HubMetrics, Publisher, Received, Subscriber};
pub use local::LocalTransport;
pub use session::{open_transport, Session};
pub use traits::{RawPublisher, SubscriberQueue, Transport};
