//! Zenoh integration for chatter
//!
//! Network IPC over Zenoh:
//! - Session: opens a Zenoh session from `MiddlewareConfig`
//! - Publisher: puts encoded payloads on a key expression
//! - Subscriber: forwards received samples into a `SubscriberQueue`

pub mod publisher;
pub mod session;
pub mod subscriber;

pub use publisher::ZenohPublisher;
pub use session::{build_config, ZenohTransport};
