//! Test nodes exercising a pub/sub round trip
//!
//! - [`talker`] publishes `hello world <t>` on `chatter` at 10 Hz
//! - [`listener`] echoes every `chatter` message to stdout and acknowledges
//!   it with `true` on `got_it`
//!
//! Both are usable as libraries so they can run against a shared in-process
//! transport; the `talker` and `listener` binaries wrap them for the real
//! middleware.

pub mod listener;
pub mod logging;
pub mod talker;
