//! Zenoh subscriber

use crate::communication::traits::SubscriberQueue;
use crate::error::{ChatterError, ChatterResult};
use zenoh::Wait;

/// Declare a callback subscriber that feeds raw payloads into `queue`
///
/// The callback runs on a Zenoh thread and never blocks: a full queue evicts
/// its oldest entry.
pub(super) fn declare(
    session: &zenoh::Session,
    key_expr: &str,
    queue: SubscriberQueue,
) -> ChatterResult<zenoh::pubsub::Subscriber<()>> {
    let subscriber = session
        .declare_subscriber(key_expr.to_string())
        .callback(move |sample| {
            queue.push(sample.payload().to_bytes().into_owned());
        })
        .wait()
        .map_err(|e| ChatterError::Subscriber {
            topic: key_expr.to_string(),
            message: e.to_string(),
        })?;

    tracing::debug!(key_expr, "Zenoh subscriber declared");
    Ok(subscriber)
}
