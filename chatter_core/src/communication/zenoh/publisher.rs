//! Zenoh publisher

use crate::communication::traits::RawPublisher;
use crate::error::{ChatterError, ChatterResult};
use zenoh::Wait;

/// Wrapper around a declared Zenoh publisher
pub struct ZenohPublisher {
    publisher: zenoh::pubsub::Publisher<'static>,
    key_expr: String,
}

impl ZenohPublisher {
    pub(super) fn declare(session: &zenoh::Session, key_expr: &str) -> ChatterResult<Self> {
        let publisher = session
            .declare_publisher(key_expr.to_string())
            .wait()
            .map_err(|e| ChatterError::Publisher {
                topic: key_expr.to_string(),
                message: e.to_string(),
            })?;

        tracing::debug!(key_expr, "Zenoh publisher declared");
        Ok(Self {
            publisher,
            key_expr: key_expr.to_string(),
        })
    }
}

impl RawPublisher for ZenohPublisher {
    fn put(&self, payload: Vec<u8>) -> ChatterResult<()> {
        self.publisher
            .put(payload)
            .wait()
            .map_err(|e| ChatterError::Send {
                topic: self.key_expr.clone(),
                message: e.to_string(),
            })
    }

    fn key_expr(&self) -> &str {
        &self.key_expr
    }
}
