//! Zenoh session management

use super::publisher::ZenohPublisher;
use super::subscriber;
use crate::communication::traits::{RawPublisher, SubscriberQueue, SubscriptionGuard, Transport};
use crate::config::{Backend, MiddlewareConfig};
use crate::error::{ChatterError, ChatterResult};
use std::sync::Arc;
use zenoh::Wait;

/// Translate `MiddlewareConfig` into a native Zenoh config
///
/// A native config file, when given, is loaded first; the explicit fields
/// are layered on top of it.
pub fn build_config(config: &MiddlewareConfig) -> ChatterResult<zenoh::Config> {
    let mut zconfig = match &config.zenoh_config {
        Some(path) => zenoh::Config::from_file(path).map_err(|e| {
            ChatterError::config(format!(
                "Failed to load Zenoh config {}: {}",
                path.display(),
                e
            ))
        })?,
        None => zenoh::Config::default(),
    };

    insert(&mut zconfig, "mode", &json_string(config.mode.as_str()))?;
    if !config.connect.is_empty() {
        insert(&mut zconfig, "connect/endpoints", &json_list(&config.connect))?;
    }
    if !config.listen.is_empty() {
        insert(&mut zconfig, "listen/endpoints", &json_list(&config.listen))?;
    }
    insert(
        &mut zconfig,
        "scouting/multicast/enabled",
        if config.multicast_scouting { "true" } else { "false" },
    )?;

    Ok(zconfig)
}

fn insert(zconfig: &mut zenoh::Config, key: &str, value: &str) -> ChatterResult<()> {
    zconfig
        .insert_json5(key, value)
        .map_err(|e| ChatterError::config(format!("Invalid Zenoh setting {}={}: {}", key, value, e)))
}

fn json_string(value: &str) -> String {
    serde_json::Value::from(value).to_string()
}

fn json_list(values: &[String]) -> String {
    serde_json::Value::from(values.to_vec()).to_string()
}

/// Transport over a Zenoh session
pub struct ZenohTransport {
    session: zenoh::Session,
}

impl ZenohTransport {
    /// Open a Zenoh session described by `config`
    pub fn open(config: &MiddlewareConfig) -> ChatterResult<Self> {
        let zconfig = build_config(config)?;
        tracing::info!(mode = config.mode.as_str(), "Connecting to Zenoh network");

        let session = zenoh::open(zconfig)
            .wait()
            .map_err(|e| ChatterError::Session(format!("Failed to open Zenoh session: {}", e)))?;

        tracing::info!(zid = %session.zid(), "Zenoh session established");
        Ok(Self {
            session,
        })
    }
}

impl Transport for ZenohTransport {
    fn backend(&self) -> Backend {
        Backend::Zenoh
    }

    fn declare_publisher(&self, key_expr: &str) -> ChatterResult<Arc<dyn RawPublisher>> {
        Ok(Arc::new(ZenohPublisher::declare(&self.session, key_expr)?))
    }

    fn declare_subscriber(
        &self,
        key_expr: &str,
        queue: SubscriberQueue,
    ) -> ChatterResult<SubscriptionGuard> {
        let subscriber = subscriber::declare(&self.session, key_expr, queue)?;
        Ok(Box::new(subscriber))
    }
}
