use super::hub::{Publisher, Subscriber};
use super::local::LocalTransport;
use super::names;
use super::traits::{SubscriberQueue, Transport};
use super::zenoh::ZenohTransport;
use crate::config::{Backend, MiddlewareConfig};
use crate::error::ChatterResult;
use crate::messages::Message;
use std::sync::Arc;

/// Open the transport selected by `config.backend`
pub fn open_transport(config: &MiddlewareConfig) -> ChatterResult<Arc<dyn Transport>> {
    config.validate()?;
    Ok(match config.backend {
        Backend::Zenoh => Arc::new(ZenohTransport::open(config)?),
        Backend::Local => Arc::new(LocalTransport::new()),
    })
}

/// A node's view of the middleware
///
/// Resolves topic names against the node's namespace and domain and hands
/// out typed publishers and subscribers on the shared transport.
#[derive(Clone)]
pub struct Session {
    node_name: String,
    namespace: String,
    domain_id: u32,
    transport: Arc<dyn Transport>,
}

impl Session {
    /// Open a fresh transport for `node_name`
    pub fn open(node_name: &str, config: &MiddlewareConfig) -> ChatterResult<Self> {
        let transport = open_transport(config)?;
        Ok(Self::with_transport(node_name, config, transport))
    }

    /// Attach `node_name` to an existing transport
    ///
    /// Nodes sharing a `LocalTransport` this way can reach each other.
    pub fn with_transport(
        node_name: &str,
        config: &MiddlewareConfig,
        transport: Arc<dyn Transport>,
    ) -> Self {
        tracing::debug!(
            node = node_name,
            backend = ?transport.backend(),
            domain_id = config.domain_id,
            namespace = %config.namespace,
            "Session attached"
        );
        Self {
            node_name: node_name.to_string(),
            namespace: config.namespace.clone(),
            domain_id: config.domain_id,
            transport,
        }
    }

    pub fn node_name(&self) -> &str {
        &self.node_name
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// Resolve a topic name for this node
    pub fn resolve(&self, topic: &str) -> ChatterResult<String> {
        names::resolve(topic, &self.namespace, &self.node_name)
    }

    /// Declare a publisher on `topic`
    pub fn advertise<T: Message>(&self, topic: &str) -> ChatterResult<Publisher<T>> {
        let resolved = self.resolve(topic)?;
        let key_expr = names::key_expr(self.domain_id, &resolved);
        let raw = self.transport.declare_publisher(&key_expr)?;

        tracing::info!(
            node = %self.node_name,
            topic = %resolved,
            type_name = T::TYPE_NAME,
            "Advertised"
        );
        Ok(Publisher::new(resolved, raw))
    }

    /// Subscribe to `topic`, buffering at most `queue_size` messages
    ///
    /// A full buffer drops its oldest message. `0` means unbounded.
    pub fn subscribe<T: Message>(&self, topic: &str, queue_size: usize) -> ChatterResult<Subscriber<T>> {
        let resolved = self.resolve(topic)?;
        let key_expr = names::key_expr(self.domain_id, &resolved);
        let (queue, rx) = SubscriberQueue::new(queue_size);
        let guard = self.transport.declare_subscriber(&key_expr, queue.clone())?;

        tracing::info!(
            node = %self.node_name,
            topic = %resolved,
            type_name = T::TYPE_NAME,
            queue_size,
            "Subscribed"
        );
        Ok(Subscriber::new(resolved, key_expr, rx, queue, guard))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::StringMsg;

    #[test]
    fn test_topics_resolve_in_namespace() {
        let config = MiddlewareConfig {
            namespace: "/robot1".to_string(),
            domain_id: 4,
            ..MiddlewareConfig::local()
        };
        let session = Session::open("Publisher", &config).unwrap();
        let publisher = session.advertise::<StringMsg>("chatter").unwrap();

        assert_eq!(publisher.topic(), "/robot1/chatter");
        assert_eq!(publisher.key_expr(), "4/robot1/chatter");
    }

    #[test]
    fn test_invalid_topic_rejected() {
        let session = Session::open("Publisher", &MiddlewareConfig::local()).unwrap();
        assert!(session.advertise::<StringMsg>("bad topic").is_err());
        assert!(session.subscribe::<StringMsg>("", 10).is_err());
        assert!(session.advertise::<StringMsg>("").is_err());
        assert!(session.advertise::<StringMsg>("/").is_err());
    }

    #[test]
    fn test_shared_transport_connects_nodes() {
        let config = MiddlewareConfig::local();
        let transport = open_transport(&config).unwrap();
        let talker = Session::with_transport("Publisher", &config, transport.clone());
        let listener = Session::with_transport("Subscriber", &config, transport);

        let subscriber = listener.subscribe::<StringMsg>("chatter", 10).unwrap();
        talker
            .advertise::<StringMsg>("/chatter")
            .unwrap()
            .send("hello".into(), None)
            .unwrap();

        assert_eq!(subscriber.try_recv(None).unwrap().unwrap().data, "hello");
    }

    #[test]
    fn test_separate_domains_do_not_mix() {
        let transport = open_transport(&MiddlewareConfig::local()).unwrap();
        let a = Session::with_transport(
            "a",
            &MiddlewareConfig { domain_id: 1, ..MiddlewareConfig::local() },
            transport.clone(),
        );
        let b = Session::with_transport(
            "b",
            &MiddlewareConfig { domain_id: 2, ..MiddlewareConfig::local() },
            transport,
        );

        let subscriber = b.subscribe::<StringMsg>("chatter", 10).unwrap();
        a.advertise::<StringMsg>("chatter").unwrap().send("x".into(), None).unwrap();

        assert!(subscriber.try_recv(None).unwrap().is_none());
    }
}
