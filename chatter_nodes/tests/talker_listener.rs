use chatter_core::communication::LocalTransport;
use chatter_core::messages::BoolMsg;
use chatter_core::{MiddlewareConfig, Scheduler, Session, Shutdown};
use chatter_nodes::{listener, talker};
use std::io::Write;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// Stdout stand-in shared between the listener thread and the test
#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl SharedBuf {
    fn lines(&self) -> Vec<String> {
        let bytes = self.0.lock().unwrap().clone();
        String::from_utf8(bytes)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

struct Graph {
    config: MiddlewareConfig,
    transport: Arc<LocalTransport>,
    shutdown: Shutdown,
}

impl Graph {
    fn new() -> Self {
        Self {
            config: MiddlewareConfig::local(),
            transport: Arc::new(LocalTransport::new()),
            shutdown: Shutdown::new(),
        }
    }

    fn session(&self, node_name: &str) -> Session {
        Session::with_transport(node_name, &self.config, self.transport.clone())
    }

    fn spawn_listener(&self, out: SharedBuf) -> thread::JoinHandle<u64> {
        let session = self.session(listener::NODE_NAME);
        let scheduler = Scheduler::new(self.shutdown.clone());
        thread::spawn(move || {
            let ctx = listener::run(&session, &scheduler, out).unwrap();
            ctx.metrics().messages_sent
        })
    }

    fn spawn_talker(&self) -> thread::JoinHandle<u64> {
        let session = self.session(talker::NODE_NAME);
        let scheduler = Scheduler::new(self.shutdown.clone());
        thread::spawn(move || {
            let ctx = talker::run(&session, &scheduler).unwrap();
            ctx.metrics().messages_sent
        })
    }
}

/// Stamp carried by a `data: "hello world <t>"` line
fn stamp(line: &str) -> f64 {
    let text = line
        .strip_prefix("data: \"hello world ")
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or_else(|| panic!("unexpected line: {}", line));
    text.parse().unwrap_or_else(|_| panic!("bad stamp in: {}", line))
}

fn wait_for_subscriber(transport: &LocalTransport, key_expr: &str) {
    for _ in 0..200 {
        if transport.subscriber_count(key_expr) > 0 {
            return;
        }
        thread::sleep(Duration::from_millis(5));
    }
    panic!("no subscriber appeared on {}", key_expr);
}

#[test]
fn test_talker_reaches_listener_and_is_acknowledged() {
    let graph = Graph::new();
    let observer = graph.session("observer");
    let acks = observer.subscribe::<BoolMsg>(listener::ACK_TOPIC, 0).unwrap();

    let out = SharedBuf::default();
    let listener_handle = graph.spawn_listener(out.clone());
    wait_for_subscriber(&graph.transport, "0/chatter");

    let talker_handle = graph.spawn_talker();
    thread::sleep(Duration::from_millis(1050));
    graph.shutdown.trigger("test over");

    let sent = talker_handle.join().unwrap();
    let acked = listener_handle.join().unwrap();

    // 10 Hz for about a second
    assert!((9..=12).contains(&sent), "sent = {}", sent);

    let lines = out.lines();
    assert_eq!(lines.len() as u64, sent);
    let stamps: Vec<f64> = lines.iter().map(|l| stamp(l)).collect();
    assert!(stamps.iter().all(|t| *t >= 0.0));
    assert!(stamps.windows(2).all(|w| w[0] <= w[1]), "stamps = {:?}", stamps);

    assert_eq!(acked, sent);
    let mut received = 0;
    while let Some(ack) = acks.try_recv(None).unwrap() {
        assert!(ack.data);
        received += 1;
    }
    assert_eq!(received, sent);
}

#[test]
fn test_listener_alone_waits_silently() {
    let graph = Graph::new();
    let observer = graph.session("observer");
    let acks = observer.subscribe::<BoolMsg>(listener::ACK_TOPIC, 0).unwrap();

    let out = SharedBuf::default();
    let handle = graph.spawn_listener(out.clone());
    thread::sleep(Duration::from_millis(300));

    assert!(!handle.is_finished());
    assert!(out.lines().is_empty());
    assert!(acks.try_recv(None).unwrap().is_none());

    graph.shutdown.trigger("test over");
    assert_eq!(handle.join().unwrap(), 0);
}

#[test]
fn test_talker_alone_publishes_without_subscribers() {
    let graph = Graph::new();
    let handle = graph.spawn_talker();
    thread::sleep(Duration::from_millis(250));
    graph.shutdown.trigger("test over");

    assert!(handle.join().unwrap() >= 2);
}

#[test]
fn test_no_traffic_after_shutdown() {
    let graph = Graph::new();
    let observer = graph.session("observer");
    let chatter = observer
        .subscribe::<chatter_core::messages::StringMsg>(talker::CHATTER_TOPIC, 0)
        .unwrap();

    let handle = graph.spawn_talker();
    thread::sleep(Duration::from_millis(250));
    graph.shutdown.trigger("test over");
    let sent = handle.join().unwrap();

    let mut before = 0;
    while chatter.try_recv(None).unwrap().is_some() {
        before += 1;
    }
    assert_eq!(before, sent);

    thread::sleep(Duration::from_millis(300));
    assert!(chatter.try_recv(None).unwrap().is_none());
}
