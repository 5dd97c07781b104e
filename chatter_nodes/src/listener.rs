use chatter_core::prelude::*;
use std::io::Write;

/// Node name registered with the middleware
pub const NODE_NAME: &str = "Subscriber";
pub const CHATTER_TOPIC: &str = "chatter";
pub const ACK_TOPIC: &str = "got_it";
/// Incoming messages buffered before the oldest is dropped
pub const QUEUE_SIZE: usize = 10;

/// Echoes chatter messages and acknowledges each one on `got_it`
pub struct Listener<W: Write> {
    ack: Publisher<BoolMsg>,
    out: W,
}

impl<W: Write> Listener<W> {
    pub fn new(session: &Session, out: W) -> ChatterResult<Self> {
        Ok(Self {
            ack: session.advertise(ACK_TOPIC)?,
            out,
        })
    }

    /// Print `msg` on its own line, then publish the acknowledgement
    pub fn on_message(&mut self, msg: StringMsg, ctx: &mut NodeInfo) -> ChatterResult<()> {
        writeln!(self.out, "{}", msg)?;
        self.out.flush()?;
        self.ack.send(BoolMsg::new(true), Some(ctx))
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Listen until `scheduler`'s shutdown trips, echoing to `out`
///
/// The acknowledgement publisher is declared before the subscription so the
/// first delivered message can already be acknowledged.
pub fn run<W: Write>(session: &Session, scheduler: &Scheduler, out: W) -> ChatterResult<NodeInfo> {
    let mut listener = Listener::new(session, out)?;
    let chatter = session.subscribe::<StringMsg>(CHATTER_TOPIC, QUEUE_SIZE)?;

    let mut ctx = NodeInfo::new(NODE_NAME);
    scheduler.spin(&mut ctx, &chatter, |msg, ctx| listener.on_message(msg, ctx))?;

    if chatter.dropped() > 0 {
        tracing::warn!(dropped = chatter.dropped(), "Listener fell behind on {}", chatter.topic());
    }
    tracing::info!(
        node = NODE_NAME,
        received = ctx.metrics().messages_received,
        acked = ctx.metrics().messages_sent,
        "Node stopped"
    );
    Ok(ctx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_echoed_then_acked() {
        let session = Session::open(NODE_NAME, &MiddlewareConfig::local()).unwrap();
        let acks = session.subscribe::<BoolMsg>(ACK_TOPIC, 0).unwrap();
        let mut listener = Listener::new(&session, Vec::new()).unwrap();
        let mut ctx = NodeInfo::new(NODE_NAME);

        listener
            .on_message(StringMsg::new("hello world 1.5"), &mut ctx)
            .unwrap();
        listener.on_message(StringMsg::new("say \"hi\""), &mut ctx).unwrap();

        let printed = String::from_utf8(listener.into_inner()).unwrap();
        assert_eq!(printed, "data: \"hello world 1.5\"\ndata: \"say \\\"hi\\\"\"\n");
        assert!(acks.try_recv(None).unwrap().unwrap().data);
        assert!(acks.try_recv(None).unwrap().unwrap().data);
        assert!(acks.try_recv(None).unwrap().is_none());
    }

    #[test]
    fn test_failed_write_sends_no_ack() {
        struct Closed;
        impl Write for Closed {
            fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
                Err(std::io::ErrorKind::BrokenPipe.into())
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let session = Session::open(NODE_NAME, &MiddlewareConfig::local()).unwrap();
        let acks = session.subscribe::<BoolMsg>(ACK_TOPIC, 0).unwrap();
        let mut listener = Listener::new(&session, Closed).unwrap();
        let mut ctx = NodeInfo::new(NODE_NAME);

        assert!(listener.on_message(StringMsg::new("x"), &mut ctx).is_err());
        assert!(acks.try_recv(None).unwrap().is_none());
    }
}
