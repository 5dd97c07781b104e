use chatter_core::prelude::*;

/// Node name registered with the middleware
pub const NODE_NAME: &str = "Publisher";
pub const CHATTER_TOPIC: &str = "chatter";
pub const RATE_HZ: f64 = 10.0;

/// Text carried by each chatter message
///
/// Whole seconds keep a trailing `.0` so every stamp reads as a float.
pub fn greeting(t: f64) -> String {
    if t.fract() == 0.0 {
        format!("hello world {:.1}", t)
    } else {
        format!("hello world {}", t)
    }
}

/// Publishes a timestamped greeting every tick
pub struct Talker {
    chatter: Publisher<StringMsg>,
    clock: Clock,
}

impl Talker {
    pub fn new(session: &Session) -> ChatterResult<Self> {
        Self::with_clock(session, Clock::new())
    }

    pub fn with_clock(session: &Session, clock: Clock) -> ChatterResult<Self> {
        Ok(Self {
            chatter: session.advertise(CHATTER_TOPIC)?,
            clock,
        })
    }
}

impl Node for Talker {
    fn name(&self) -> &'static str {
        NODE_NAME
    }

    fn tick(&mut self, ctx: &mut NodeInfo) -> ChatterResult<()> {
        let hello = greeting(self.clock.now_secs());
        self.chatter.send(StringMsg::new(hello), Some(ctx))
    }
}

/// Publish until `scheduler`'s shutdown trips
pub fn run(session: &Session, scheduler: &Scheduler) -> ChatterResult<NodeInfo> {
    let mut talker = Talker::new(session)?;
    scheduler.run(&mut talker, RATE_HZ)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_greeting_format() {
        assert_eq!(greeting(1700000000.25), "hello world 1700000000.25");
        assert_eq!(greeting(0.0), "hello world 0.0");
        assert_eq!(greeting(100.0), "hello world 100.0");
    }

    #[test]
    fn test_tick_publishes_clock_reading() {
        let session = Session::open(NODE_NAME, &MiddlewareConfig::local()).unwrap();
        let chatter = session.subscribe::<StringMsg>(CHATTER_TOPIC, 0).unwrap();

        let ticks = Arc::new(AtomicU64::new(0));
        let source = ticks.clone();
        let clock = Clock::with_source(move || 100.0 + source.fetch_add(1, Ordering::SeqCst) as f64 * 0.5);
        let mut talker = Talker::with_clock(&session, clock).unwrap();
        let mut ctx = NodeInfo::new(talker.name());

        talker.tick(&mut ctx).unwrap();
        talker.tick(&mut ctx).unwrap();

        assert_eq!(chatter.try_recv(None).unwrap().unwrap().data, "hello world 100.0");
        assert_eq!(chatter.try_recv(None).unwrap().unwrap().data, "hello world 100.5");
        assert_eq!(ctx.metrics().messages_sent, 2);
        assert_eq!(ctx.published_topics().get("/chatter"), Some(&2));
    }
}
