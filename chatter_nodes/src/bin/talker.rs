use anyhow::Context;
use chatter_core::{MiddlewareConfig, Scheduler, Session, Shutdown};
use chatter_nodes::{logging, talker};

fn main() -> anyhow::Result<()> {
    logging::init();

    let config = MiddlewareConfig::load().context("Failed to load middleware configuration")?;
    let shutdown = Shutdown::new();
    shutdown
        .install_signal_handler()
        .context("Failed to install signal handler")?;

    let session = Session::open(talker::NODE_NAME, &config)
        .context("Failed to connect to the middleware")?;
    let scheduler = Scheduler::new(shutdown);

    talker::run(&session, &scheduler).context("Talker failed")?;
    Ok(())
}
