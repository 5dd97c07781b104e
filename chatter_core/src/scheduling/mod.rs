//! # Scheduling for chatter nodes
//!
//! - **Scheduler**: ticks a node at a fixed rate, or spins on a subscription
//! - **Rate**: fixed-frequency pacing
//! - **Shutdown**: cooperative stop signal wired to Ctrl+C / SIGTERM
//! - **Clock**: monotone wall-clock stamps
//!
//! ## Usage
//!
//! ```rust,ignore
//! let shutdown = Shutdown::new();
//! shutdown.install_signal_handler()?;
//! let scheduler = Scheduler::new(shutdown);
//! scheduler.run(&mut talker, 10.0)?; // returns once Ctrl+C is pressed
//! ```

pub mod clock;
pub mod rate;
pub mod scheduler;
pub mod shutdown;

pub use clock::Clock;
pub use rate::Rate;
pub use scheduler::Scheduler;
pub use shutdown::Shutdown;
