//! Cooperative process shutdown
//!
//! A `Shutdown` is a one-shot latch. Loops check `is_triggered()` between
//! steps, and blocking waits select on `receiver()`, which disconnects the
//! moment the latch trips.

use crate::error::{ChatterError, ChatterResult};
use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Time given to a signalled process to wind down before it is terminated
pub const FORCE_EXIT_GRACE: Duration = Duration::from_secs(2);

struct Inner {
    triggered: AtomicBool,
    // Dropped on trigger so every receiver wakes with `Disconnected`
    sender: Mutex<Option<Sender<()>>>,
    receiver: Receiver<()>,
    reason: Mutex<Option<String>>,
}

/// Shared shutdown latch
#[derive(Clone)]
pub struct Shutdown {
    inner: Arc<Inner>,
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Shutdown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shutdown")
            .field("triggered", &self.is_triggered())
            .finish()
    }
}

impl Shutdown {
    pub fn new() -> Self {
        let (sender, receiver) = channel::bounded(0);
        Self {
            inner: Arc::new(Inner {
                triggered: AtomicBool::new(false),
                sender: Mutex::new(Some(sender)),
                receiver,
                reason: Mutex::new(None),
            }),
        }
    }

    /// Trip the latch on Ctrl+C or SIGTERM
    ///
    /// Only one handler can be installed per process. If the loops have not
    /// returned within `FORCE_EXIT_GRACE` after the signal, the process exits.
    pub fn install_signal_handler(&self) -> ChatterResult<()> {
        let shutdown = self.clone();
        ctrlc::set_handler(move || {
            shutdown.trigger("interrupt signal");
            std::thread::spawn(|| {
                std::thread::sleep(FORCE_EXIT_GRACE);
                tracing::warn!("Shutdown grace period expired, terminating");
                std::process::exit(0);
            });
        })
        .map_err(|e| ChatterError::Internal(format!("Failed to set signal handler: {}", e)))
    }

    /// Trip the latch. Later calls are ignored.
    pub fn trigger(&self, reason: &str) {
        if self.inner.triggered.swap(true, Ordering::SeqCst) {
            return;
        }
        *self.inner.reason.lock() = Some(reason.to_string());
        self.inner.sender.lock().take();
        tracing::info!(reason, "Shutdown requested");
    }

    pub fn is_triggered(&self) -> bool {
        self.inner.triggered.load(Ordering::SeqCst)
    }

    /// Why the latch tripped, once it has
    pub fn reason(&self) -> Option<String> {
        self.inner.reason.lock().clone()
    }

    /// Channel that disconnects on trigger, for use in `select!`
    pub fn receiver(&self) -> &Receiver<()> {
        &self.inner.receiver
    }

    /// Block until triggered
    pub fn wait(&self) {
        // Nothing is ever sent; recv only returns on disconnect
        let _ = self.inner.receiver.recv();
    }

    /// Block for at most `timeout`. Returns `true` if the latch tripped.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        match self.inner.receiver.recv_timeout(timeout) {
            Err(RecvTimeoutError::Timeout) => self.is_triggered(),
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_not_triggered_initially() {
        let shutdown = Shutdown::new();
        assert!(!shutdown.is_triggered());
        assert!(shutdown.reason().is_none());
        assert!(!shutdown.wait_timeout(Duration::from_millis(10)));
    }

    #[test]
    fn test_trigger_wakes_all_clones() {
        let shutdown = Shutdown::new();
        let waiters: Vec<_> = (0..3)
            .map(|_| {
                let s = shutdown.clone();
                std::thread::spawn(move || s.wait())
            })
            .collect();

        std::thread::sleep(Duration::from_millis(20));
        shutdown.trigger("test");
        for waiter in waiters {
            waiter.join().unwrap();
        }
        assert!(shutdown.is_triggered());
    }

    #[test]
    fn test_first_reason_wins() {
        let shutdown = Shutdown::new();
        shutdown.trigger("first");
        shutdown.trigger("second");
        assert_eq!(shutdown.reason().as_deref(), Some("first"));
    }

    #[test]
    fn test_wait_timeout_returns_early() {
        let shutdown = Shutdown::new();
        let trigger = shutdown.clone();
        std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(20));
            trigger.trigger("test");
        });

        let start = Instant::now();
        assert!(shutdown.wait_timeout(Duration::from_secs(5)));
        assert!(start.elapsed() < Duration::from_secs(2));
    }
}
