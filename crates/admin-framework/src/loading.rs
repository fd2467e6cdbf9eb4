//! # Loading Guard
//!
//! A busy flag with a safety deadline. Starting a load raises the flag and
//! arms a timer; the timer lowers the flag if nobody else does first, so a
//! request that never settles cannot leave a view spinning forever. The
//! deadline only clears the flag. It never cancels the request itself.
//!
//! Flag and generation share one atomic word (bit 0 is the flag, the rest is
//! the generation). A deadline armed for an older load can therefore never
//! clear the flag of a newer one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Deadline applied when no timeout is configured.
pub const DEFAULT_LOADING_TIMEOUT: Duration = Duration::from_millis(5000);

const BUSY: u64 = 1;

/// Busy flag with an auto-clearing deadline. At most one deadline is live.
#[derive(Debug)]
pub struct LoadingGuard {
    state: Arc<AtomicU64>,
    generation: u64,
    timeout: Duration,
    deadline: Option<JoinHandle<()>>,
}

impl Default for LoadingGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadingGuard {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_LOADING_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            state: Arc::new(AtomicU64::new(0)),
            generation: 0,
            timeout,
            deadline: None,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn is_loading(&self) -> bool {
        self.state.load(Ordering::SeqCst) & BUSY == BUSY
    }

    /// Raises the flag and (re)arms the deadline. Any earlier deadline is cancelled.
    pub fn start_loading(&mut self) {
        self.cancel_deadline();
        self.generation += 1;
        let armed = (self.generation << 1) | BUSY;
        self.state.store(armed, Ordering::SeqCst);

        let state = Arc::clone(&self.state);
        let timeout = self.timeout;
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                self.deadline = Some(runtime.spawn(async move {
                    tokio::time::sleep(timeout).await;
                    if state
                        .compare_exchange(armed, armed & !BUSY, Ordering::SeqCst, Ordering::SeqCst)
                        .is_ok()
                    {
                        debug!(?timeout, "Loading deadline elapsed, clearing busy flag");
                    }
                }));
            }
            Err(_) => warn!("No async runtime, loading deadline not armed"),
        }
    }

    /// Lowers the flag and cancels the pending deadline.
    pub fn stop_loading(&mut self) {
        self.cancel_deadline();
        self.state.store(self.generation << 1, Ordering::SeqCst);
    }

    fn cancel_deadline(&mut self) {
        if let Some(handle) = self.deadline.take() {
            handle.abort();
        }
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.cancel_deadline();
    }
}
