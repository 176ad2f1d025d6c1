//! One-request-at-a-time flag shared by the views that talk to the API.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Set while a view has a request in flight.
///
/// Clones observe the same flag, so a front-end can show a spinner while the
/// view is awaiting.
#[derive(Debug, Clone, Default)]
pub struct BusyFlag(Arc<AtomicBool>);

impl BusyFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Mark the flag busy. `None` if it is already held.
    pub fn try_acquire(&self) -> Option<BusyGuard> {
        self.0
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| BusyGuard(self.0.clone()))
    }
}

/// Clears its [`BusyFlag`] when dropped, also when the request future that
/// holds it is cancelled.
#[derive(Debug)]
pub struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}
