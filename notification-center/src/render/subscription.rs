//! Closable callback wrapper.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Callbacks added to a subscription stop firing once it is unsubscribed.
#[derive(Debug, Clone)]
pub struct Subscription {
    open: Arc<AtomicBool>,
}

impl Default for Subscription {
    fn default() -> Self {
        Self::new()
    }
}

impl Subscription {
    pub fn new() -> Self {
        Self {
            open: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn unsubscribe(&self) {
        self.open.store(false, Ordering::SeqCst);
    }

    pub fn closed(&self) -> bool {
        !self.open.load(Ordering::SeqCst)
    }

    /// Wrap `callback` so it only runs while the subscription is open.
    pub fn add<A, R, F>(&self, callback: F) -> impl Fn(A) -> Option<R> + Send + Sync + 'static
    where
        F: Fn(A) -> R + Send + Sync + 'static,
    {
        let open = self.open.clone();
        move |arg| open.load(Ordering::SeqCst).then(|| callback(arg))
    }
}
