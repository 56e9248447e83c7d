//! Delays between wizard states.
//!
//! Step transitions and the post-submit redirect wait for a fixed time that
//! only exists for animation. The wait goes through [`Timer`] so tests and
//! headless callers can skip it.

use std::future::Future;
use std::time::Duration;

/// Source of delays.
pub trait Timer: Send + Sync {
    /// Resolve after `duration`.
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send;
}

/// Real delays on the tokio runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioTimer;

impl Timer for TokioTimer {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Resolves immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

impl Timer for NoDelay {
    async fn sleep(&self, _duration: Duration) {}
}
