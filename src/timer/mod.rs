use std::future;
use std::pin::Pin;
use std::time::Duration;

use tokio::time::{sleep, Instant, Sleep};

/// A single-shot timer that can be restarted or cancelled. Restarting drops
/// the pending deadline, so at most one firing is ever outstanding.
#[derive(Debug, Default)]
pub struct CancellableTimer {
    sleep: Option<Pin<Box<Sleep>>>,
}

impl CancellableTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms the timer for `delay` from now, replacing any pending deadline.
    pub fn restart(&mut self, delay: Duration) {
        self.sleep = Some(Box::pin(sleep(delay)));
    }

    /// Arms the timer only when nothing is pending. Returns whether it armed.
    pub fn arm_if_idle(&mut self, delay: Duration) -> bool {
        if self.is_armed() {
            return false;
        }
        self.restart(delay);
        true
    }

    /// Returns whether a pending deadline was dropped.
    pub fn cancel(&mut self) -> bool {
        self.sleep.take().is_some()
    }

    pub fn is_armed(&self) -> bool {
        self.sleep.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.sleep.as_ref().map(|s| s.deadline())
    }

    /// Completes when the armed deadline passes and disarms the timer.
    /// Never completes while disarmed. Dropping the future keeps the
    /// deadline armed, so it can sit in a `select!` loop.
    pub async fn fired(&mut self) {
        match self.sleep.as_mut() {
            Some(sleep) => {
                sleep.as_mut().await;
                self.sleep = None;
            }
            None => future::pending::<()>().await,
        }
    }
}
