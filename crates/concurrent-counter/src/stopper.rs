//! One-shot delayed actions.

use log::{debug, warn};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// What happened to a [`DelayedAction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Fired,
    Cancelled,
}

/// Runs an action once, after a delay, unless cancelled first.
pub struct DelayedAction {
    delay: Duration,
    action: Box<dyn FnOnce() + Send>,
    token: CancellationToken,
}

impl std::fmt::Debug for DelayedAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DelayedAction")
            .field("delay", &self.delay)
            .field("cancelled", &self.token.is_cancelled())
            .finish_non_exhaustive()
    }
}

impl DelayedAction {
    pub fn new(delay: Duration, action: impl FnOnce() + Send + 'static) -> Self {
        Self {
            delay,
            action: Box::new(action),
            token: CancellationToken::new(),
        }
    }

    /// Token that interrupts the wait when cancelled.
    pub fn canceller(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Waits for the delay, then runs the action.
    ///
    /// An interrupted wait is logged and the action is dropped without running.
    pub async fn run(self) -> Outcome {
        debug!("stopper: armed for {:?}", self.delay);

        tokio::select! {
            _ = self.token.cancelled() => {
                warn!("stopper: interrupted before {:?} elapsed, action not run", self.delay);
                Outcome::Cancelled
            }
            _ = tokio::time::sleep(self.delay) => {
                debug!("stopper: delay elapsed, running action");
                (self.action)();
                Outcome::Fired
            }
        }
    }
}
