//! The counter agent.
//!
//! An [`Agent`] owns the counter value and runs the tick loop. Everything else
//! talks to it through a cloneable [`AgentHandle`], which can only flip the
//! direction or stop it.

use crate::ui::UiHandle;
use log::{debug, warn};
use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

/// Direction the counter moves in on each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Increasing,
    Decreasing,
}

impl Direction {
    fn step(self) -> i64 {
        match self {
            Direction::Increasing => 1,
            Direction::Decreasing => -1,
        }
    }
}

/// Observable state of an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentState {
    Increasing,
    Decreasing,
    Stopped,
}

#[derive(Debug)]
struct Flags {
    /// Set once, read by the loop on every tick.
    stopped: AtomicBool,
    /// Staleness is fine here, a tick reading the old direction is harmless.
    increasing: AtomicBool,
}

/// Cloneable handle used to steer a running [`Agent`].
#[derive(Debug, Clone)]
pub struct AgentHandle {
    flags: Arc<Flags>,
}

impl AgentHandle {
    pub fn set_direction(&self, direction: Direction) {
        self.flags.increasing.store(
            direction == Direction::Increasing,
            Ordering::Relaxed,
        );
    }

    pub fn direction(&self) -> Direction {
        if self.flags.increasing.load(Ordering::Relaxed) {
            Direction::Increasing
        } else {
            Direction::Decreasing
        }
    }

    /// Stops the agent.
    ///
    /// Returns `true` if this call stopped it, `false` if it was already stopped.
    pub fn stop(&self) -> bool {
        !self.flags.stopped.swap(true, Ordering::AcqRel)
    }

    pub fn is_stopped(&self) -> bool {
        self.flags.stopped.load(Ordering::Acquire)
    }

    pub fn state(&self) -> AgentState {
        if self.is_stopped() {
            return AgentState::Stopped;
        }
        match self.direction() {
            Direction::Increasing => AgentState::Increasing,
            Direction::Decreasing => AgentState::Decreasing,
        }
    }
}

/// Counts up or down once per tick and pushes each value to the UI context.
#[derive(Debug)]
pub struct Agent {
    interval: Duration,
    counter: i64,
    handle: AgentHandle,
}

impl Agent {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            counter: 0,
            handle: AgentHandle {
                flags: Arc::new(Flags {
                    stopped: AtomicBool::new(false),
                    increasing: AtomicBool::new(true),
                }),
            },
        }
    }

    pub fn handle(&self) -> AgentHandle {
        self.handle.clone()
    }

    /// Runs the tick loop until stopped, returning the final counter value.
    ///
    /// Each tick shows the current value, waits for the UI context to apply it,
    /// then moves the counter and sleeps. A failed delivery is logged and the
    /// counter is left alone so the next tick shows the same value again.
    pub async fn run(mut self, ui: UiHandle) -> i64 {
        debug!("agent: started");

        while !self.handle.is_stopped() {
            let text = self.counter.to_string();

            match ui.invoke_and_wait(text).await {
                Ok(()) => self.counter += self.handle.direction().step(),
                Err(e) => warn!("agent: failed to deliver {}: {e}", self.counter),
            }

            tokio::time::sleep(self.interval).await;
        }

        debug!("agent: stopped at {}", self.counter);
        self.counter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::{self, UiQueue, UiRequest};

    const TICK: Duration = Duration::from_millis(100);

    /// Receives the next display update, acknowledges it and returns its text.
    async fn next_text(queue: &mut UiQueue) -> String {
        match queue.next().await {
            Some(UiRequest::Display(update)) => {
                let text = update.text().to_string();
                update.acknowledge();
                text
            }
            other => panic!("expected a display update, got {other:?}"),
        }
    }

    #[test]
    fn starts_increasing() {
        let agent = Agent::new(TICK);
        assert_eq!(agent.handle().state(), AgentState::Increasing);
        assert_eq!(agent.handle().direction(), Direction::Increasing);
    }

    #[test]
    fn stop_is_terminal_and_idempotent() {
        let handle = Agent::new(TICK).handle();

        handle.set_direction(Direction::Decreasing);
        assert_eq!(handle.state(), AgentState::Decreasing);

        assert!(handle.stop());
        assert!(!handle.stop());
        assert_eq!(handle.state(), AgentState::Stopped);

        handle.set_direction(Direction::Increasing);
        assert_eq!(handle.state(), AgentState::Stopped);
    }

    #[tokio::test(start_paused = true)]
    async fn counts_in_the_current_direction() {
        let (ui, mut queue) = ui::channel();
        let agent = Agent::new(TICK);
        let handle = agent.handle();
        let task = tokio::spawn(agent.run(ui));

        assert_eq!(next_text(&mut queue).await, "0");
        assert_eq!(next_text(&mut queue).await, "1");
        assert_eq!(next_text(&mut queue).await, "2");

        // applied before the acknowledgment, so the very next step goes down
        let Some(UiRequest::Display(update)) = queue.next().await else {
            panic!("expected a display update");
        };
        assert_eq!(update.text(), "3");
        handle.set_direction(Direction::Decreasing);
        update.acknowledge();

        assert_eq!(next_text(&mut queue).await, "2");
        assert_eq!(next_text(&mut queue).await, "1");
        assert_eq!(next_text(&mut queue).await, "0");
        assert_eq!(next_text(&mut queue).await, "-1");

        handle.stop();
        assert_eq!(task.await.unwrap(), -2);
        assert!(queue.next().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn waits_one_interval_between_ticks() {
        let (ui, mut queue) = ui::channel();
        let agent = Agent::new(TICK);
        let handle = agent.handle();
        tokio::spawn(agent.run(ui));

        let start = tokio::time::Instant::now();
        next_text(&mut queue).await;
        next_text(&mut queue).await;
        next_text(&mut queue).await;
        let elapsed = start.elapsed();
        assert!(elapsed >= TICK * 2, "{elapsed:?}");
        assert!(elapsed < TICK * 3, "{elapsed:?}");

        handle.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn unacknowledged_update_is_shown_again() {
        let (ui, mut queue) = ui::channel();
        let agent = Agent::new(TICK);
        let handle = agent.handle();
        tokio::spawn(agent.run(ui));

        assert_eq!(next_text(&mut queue).await, "0");
        drop(queue.next().await);
        assert_eq!(next_text(&mut queue).await, "1");
        assert_eq!(next_text(&mut queue).await, "2");

        handle.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn keeps_running_without_a_ui_until_stopped() {
        let (ui, queue) = ui::channel();
        drop(queue);

        let agent = Agent::new(TICK);
        let handle = agent.handle();
        let task = tokio::spawn(agent.run(ui));

        tokio::time::sleep(TICK * 5).await;
        assert!(!task.is_finished());

        handle.stop();
        assert_eq!(task.await.unwrap(), 0);
    }
}
