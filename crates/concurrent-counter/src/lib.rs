pub mod agent;
pub mod error;
pub mod logging;
pub mod panel;
pub mod stopper;
pub mod ui;

pub use crate::{
    agent::{AgentState, Direction},
    error::CounterError,
    panel::{Panel, WindowSize},
    ui::{UiQueue, UiRequest},
};

use crate::{
    agent::{Agent, AgentHandle},
    stopper::DelayedAction,
    ui::{UiCommand, UiHandle},
};
use log::{debug, error, warn};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Options for starting a [`Counter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterOptions {
    /// Pause between two ticks of the agent.
    pub tick_interval: Duration,
    /// Delay after which the counter stops by itself.
    pub stop_after: Duration,
    /// Whether to install the stderr logger.
    pub init_logging: bool,
}

impl Default for CounterOptions {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(100),
            stop_after: Duration::from_secs(10),
            init_logging: true,
        }
    }
}

/// Cloneable handle to a running counter and its automatic stop.
///
/// The matching [`UiQueue`] returned on start has to be drained by the UI
/// context, otherwise the agent blocks on its first update.
#[derive(Debug, Clone)]
pub struct Counter {
    agent: AgentHandle,
    auto_stop: CancellationToken,
}

/// Both workers, built but not running yet.
struct Workers {
    agent: Agent,
    stopper: DelayedAction,
    ui: UiHandle,
}

impl Counter {
    fn prepare(options: CounterOptions) -> (Self, UiQueue, Workers) {
        if options.init_logging {
            logging::init();
        }

        let (ui, queue) = ui::channel();

        let agent = Agent::new(options.tick_interval);
        let stopper = DelayedAction::new(options.stop_after, {
            let ui = ui.clone();
            move || {
                if let Err(e) = ui.invoke_later(UiCommand::Stop) {
                    warn!("stopper: failed to queue stop: {e}");
                }
            }
        });

        let counter = Self {
            agent: agent.handle(),
            auto_stop: stopper.canceller(),
        };

        debug!(
            "counter: ticking every {:?}, stopping after {:?}",
            options.tick_interval, options.stop_after
        );

        (counter, queue, Workers { agent, stopper, ui })
    }

    /// Starts the agent and the automatic stop as tasks on the current tokio runtime.
    ///
    /// Must be called from within a runtime.
    pub fn start(options: CounterOptions) -> (Self, UiQueue) {
        let (counter, queue, Workers { agent, stopper, ui }) = Self::prepare(options);

        tokio::spawn(agent.run(ui));
        tokio::spawn(stopper.run());

        (counter, queue)
    }

    /// Starts the agent and the automatic stop on two dedicated threads.
    pub fn start_on_threads(options: CounterOptions) -> Result<(Self, UiQueue), CounterError> {
        let (counter, queue, Workers { agent, stopper, ui }) = Self::prepare(options);

        spawn_worker("counter-agent", agent.run(ui))?;
        spawn_worker("delayed-stopper", stopper.run())?;

        Ok((counter, queue))
    }

    /// Switches the counter to counting up.
    pub fn up(&self) {
        self.agent.set_direction(Direction::Increasing);
    }

    /// Switches the counter to counting down.
    pub fn down(&self) {
        self.agent.set_direction(Direction::Decreasing);
    }

    /// Stops the agent for good.
    ///
    /// Returns `false` if it was already stopped.
    pub fn stop(&self) -> bool {
        let stopped = self.agent.stop();
        if stopped {
            debug!("counter: stop requested");
        }
        stopped
    }

    pub fn state(&self) -> AgentState {
        self.agent.state()
    }

    /// Cancels the pending automatic stop, if it has not fired yet.
    pub fn cancel_auto_stop(&self) {
        self.auto_stop.cancel();
    }
}

/// Runs a future to completion on a new thread with its own runtime.
fn spawn_worker<F>(name: &str, future: F) -> Result<(), CounterError>
where
    F: Future + Send + 'static,
{
    let thread_name = name.to_string();
    std::thread::Builder::new()
        .name(thread_name.clone())
        .spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()
            {
                Ok(runtime) => runtime,
                Err(e) => {
                    error!("counter: failed to build runtime for {thread_name}: {e}");
                    return;
                }
            };

            runtime.block_on(future);
            debug!("counter: {thread_name} finished");
        })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> CounterOptions {
        CounterOptions {
            init_logging: false,
            ..CounterOptions::default()
        }
    }

    #[test]
    fn default_timings() {
        let options = CounterOptions::default();
        assert_eq!(options.tick_interval, Duration::from_millis(100));
        assert_eq!(options.stop_after, Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn direction_commands_switch_state() {
        let (counter, _queue) = Counter::start(options());
        assert_eq!(counter.state(), AgentState::Increasing);

        counter.down();
        assert_eq!(counter.state(), AgentState::Decreasing);
        counter.up();
        assert_eq!(counter.state(), AgentState::Increasing);

        assert!(counter.stop());
        assert!(!counter.stop());
        counter.down();
        assert_eq!(counter.state(), AgentState::Stopped);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_auto_stop_never_arrives() {
        let (counter, mut queue) = Counter::start(options());
        counter.cancel_auto_stop();

        let mut panel = Panel::new();
        while panel.updates() < 150 {
            let request = queue.next().await.expect("workers finished early");
            assert!(matches!(request, UiRequest::Display(_)));
            panel.apply(request, &counter);
        }
        assert!(panel.buttons_enabled());
        assert_eq!(panel.display(), "149");

        panel.stop(&counter);
        assert!(queue.next().await.is_none());
    }

    #[test]
    fn threads_deliver_to_a_blocking_ui() {
        let (counter, mut queue) = Counter::start_on_threads(CounterOptions {
            tick_interval: Duration::from_millis(1),
            ..options()
        })
        .unwrap();

        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        let mut panel = Panel::new();
        runtime.block_on(async {
            while panel.updates() < 5 {
                let request = queue.next().await.expect("workers finished early");
                panel.apply(request, &counter);
            }
        });

        assert_eq!(panel.display(), "4");
        counter.cancel_auto_stop();
        panel.stop(&counter);
    }
}
