//! Event handling for the TUI.
//!
//! Terminal input, redraw ticks, requests from the counter workers and app events all end up
//! in one channel, which the app drains on its own task. That task is the UI context: nothing
//! else touches the panel.

use crate::app::AppEvent;
use concurrent_counter::{UiQueue, UiRequest};
use futures::{FutureExt, StreamExt};
use log::debug;
use ratatui::crossterm::event::Event as CrosstermEvent;
use std::time::Duration;
use tokio::sync::{OnceCell, mpsc};

/// Redraws per second while nothing else happens.
///
/// Counter updates redraw on their own, ticks only keep the auto-stop countdown fresh.
const TICK_FPS: f64 = 4.0;

/// Sender used by the logger, which has no access to the app.
///
/// Only one EventHandler can exist because of this.
pub(crate) static GLOBAL_SENDER: OnceCell<mpsc::UnboundedSender<Event>> = OnceCell::const_new();

/// Sends an AppEvent through the global sender.
///
/// Events sent before the EventHandler exists are dropped.
macro_rules! app_send {
    ($e:expr) => {{
        if let Some(sender) = crate::event::GLOBAL_SENDER.get() {
            let _ = sender.send(crate::event::Event::App($e));
        }
    }};
}
pub(crate) use app_send;

#[derive(Debug)]
pub enum Event {
    /// Emitted on a regular schedule.
    Tick,

    /// Emitted by the terminal.
    Crossterm(CrosstermEvent),

    /// A request from the counter workers. Display updates must be applied, then acknowledged.
    Ui(UiRequest),

    /// Every counter worker has finished.
    WorkersDone,

    App(AppEvent),
}

/// Merges every event source into one receiver.
#[derive(Debug)]
pub struct EventHandler {
    sender: mpsc::UnboundedSender<Event>,
    receiver: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
    /// Creates the handler and spawns the task feeding it.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new() -> anyhow::Result<Self> {
        let (sender, receiver) = mpsc::unbounded_channel();

        GLOBAL_SENDER
            .set(sender.clone())
            .map_err(|_| anyhow::anyhow!("global sender already initialized"))?;

        Ok(Self { sender, receiver })
    }

    /// Starts forwarding terminal input, ticks and the requests in `queue`.
    pub fn listen(&self, queue: UiQueue) {
        let task = EventTask {
            sender: self.sender.clone(),
            queue,
        };
        tokio::spawn(task.run());
    }

    /// Waits for the next event.
    ///
    /// # Errors
    ///
    /// Fails if every sender is gone, which cannot happen while this handler is alive.
    pub async fn next(&mut self) -> anyhow::Result<Event> {
        self.receiver
            .recv()
            .await
            .ok_or(anyhow::anyhow!("event channel closed"))
    }

    /// Queues an app event for the next iteration of the app loop.
    pub fn send(&mut self, app_event: AppEvent) {
        // the receiver lives in this struct, so it cannot be dropped yet
        let _ = self.sender.send(Event::App(app_event));
    }
}

struct EventTask {
    sender: mpsc::UnboundedSender<Event>,
    queue: UiQueue,
}

impl EventTask {
    async fn run(mut self) {
        let tick_rate = Duration::from_secs_f64(1.0 / TICK_FPS);
        let mut reader = crossterm::event::EventStream::new();
        let mut tick = tokio::time::interval(tick_rate);
        let mut workers_running = true;

        loop {
            let tick_delay = tick.tick();
            let crossterm_event = reader.next().fuse();
            tokio::select! {
                _ = self.sender.closed() => {
                    break;
                }
                request = self.queue.next(), if workers_running => match request {
                    Some(request) => self.send(Event::Ui(request)),
                    None => {
                        debug!("ui: workers finished");
                        workers_running = false;
                        self.send(Event::WorkersDone);
                    }
                },
                _ = tick_delay => {
                    self.send(Event::Tick);
                }
                Some(Ok(evt)) = crossterm_event => {
                    self.send(Event::Crossterm(evt));
                }
            };
        }
    }

    fn send(&self, event: Event) {
        // fails once the app has shut down, which is fine
        let _ = self.sender.send(event);
    }
}
