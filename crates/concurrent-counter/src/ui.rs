//! Hand-off between the workers and the UI-owning context.
//!
//! Workers hold a [`UiHandle`]; the UI context owns the matching [`UiQueue`]
//! and is the only place where requests are applied.

use crate::error::CounterError;
use tokio::sync::{mpsc, oneshot};

/// Number of display updates that may be in flight at once.
const DISPLAY_CAPACITY: usize = 1;

/// Commands queued to the UI context without waiting for them to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiCommand {
    /// Disable the buttons and stop the counter.
    Stop,
}

/// A display text waiting to be shown by the UI context.
///
/// The sender is blocked until [`DisplayUpdate::acknowledge`] is called.
#[derive(Debug)]
pub struct DisplayUpdate {
    text: String,
    ack: oneshot::Sender<()>,
}

impl DisplayUpdate {
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Signals the sender that the update has been applied.
    pub fn acknowledge(self) {
        // the sender may have given up waiting, nothing to do about it here
        let _ = self.ack.send(());
    }
}

/// A request to be applied on the UI context.
#[derive(Debug)]
pub enum UiRequest {
    Display(DisplayUpdate),
    Command(UiCommand),
}

/// Cloneable worker-side handle to the UI context.
#[derive(Debug, Clone)]
pub struct UiHandle {
    display_tx: mpsc::Sender<DisplayUpdate>,
    command_tx: mpsc::UnboundedSender<UiCommand>,
}

impl UiHandle {
    /// Delivers a display text and waits until the UI context has applied it.
    pub async fn invoke_and_wait(&self, text: String) -> Result<(), CounterError> {
        let (ack, ack_rx) = oneshot::channel();

        self.display_tx
            .send(DisplayUpdate { text, ack })
            .await
            .map_err(|_closed| CounterError::Disconnected)?;

        ack_rx.await.map_err(|_dropped| CounterError::Unacknowledged)
    }

    /// Queues a command for the UI context and returns immediately.
    pub fn invoke_later(&self, command: UiCommand) -> Result<(), CounterError> {
        self.command_tx
            .send(command)
            .map_err(|_closed| CounterError::Disconnected)
    }
}

/// UI-side receiving end of the hand-off.
#[derive(Debug)]
pub struct UiQueue {
    display_rx: mpsc::Receiver<DisplayUpdate>,
    command_rx: mpsc::UnboundedReceiver<UiCommand>,
}

impl UiQueue {
    /// Waits for the next request.
    ///
    /// Queued commands are handed out before pending display updates. Returns
    /// `None` once every [`UiHandle`] has been dropped and the queue is drained.
    pub async fn next(&mut self) -> Option<UiRequest> {
        tokio::select! {
            biased;
            Some(command) = self.command_rx.recv() => Some(UiRequest::Command(command)),
            Some(update) = self.display_rx.recv() => Some(UiRequest::Display(update)),
            else => None,
        }
    }

    /// Returns the next request if one is ready, without waiting.
    pub fn try_next(&mut self) -> Option<UiRequest> {
        if let Ok(command) = self.command_rx.try_recv() {
            return Some(UiRequest::Command(command));
        }
        self.display_rx.try_recv().ok().map(UiRequest::Display)
    }
}

/// Creates a connected handle/queue pair.
pub fn channel() -> (UiHandle, UiQueue) {
    let (display_tx, display_rx) = mpsc::channel(DISPLAY_CAPACITY);
    let (command_tx, command_rx) = mpsc::unbounded_channel();

    (
        UiHandle {
            display_tx,
            command_tx,
        },
        UiQueue {
            display_rx,
            command_rx,
        },
    )
}
