/// Error type for the counter core.
///
/// None of these are fatal: workers log them and carry on with their next step.
#[derive(Debug, thiserror::Error)]
pub enum CounterError {
    /// The UI context is gone, so nothing can be delivered to it anymore.
    #[error("ui context disconnected")]
    Disconnected,

    /// The UI context dropped a display update without acknowledging it.
    #[error("display update dropped before it was acknowledged")]
    Unacknowledged,

    /// A worker thread could not be spawned.
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),
}
