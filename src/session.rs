use concurrent_counter::{Counter, CounterOptions, Panel};
use dioxus::prelude::*;
use log::{debug, error};

/// Starts the counter workers on first render and applies their requests to `panel`.
///
/// Requests are applied by a task owned by this component, so the panel is only ever
/// written from the UI context. Returns `None` if the workers could not be started.
pub fn use_counter(mut panel: Signal<Panel>) -> Option<Counter> {
    use_hook(move || {
        let (counter, mut queue) = match Counter::start_on_threads(CounterOptions::default()) {
            Ok(x) => x,
            Err(e) => {
                error!("ui: failed to start counter: {e}");
                return None;
            }
        };

        spawn({
            let counter = counter.clone();
            async move {
                while let Some(request) = queue.next().await {
                    panel.write().apply(request, &counter);
                }
                debug!("ui: workers finished");
            }
        });

        Some(counter)
    })
}
