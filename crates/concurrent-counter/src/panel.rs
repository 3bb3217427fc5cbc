//! Widget state of the counter window.
//!
//! A [`Panel`] lives on the UI context and is only ever touched there. Front-ends
//! render it however they like and route their button clicks through it.

use crate::{
    Counter,
    ui::{UiCommand, UiRequest},
};
use log::debug;

/// Fraction of the screen width taken by the window.
pub const WIDTH_FRACTION: f64 = 0.2;

/// Fraction of the screen height taken by the window.
pub const HEIGHT_FRACTION: f64 = 0.1;

/// A width/height pair in whatever unit the front-end measures its screen in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowSize {
    pub width: u32,
    pub height: u32,
}

impl WindowSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Size of the window for a screen of the given size.
    pub fn for_screen(screen: WindowSize) -> Self {
        Self {
            width: (f64::from(screen.width) * WIDTH_FRACTION) as u32,
            height: (f64::from(screen.height) * HEIGHT_FRACTION) as u32,
        }
    }

    /// Grows each dimension to at least the given minimum.
    pub fn at_least(self, min: WindowSize) -> Self {
        Self {
            width: self.width.max(min.width),
            height: self.height.max(min.height),
        }
    }
}

/// The label and the enabled state of the three buttons.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Panel {
    display: String,
    stopped: bool,
    updates: u64,
}

impl Panel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text currently shown by the label.
    pub fn display(&self) -> &str {
        &self.display
    }

    /// Whether the up, down and stop buttons can be clicked.
    pub fn buttons_enabled(&self) -> bool {
        !self.stopped
    }

    /// Number of display updates shown so far.
    pub fn updates(&self) -> u64 {
        self.updates
    }

    pub fn up(&self, counter: &Counter) {
        if self.buttons_enabled() {
            counter.up();
        }
    }

    pub fn down(&self, counter: &Counter) {
        if self.buttons_enabled() {
            counter.down();
        }
    }

    /// Disables the buttons and stops the counter.
    ///
    /// Returns `false` if the panel was already stopped.
    pub fn stop(&mut self, counter: &Counter) -> bool {
        if self.stopped {
            return false;
        }
        self.stopped = true;
        counter.stop();
        debug!("ui: stopped at {:?}", self.display);
        true
    }

    /// Applies a request from the workers.
    ///
    /// Display updates are acknowledged after they are applied. Once stopped the
    /// label is frozen, late updates are acknowledged without being shown.
    pub fn apply(&mut self, request: UiRequest, counter: &Counter) {
        match request {
            UiRequest::Display(update) => {
                if !self.stopped {
                    self.display.clear();
                    self.display.push_str(update.text());
                    self.updates += 1;
                }
                update.acknowledge();
            }
            UiRequest::Command(UiCommand::Stop) => {
                self.stop(counter);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AgentState, CounterOptions, ui::UiQueue};
    use std::time::Duration;
    use tokio::time::Instant;

    const AUTO_STOP: Duration = Duration::from_secs(10);

    fn options() -> CounterOptions {
        CounterOptions {
            init_logging: false,
            ..CounterOptions::default()
        }
    }

    /// Applies requests until a display update has been shown, returning its text.
    async fn next_shown(panel: &mut Panel, queue: &mut UiQueue, counter: &Counter) -> String {
        let shown = panel.updates();
        while panel.updates() == shown {
            let request = queue.next().await.expect("workers finished early");
            panel.apply(request, counter);
        }
        panel.display().to_string()
    }

    #[test]
    fn window_is_a_fraction_of_the_screen() {
        let screen = WindowSize::new(1920, 1080);
        assert_eq!(WindowSize::for_screen(screen), WindowSize::new(384, 108));

        let terminal = WindowSize::new(80, 24);
        assert_eq!(WindowSize::for_screen(terminal), WindowSize::new(16, 2));
        assert_eq!(
            WindowSize::for_screen(terminal).at_least(WindowSize::new(30, 5)),
            WindowSize::new(30, 5)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn follows_clicks_then_freezes_on_stop() {
        let (counter, mut queue) = Counter::start(options());
        let mut panel = Panel::new();
        assert_eq!(panel.display(), "");

        assert_eq!(next_shown(&mut panel, &mut queue, &counter).await, "0");

        panel.up(&counter);
        panel.up(&counter);
        assert_eq!(next_shown(&mut panel, &mut queue, &counter).await, "1");
        assert_eq!(next_shown(&mut panel, &mut queue, &counter).await, "2");

        // the click lands before the next step, so it is taken into account there
        panel.down(&counter);
        assert_eq!(next_shown(&mut panel, &mut queue, &counter).await, "1");
        assert_eq!(next_shown(&mut panel, &mut queue, &counter).await, "0");
        assert_eq!(next_shown(&mut panel, &mut queue, &counter).await, "-1");

        assert!(panel.stop(&counter));
        assert!(!panel.buttons_enabled());
        assert_eq!(counter.state(), AgentState::Stopped);

        // disabled buttons do nothing
        panel.up(&counter);
        assert_eq!(counter.state(), AgentState::Stopped);

        // the automatic stop still arrives, and changes nothing
        let updates = panel.updates();
        while let Some(request) = queue.next().await {
            panel.apply(request, &counter);
        }
        assert_eq!(panel.display(), "-1");
        assert_eq!(panel.updates(), updates);
        assert!(!panel.buttons_enabled());
    }

    #[tokio::test(start_paused = true)]
    async fn stops_by_itself_after_the_delay() {
        let start = Instant::now();
        let (counter, mut queue) = Counter::start(options());
        let mut panel = Panel::new();

        let mut previous: Option<i64> = None;
        while panel.buttons_enabled() {
            let request = queue.next().await.expect("workers finished early");
            let is_stop = matches!(request, UiRequest::Command(UiCommand::Stop));
            let shown = panel.updates();
            panel.apply(request, &counter);

            if is_stop {
                let elapsed = start.elapsed();
                assert!(elapsed >= AUTO_STOP, "{elapsed:?}");
                assert!(elapsed < AUTO_STOP + Duration::from_millis(100), "{elapsed:?}");
            } else if panel.updates() > shown {
                let value: i64 = panel.display().parse().unwrap();
                if let Some(previous) = previous {
                    assert_eq!(value - previous, 1);
                }
                previous = Some(value);
            }
        }

        assert_eq!(counter.state(), AgentState::Stopped);
        let frozen = panel.display().to_string();
        while let Some(request) = queue.next().await {
            panel.apply(request, &counter);
        }
        assert_eq!(panel.display(), frozen);
        assert!(previous.unwrap() >= 90);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_is_idempotent() {
        let (counter, mut queue) = Counter::start(options());
        let mut panel = Panel::new();
        next_shown(&mut panel, &mut queue, &counter).await;

        assert!(panel.stop(&counter));
        assert!(!panel.stop(&counter));
        panel.apply(UiRequest::Command(UiCommand::Stop), &counter);

        assert!(!panel.buttons_enabled());
        assert_eq!(panel.display(), "0");
        assert_eq!(panel.updates(), 1);
    }
}
