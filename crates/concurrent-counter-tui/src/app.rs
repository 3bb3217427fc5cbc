use crate::{
    event::{Event, EventHandler},
    ui::log::LogState,
};
use concurrent_counter::{Counter, CounterOptions, Panel};
use ratatui::{
    DefaultTerminal,
    crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
};
use std::time::{Duration, Instant};

/// Application.
#[derive(Debug)]
pub struct App {
    pub running: bool,
    pub events: EventHandler,

    pub counter: Counter,
    pub panel: Panel,
    /// When the automatic stop is due.
    pub stop_deadline: Instant,
    pub workers_done: bool,

    pub screen: AppScreen,

    pub messages: Vec<LogEntry>,
    pub log_state: LogState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppScreen {
    #[default]
    Panel,
    Log,
    Help,
}

/// A log record captured for the log screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub level: log::Level,
    pub message: String,
}

/// Application events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Log(LogEntry),

    Exit,

    Screen(AppScreen),

    Up,
    Down,
    Stop,
}

impl App {
    /// Starts the counter and wires its requests into `events`.
    pub fn new(events: EventHandler, options: CounterOptions) -> Self {
        let (counter, queue) = Counter::start(options);
        events.listen(queue);

        Self {
            running: true,
            events,

            counter,
            panel: Panel::new(),
            stop_deadline: Instant::now() + options.stop_after,
            workers_done: false,

            screen: AppScreen::default(),

            messages: Vec::new(),
            log_state: LogState::default(),
        }
    }

    /// Run the application's main loop.
    pub async fn run(mut self, mut terminal: DefaultTerminal) -> anyhow::Result<()> {
        while self.running {
            terminal.draw(|frame| self.render(frame))?;
            match self.events.next().await? {
                Event::Tick => {}
                Event::Crossterm(event) => {
                    if let crossterm::event::Event::Key(key_event) = event {
                        self.handle_key_events(key_event);
                    }
                }
                Event::Ui(request) => self.panel.apply(request, &self.counter),
                Event::WorkersDone => self.workers_done = true,
                Event::App(app_event) => self.handle_app_events(app_event),
            }
        }

        // the window is gone, nobody is left to show updates to
        self.counter.cancel_auto_stop();
        self.counter.stop();

        Ok(())
    }

    /// Handles the key events and updates the state of [`App`].
    pub fn handle_key_events(&mut self, key_event: KeyEvent) {
        if key_event.kind != KeyEventKind::Press {
            return;
        }

        if let Some(app_event) = key_to_app_event(self.screen, key_event) {
            self.events.send(app_event);
            return;
        }

        if self.screen == AppScreen::Log {
            match key_event.code {
                KeyCode::Up => self.log_state.scroll_up(),
                KeyCode::Down => self.log_state.scroll_down(),
                KeyCode::PageUp => self.log_state.scroll_page_up(),
                KeyCode::PageDown => self.log_state.scroll_page_down(),
                KeyCode::Home | KeyCode::Char('g') => self.log_state.scroll_to_top(),
                KeyCode::End | KeyCode::Char('G') => self.log_state.scroll_to_bottom(),
                KeyCode::Char('f') => self.log_state.toggle_tail(),
                _ => {}
            }
        }
    }

    pub fn handle_app_events(&mut self, app_event: AppEvent) {
        match app_event {
            AppEvent::Log(entry) => self.messages.push(entry),

            AppEvent::Exit => self.exit(),

            AppEvent::Screen(screen) => {
                self.screen = screen;
            }

            AppEvent::Up => self.panel.up(&self.counter),
            AppEvent::Down => self.panel.down(&self.counter),
            AppEvent::Stop => {
                self.panel.stop(&self.counter);
            }
        }
    }

    /// Time left before the automatic stop, `None` once the panel is stopped.
    pub fn auto_stop_in(&self) -> Option<Duration> {
        self.panel
            .buttons_enabled()
            .then(|| self.stop_deadline.saturating_duration_since(Instant::now()))
    }

    /// Exit the app.
    fn exit(&mut self) {
        self.running = false;
    }
}

/// Maps a key press to an app event, for keys that mean the same on every screen or that
/// click a panel button.
pub fn key_to_app_event(screen: AppScreen, key_event: KeyEvent) -> Option<AppEvent> {
    let app_event = match (screen, key_event.code) {
        // change screens
        (_, KeyCode::Char('1')) => AppEvent::Screen(AppScreen::Panel),
        (_, KeyCode::Char('2')) => AppEvent::Screen(AppScreen::Log),
        (_, KeyCode::Char('?')) => AppEvent::Screen(AppScreen::Help),

        // ctrl+c to quit, checked before the plain letters below
        (_, KeyCode::Char('c' | 'C')) if key_event.modifiers == KeyModifiers::CONTROL => {
            AppEvent::Exit
        }
        // esc or q to quit
        (_, KeyCode::Esc | KeyCode::Char('q')) => AppEvent::Exit,

        // panel buttons
        (AppScreen::Panel, KeyCode::Char('u') | KeyCode::Up) => AppEvent::Up,
        (AppScreen::Panel, KeyCode::Char('d') | KeyCode::Down) => AppEvent::Down,
        (AppScreen::Panel, KeyCode::Char('s' | ' ')) => AppEvent::Stop,

        _ => return None,
    };
    Some(app_event)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn panel_keys_click_buttons() {
        let screen = AppScreen::Panel;
        assert_eq!(
            key_to_app_event(screen, press(KeyCode::Char('u'))),
            Some(AppEvent::Up)
        );
        assert_eq!(
            key_to_app_event(screen, press(KeyCode::Down)),
            Some(AppEvent::Down)
        );
        assert_eq!(
            key_to_app_event(screen, press(KeyCode::Char(' '))),
            Some(AppEvent::Stop)
        );
    }

    #[test]
    fn arrows_scroll_on_the_log_screen() {
        assert_eq!(key_to_app_event(AppScreen::Log, press(KeyCode::Up)), None);
        assert_eq!(
            key_to_app_event(AppScreen::Log, press(KeyCode::Char('s'))),
            None
        );
    }

    #[test]
    fn quit_and_navigation_work_everywhere() {
        for screen in [AppScreen::Panel, AppScreen::Log, AppScreen::Help] {
            assert_eq!(
                key_to_app_event(screen, press(KeyCode::Char('q'))),
                Some(AppEvent::Exit)
            );
            assert_eq!(
                key_to_app_event(
                    screen,
                    KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)
                ),
                Some(AppEvent::Exit)
            );
            assert_eq!(
                key_to_app_event(screen, press(KeyCode::Char('2'))),
                Some(AppEvent::Screen(AppScreen::Log))
            );
        }
    }
}
