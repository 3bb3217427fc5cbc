//! The app TUI.

pub mod log;

use crate::app::{App, AppScreen};
use concurrent_counter::{Panel, WindowSize};
use ratatui::{
    Frame,
    buffer::Buffer,
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Style, Stylize},
    symbols::border,
    text::{Line, Span},
    widgets::{Block, Paragraph, Tabs, Widget},
};

/// Smallest panel that still fits the label and the three buttons.
const MIN_PANEL_SIZE: WindowSize = WindowSize {
    width: 30,
    height: 4,
};

impl App {
    pub fn render(&mut self, frame: &mut Frame) {
        use Constraint::{Length, Min};

        let [header_area, inner_area] = Layout::vertical([Length(1), Min(0)]).areas(frame.area());
        let [tabs_area, status_area, title_area] =
            Layout::horizontal([Min(0), Length(18), Length(16)]).areas(header_area);

        // tabs
        let selected_tab_index = match self.screen {
            AppScreen::Panel => 0,
            AppScreen::Log => 1,
            AppScreen::Help => 2,
        };
        let titles = ["Panel", "Log", "Help"]
            .into_iter()
            .enumerate()
            .map(|(i, s)| {
                let key = if s == "Help" {
                    "?".blue().bold()
                } else {
                    (i + 1).to_string().blue().bold()
                };

                if i == selected_tab_index {
                    Line::from(vec!["[".blue().bold(), key, "] ".blue().bold(), s.into()])
                } else {
                    Line::from(vec!["<".blue().bold(), key, "> ".blue().bold(), s.into()])
                }
            })
            .collect::<Vec<_>>();
        Tabs::new(titles)
            .select(None)
            .padding("", "")
            .divider(" ")
            .render(tabs_area, frame.buffer_mut());

        // auto-stop countdown
        let status = match self.auto_stop_in() {
            Some(left) => format!("stop in {:.1}s", left.as_secs_f64()).yellow(),
            None if self.workers_done => "stopped".red(),
            None => "stopping".red(),
        };
        status.render(status_area, frame.buffer_mut());

        // title
        "Concurrent GUI".bold().render(title_area, frame.buffer_mut());

        match self.screen {
            AppScreen::Panel => self.render_panel_screen(frame, inner_area),
            AppScreen::Log => self.render_log_screen(frame, inner_area),
            AppScreen::Help => self.render_help_screen(frame, inner_area),
        }
    }

    fn render_panel_screen(&mut self, frame: &mut Frame, area: Rect) {
        let instructions = Line::from(vec![
            " Up ".into(),
            "<u>".blue().bold(),
            " Down ".into(),
            "<d>".blue().bold(),
            " Stop ".into(),
            "<s>".blue().bold(),
            " Quit ".into(),
            "<q> ".blue().bold(),
        ]);
        let block = Block::bordered()
            .title_bottom(instructions.right_aligned())
            .border_set(border::THICK);
        let inner = block.inner(area);
        block.render(area, frame.buffer_mut());

        let size = panel_size(inner);
        let [column] = Layout::horizontal([Constraint::Length(size.width as u16)])
            .flex(Flex::Center)
            .areas(inner);
        let [window] = Layout::vertical([Constraint::Length(size.height as u16)])
            .flex(Flex::Center)
            .areas(column);

        PanelWidget::new(&self.panel).render(window, frame.buffer_mut());
    }

    fn render_help_screen(&mut self, frame: &mut Frame, area: Rect) {
        let title = Line::from(" Help ".bold());
        let block = Block::bordered()
            .title(title.centered())
            .border_set(border::THICK);

        let key_line = |keys: Vec<&'static str>, what: &'static str| {
            let mut spans = vec![Span::from(" - ")];
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    spans.push(" or ".into());
                }
                spans.push(key.blue());
            }
            spans.push(Span::from(what));
            Line::from(spans)
        };

        let lines = vec![
            Line::from("Counter".bold()),
            key_line(vec!["<u>", "<up>"], " to count up."),
            key_line(vec!["<d>", "<down>"], " to count down."),
            key_line(vec!["<s>", "<space>"], " to stop counting for good."),
            Line::from(" - The counter also stops by itself after a while."),
            Line::from(""),
            Line::from("Navigation".bold()),
            key_line(vec!["<1>", "<2>", "<?>"], " to change screens."),
            key_line(vec!["<q>", "<esc>", "<ctrl + c>"], " to quit."),
        ];

        Paragraph::new(lines)
            .block(block)
            .render(area, frame.buffer_mut());
    }
}

/// Size of the counter window for the given screen area.
fn panel_size(screen: Rect) -> WindowSize {
    let size = WindowSize::for_screen(WindowSize::new(
        u32::from(screen.width),
        u32::from(screen.height),
    ))
    .at_least(MIN_PANEL_SIZE);

    // never larger than the screen itself
    WindowSize::new(
        size.width.min(u32::from(screen.width)),
        size.height.min(u32::from(screen.height)),
    )
}

/// The counter window: the label followed by the down, up and stop buttons.
pub struct PanelWidget<'a> {
    panel: &'a Panel,
}

impl<'a> PanelWidget<'a> {
    pub fn new(panel: &'a Panel) -> Self {
        Self { panel }
    }

    fn button(&self, label: &'static str) -> Span<'static> {
        let text = format!("[ {label} ]");
        if self.panel.buttons_enabled() {
            Span::styled(text, Style::new().blue().bold())
        } else {
            Span::styled(text, Style::new().dark_gray().crossed_out())
        }
    }
}

impl Widget for PanelWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered().title(Line::from(" Counter ".bold()).centered());

        let display = if self.panel.display().is_empty() {
            Span::from("-").dark_gray()
        } else {
            Span::from(self.panel.display().to_string()).bold()
        };

        let lines = vec![
            Line::from(display),
            Line::from(vec![
                self.button("down"),
                " ".into(),
                self.button("up"),
                " ".into(),
                self.button("stop"),
            ]),
        ];

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(block)
            .render(area, buf);
    }
}
