use crate::app::{App, LogEntry};
use ratatui::{
    Frame,
    layout::{Margin, Rect},
    style::{Style, Stylize},
    symbols::border,
    text::{Line, Span},
    widgets::{Block, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Widget},
};

/// Scroll position of the log screen.
///
/// While tailing, the view sticks to the newest entries.
#[derive(Debug)]
pub struct LogState {
    vertical_scroll: usize,
    tail: bool,

    scrollbar_state: ScrollbarState,
    content_height: usize,
    viewport_height: usize,
}

impl Default for LogState {
    fn default() -> Self {
        LogState {
            vertical_scroll: 0,
            tail: true,

            scrollbar_state: ScrollbarState::default(),
            content_height: 0,
            viewport_height: 0,
        }
    }
}

impl LogState {
    pub fn scroll_up(&mut self) {
        if self.tail {
            // stop tailing but stay put
            self.tail = false;
        } else {
            self.vertical_scroll = self.vertical_scroll.saturating_sub(1);
        }
    }

    pub fn scroll_down(&mut self) {
        if self.is_at_bottom() {
            self.tail = true;
        } else {
            self.vertical_scroll += 1;
        }
    }

    pub fn scroll_page_up(&mut self) {
        self.vertical_scroll = self.vertical_scroll.saturating_sub(self.viewport_height);
        self.tail = false;
    }

    pub fn scroll_page_down(&mut self) {
        self.vertical_scroll = (self.vertical_scroll + self.viewport_height).min(self.max_scroll());
        self.tail = self.is_at_bottom();
    }

    pub fn scroll_to_top(&mut self) {
        self.vertical_scroll = 0;
        self.tail = false;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.vertical_scroll = self.max_scroll();
        self.tail = true;
    }

    pub fn toggle_tail(&mut self) {
        if self.tail {
            self.tail = false;
        } else {
            self.scroll_to_bottom();
        }
    }

    pub fn is_tailing(&self) -> bool {
        self.tail
    }

    pub fn is_at_bottom(&self) -> bool {
        self.vertical_scroll >= self.max_scroll()
    }

    /// Records the current content and viewport heights, following the tail if enabled.
    pub fn resize(&mut self, content_height: usize, viewport_height: usize) {
        self.content_height = content_height;
        self.viewport_height = viewport_height;

        if self.tail {
            self.vertical_scroll = self.max_scroll();
        } else {
            self.vertical_scroll = self.vertical_scroll.min(self.max_scroll());
        }

        self.scrollbar_state = self
            .scrollbar_state
            .content_length(self.max_scroll())
            .viewport_content_length(self.viewport_height)
            .position(self.vertical_scroll);
    }

    fn max_scroll(&self) -> usize {
        self.content_height.saturating_sub(self.viewport_height)
    }
}

fn entry_line(entry: &LogEntry) -> Line<'_> {
    let level_style = match entry.level {
        log::Level::Error => Style::new().red().bold(),
        log::Level::Warn => Style::new().yellow().bold(),
        log::Level::Info => Style::new().green(),
        log::Level::Debug => Style::new().blue(),
        log::Level::Trace => Style::new().dark_gray(),
    };

    Line::from(vec![
        Span::styled(format!("{:<5} ", entry.level), level_style),
        Span::from(entry.message.as_str()),
    ])
}

impl App {
    pub(super) fn render_log_screen(&mut self, frame: &mut Frame, screen_area: Rect) {
        let block = {
            let title = Line::from(" Log ".bold());

            let follow = if self.log_state.is_tailing() {
                Line::from(vec![" Stop Following ".into(), "<f> ".blue().bold()])
            } else {
                Line::from(vec![" Follow ".into(), "<f> ".blue().bold()])
            };

            let position = if !self.log_state.is_at_bottom() {
                Line::from(" ↓ more below ".blue().bold())
            } else if self.log_state.is_tailing() {
                Line::from(" … following ".blue().bold())
            } else {
                Line::from(" … at end ".blue().bold())
            };

            Block::bordered()
                .border_set(border::THICK)
                .title(title.centered())
                .title_bottom(follow.right_aligned())
                .title_bottom(position.left_aligned())
        };

        let inner_area = block.inner(screen_area);
        self.log_state
            .resize(self.messages.len(), inner_area.height as usize);

        let lines = self.messages.iter().map(entry_line).collect::<Vec<_>>();
        let scroll = u16::try_from(self.log_state.vertical_scroll).unwrap_or(u16::MAX);

        Paragraph::new(lines)
            .scroll((scroll, 0))
            .block(block)
            .render(screen_area, frame.buffer_mut());

        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(None)
            .track_symbol(None)
            .end_symbol(None);
        frame.render_stateful_widget(
            scrollbar,
            screen_area.inner(Margin {
                vertical: 1,
                horizontal: 0,
            }),
            &mut self.log_state.scrollbar_state,
        );
    }
}
