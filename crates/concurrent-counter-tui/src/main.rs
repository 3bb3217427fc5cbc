mod app;
mod event;
mod ui;

use crate::{
    app::{App, AppEvent, LogEntry},
    event::{EventHandler, app_send},
};
use anyhow::Context;
use clap::Parser;
use concurrent_counter::CounterOptions;
use std::time::Duration;

#[derive(Parser, Debug)]
struct Args {
    /// Milliseconds between two counter ticks.
    #[arg(long, default_value_t = 100)]
    tick_ms: u64,

    /// Seconds after which the counter stops by itself.
    #[arg(long, default_value_t = 10)]
    stop_after_secs: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // must exist before the logger, which sends through it
    let events = EventHandler::new()?;

    // set up global logger
    let logger = AppLogger::new_with_default(
        "warn,concurrent_counter=debug,concurrent_counter_tui=debug",
    );
    let max_level = logger.filter.filter();
    log::set_boxed_logger(Box::new(logger)).context("failed to set logger")?;
    log::set_max_level(max_level);

    let app = App::new(
        events,
        CounterOptions {
            tick_interval: Duration::from_millis(args.tick_ms),
            stop_after: Duration::from_secs(args.stop_after_secs),
            init_logging: false,
        },
    );

    // run tui
    let terminal = ratatui::init();
    let app_result = app.run(terminal).await;
    ratatui::restore();
    app_result
}

/// Logger implementation that logs to the TUI.
struct AppLogger {
    filter: env_filter::Filter,
}

impl AppLogger {
    fn new_with_default(default: &str) -> Self {
        let mut filter_builder = env_filter::Builder::new();
        if let Ok(filter) = &std::env::var("RUST_LOG") {
            filter_builder.parse(filter);
        } else {
            filter_builder.parse(default);
        }
        Self {
            filter: filter_builder.build(),
        }
    }
}

impl log::Log for AppLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.filter.enabled(metadata)
    }

    fn log(&self, record: &log::Record) {
        if self.filter.matches(record) {
            app_send!(AppEvent::Log(LogEntry {
                level: record.level(),
                message: record.args().to_string(),
            }));
        }
    }

    fn flush(&self) {}
}
