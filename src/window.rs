use concurrent_counter::WindowSize;
use dioxus::desktop::{tao::dpi::PhysicalSize, window};
use log::{debug, warn};

/// Resizes the current window relative to the screen it is shown on.
pub fn fit_to_screen() {
    let window = window();

    let Some(monitor) = window.current_monitor() else {
        warn!("ui: no monitor detected, keeping the default window size");
        return;
    };
    let screen = monitor.size();

    let size = WindowSize::for_screen(WindowSize::new(screen.width, screen.height));
    debug!(
        "ui: screen is {}x{}, window is {}x{}",
        screen.width, screen.height, size.width, size.height
    );

    window.set_inner_size(PhysicalSize::new(size.width, size.height));
}
