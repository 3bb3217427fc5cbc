pub(crate) mod session;
#[cfg(feature = "desktop")]
pub(crate) mod window;

use crate::session::use_counter;
use concurrent_counter::Panel;
use dioxus::prelude::*;

const TITLE: &str = "Another Concurrent GUI";

/// A macro to make mass redeclarations of a collection of identifiers using a
/// single method more concise.
///
/// # Example
///
/// ```rs
/// // This:
/// call!(foo; bar, qux);
///
/// // Gets turned into this:
/// let bar = bar.foo();
/// let qux = qux.foo();
/// ```
#[macro_export]
macro_rules! call {
   ($method:ident; $($identifier:ident),*) => {
      $(let $identifier = $identifier.$method();)*
   }
}

/// [`call!`] but with the method set to `clone`.
#[macro_export]
macro_rules! clone {
   ($($t:tt),*) => {
      $crate::call!(clone; $($t),*);
   }
}

fn main() {
    #[cfg(feature = "desktop")]
    {
        use dioxus::desktop::{Config, WindowBuilder};

        dioxus::LaunchBuilder::desktop()
            .with_cfg(Config::new().with_window(WindowBuilder::new().with_title(TITLE)))
            .launch(App);
    }

    #[cfg(not(feature = "desktop"))]
    dioxus::launch(App);
}

/// The counter window: a label and the down, up and stop buttons.
#[component]
fn App() -> Element {
    let mut panel = use_signal(Panel::new);
    let counter = use_counter(panel);

    #[cfg(feature = "desktop")]
    use_hook(window::fit_to_screen);

    let display = panel.read().display().to_string();
    let disabled = !panel.read().buttons_enabled();

    let on_down = {
        clone!(counter);
        move |_: MouseEvent| {
            if let Some(counter) = &counter {
                panel.read().down(counter);
            }
        }
    };
    let on_up = {
        clone!(counter);
        move |_: MouseEvent| {
            if let Some(counter) = &counter {
                panel.read().up(counter);
            }
        }
    };
    let on_stop = move |_: MouseEvent| {
        if let Some(counter) = &counter {
            panel.write().stop(counter);
        }
    };

    rsx! {
        div {
            id: "panel",
            span { "{display}" }
            button { disabled: disabled, onclick: on_down, "down" }
            button { disabled: disabled, onclick: on_up, "up" }
            button { disabled: disabled, onclick: on_stop, "stop" }
        }
    }
}
