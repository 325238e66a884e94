mod app;
pub mod components;
pub mod config;
pub mod dom;
pub mod geometry;
mod pages;
pub mod tracker;
mod util;

pub use crate::app::App;
pub use crate::components::hooks::{use_scroll_tracker, UseScrollTrackerOptions, UseScrollTrackerReturn};
pub use crate::config::{EnvConfig, TrackerConfig};
pub use crate::tracker::{ScrollDepthEvent, TrackerPhase};

use leptos::prelude::*;

// Needed for `#[wasm_bindgen(start)]` on the wasm entrypoint.
#[cfg(all(target_arch = "wasm32", not(test)))]
use wasm_bindgen::prelude::wasm_bindgen;


// Only register the WASM start function for normal builds (not for tests),
// otherwise wasm-bindgen-test will end up with multiple entry symbols.
#[cfg_attr(all(target_arch = "wasm32", not(test)), wasm_bindgen(start))]
pub fn main() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Debug) {
        web_sys::console::warn_1(&format!("logger already initialized: {e}").into());
    }
    mount_to_body(App);
}
