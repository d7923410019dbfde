//! Study Buddy Web Frontend
//!
//! Leptos-based WASM frontend: paste notes, get flip cards, buy credits.

mod api;
mod app;
mod components;
mod logging;
mod pages;
mod stripe;
mod view;

pub use app::App;

use wasm_bindgen::prelude::*;

/// WASM entry point
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    logging::init();
    leptos::mount::mount_to_body(App);
}
