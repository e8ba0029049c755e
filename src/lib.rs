//! Chat Arcade core crate.
//!
//! A small 2D arcade game that runs on a canvas embedded in a chat web app
//! and turns the chat's contact profiles into game characters. The host page
//! supplies the canvas and a profile-loading callback; the engine owns the
//! viewport, input, actors and the frame loop. See `start_game` / `stop_game`
//! in [`game`] for the exported lifecycle.

pub mod entities;
pub mod error;
pub mod game;
pub mod input;
pub mod profile;
pub mod stage;
pub mod viewport;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    let _ = console_log::init_with_level(log::Level::Debug);
}
