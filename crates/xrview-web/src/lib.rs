//! xrview Web - browser VR scene viewer
//!
//! Loads an animated glTF model and a looping ambient sound into a Bevy scene
//! and offers a button that asks the browser for an immersive VR session.

mod app;
mod camera;
mod config;
mod model;
mod scene;
mod sound;
mod ui;
mod xr;

use wasm_bindgen::prelude::*;

/// Entry point for WASM module
#[wasm_bindgen(start)]
pub fn main() {
    // Set panic hook for better error messages
    console_error_panic_hook::set_once();

    let config = config::load_scene_config();

    tracing_wasm::set_as_global_default_with_config(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(config.log_level())
            .build(),
    );

    app::run(config);
}
