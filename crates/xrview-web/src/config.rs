//! Scene configuration for the browser build
//!
//! Runs before the tracing subscriber is installed, so problems are reported
//! straight to the browser console.

use anyhow::{Context, Result};
use xrview_core::SceneConfig;

const EMBEDDED_CONFIG: &str = include_str!("../xrview.toml");

/// Embedded defaults plus `?model=` / `?sound=` overrides from the page URL
pub fn load_scene_config() -> SceneConfig {
    let mut config = match parse_embedded() {
        Ok(config) => config,
        Err(e) => {
            web_sys::console::warn_1(&format!("Using default scene configuration: {:#}", e).into());
            SceneConfig::default()
        }
    };

    if let Some(search) = location_search() {
        config.apply_query(&search);
    }

    config
}

fn parse_embedded() -> Result<SceneConfig> {
    SceneConfig::from_toml_str(EMBEDDED_CONFIG).context("invalid embedded xrview.toml")
}

fn location_search() -> Option<String> {
    let search = web_sys::window()?.location().search().ok()?;
    if search.is_empty() {
        None
    } else {
        Some(search)
    }
}
