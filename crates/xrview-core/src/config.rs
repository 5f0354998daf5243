//! Viewer configuration loading and validation

use serde::Deserialize;
use tracing::{info, Level};

use crate::error::XrError;
use crate::session::{SessionInit, SessionMode};

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
pub struct SceneConfig {
    #[serde(default)]
    pub assets: AssetsConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub lighting: LightingConfig,
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AssetsConfig {
    /// glTF binary holding the mesh hierarchy and its animation clips
    #[serde(default = "default_model")]
    pub model: String,
    /// Compressed audio clip played as the ambient loop
    #[serde(default = "default_sound")]
    pub sound: String,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            sound: default_sound(),
        }
    }
}

fn default_model() -> String {
    "giftbox.glb".to_string()
}

fn default_sound() -> String {
    "g_06.mp3".to_string()
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CameraConfig {
    /// Initial camera position, roughly standing eye height facing the origin
    #[serde(default = "default_camera_position")]
    pub position: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: default_camera_position(),
        }
    }
}

fn default_camera_position() -> [f32; 3] {
    [0.0, 1.6, 2.0]
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LightingConfig {
    #[serde(default = "default_ambient_intensity")]
    pub ambient_intensity: f32,
    #[serde(default = "default_point_position")]
    pub point_position: [f32; 3],
    #[serde(default = "default_point_intensity")]
    pub point_intensity: f32,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            ambient_intensity: default_ambient_intensity(),
            point_position: default_point_position(),
            point_intensity: default_point_intensity(),
        }
    }
}

fn default_ambient_intensity() -> f32 {
    0.5
}

fn default_point_position() -> [f32; 3] {
    [2.0, 2.0, 2.0]
}

fn default_point_intensity() -> f32 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AudioConfig {
    /// Linear volume, 0.0 to 1.0
    #[serde(default = "default_volume")]
    pub volume: f32,
    #[serde(default = "default_true")]
    pub looped: bool,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            volume: default_volume(),
            looped: true,
        }
    }
}

fn default_volume() -> f32 {
    0.5
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub mode: SessionMode,
    /// Feature hints passed as `optionalFeatures`; the host may ignore any of them
    #[serde(default = "default_optional_features")]
    pub optional_features: Vec<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            mode: SessionMode::default(),
            optional_features: default_optional_features(),
        }
    }
}

fn default_optional_features() -> Vec<String> {
    vec!["local".to_string(), "bounded-floor".to_string()]
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl SceneConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self, XrError> {
        let config: SceneConfig =
            toml::from_str(content).map_err(|e| XrError::Config(e.to_string()))?;
        config.validate()?;
        info!(
            model = %config.assets.model,
            sound = %config.assets.sound,
            "Loaded scene configuration"
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), XrError> {
        if self.assets.model.trim().is_empty() {
            return Err(XrError::Config("assets.model must not be empty".to_string()));
        }
        if self.assets.sound.trim().is_empty() {
            return Err(XrError::Config("assets.sound must not be empty".to_string()));
        }
        if !(0.0..=1.0).contains(&self.audio.volume) {
            return Err(XrError::Config(format!(
                "audio.volume must be within 0.0..=1.0, got {}",
                self.audio.volume
            )));
        }
        Ok(())
    }

    /// Apply `?model=` and `?sound=` overrides from a URL search string
    pub fn apply_query(&mut self, search: &str) {
        if let Some(model) = parse_query_param(search, "model") {
            info!("Using model from URL parameter: {}", model);
            self.assets.model = model;
        }
        if let Some(sound) = parse_query_param(search, "sound") {
            info!("Using sound from URL parameter: {}", sound);
            self.assets.sound = sound;
        }
    }

    pub fn session_init(&self) -> SessionInit {
        SessionInit {
            optional_features: self.session.optional_features.clone(),
        }
    }

    pub fn log_level(&self) -> Level {
        match self.logging.level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }
}

/// Parse a query parameter from a search string
fn parse_query_param(search: &str, param: &str) -> Option<String> {
    let search = search.trim_start_matches('?');
    for pair in search.split('&') {
        let mut parts = pair.splitn(2, '=');
        if let (Some(key), Some(value)) = (parts.next(), parts.next()) {
            if key == param && !value.is_empty() {
                return Some(value.replace("%3A", ":").replace("%2F", "/"));
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_original_scene() {
        let config = SceneConfig::default();
        assert_eq!(config.assets.model, "giftbox.glb");
        assert_eq!(config.assets.sound, "g_06.mp3");
        assert_eq!(config.camera.position, [0.0, 1.6, 2.0]);
        assert_eq!(config.lighting.point_position, [2.0, 2.0, 2.0]);
        assert_eq!(config.audio.volume, 0.5);
        assert!(config.audio.looped);
        assert_eq!(config.session.mode, SessionMode::ImmersiveVr);
        assert_eq!(config.session.optional_features, vec!["local", "bounded-floor"]);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = SceneConfig::from_toml_str(
            r#"
            [assets]
            model = "models/robot.glb"

            [audio]
            volume = 0.25
            "#,
        )
        .unwrap();

        assert_eq!(config.assets.model, "models/robot.glb");
        assert_eq!(config.assets.sound, "g_06.mp3");
        assert_eq!(config.audio.volume, 0.25);
        assert_eq!(config.camera.position, [0.0, 1.6, 2.0]);
    }

    #[test]
    fn test_rejects_out_of_range_volume() {
        let err = SceneConfig::from_toml_str("[audio]\nvolume = 1.5\n").unwrap_err();
        assert!(matches!(err, XrError::Config(_)));
    }

    #[test]
    fn test_rejects_malformed_toml() {
        assert!(SceneConfig::from_toml_str("[assets\nmodel = 3").is_err());
    }

    #[test]
    fn test_query_overrides() {
        let mut config = SceneConfig::default();
        config.apply_query("?model=https%3A%2F%2Fcdn.example.com%2Fbox.glb&sound=&x=1");

        assert_eq!(config.assets.model, "https://cdn.example.com/box.glb");
        // Empty values are ignored
        assert_eq!(config.assets.sound, "g_06.mp3");
    }

    #[test]
    fn test_log_level_fallback() {
        let mut config = SceneConfig::default();
        assert_eq!(config.log_level(), Level::INFO);
        config.logging.level = "WARN".to_string();
        assert_eq!(config.log_level(), Level::WARN);
        config.logging.level = "chatty".to_string();
        assert_eq!(config.log_level(), Level::INFO);
    }

    #[test]
    fn test_session_mode_from_toml() {
        let config = SceneConfig::from_toml_str(
            r#"
            [session]
            mode = "immersive-ar"
            "#,
        )
        .unwrap();
        assert_eq!(config.session.mode, SessionMode::ImmersiveAr);
        assert_eq!(config.session.mode.as_str(), "immersive-ar");
    }
}
