//! Fixed scene composition
//!
//! Describes what the render surface contains and which elements live inside
//! the session scope. The layout is computed once from the configuration and
//! never changes while the view is mounted.

use crate::config::SceneConfig;

#[derive(Debug, Clone, PartialEq)]
pub enum LightSpec {
    Ambient { intensity: f32 },
    Point { position: [f32; 3], intensity: f32 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum SceneElement {
    Light(LightSpec),
    AssetModel { path: String },
    AmbientSound { path: String },
    OrbitControls,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneLayout {
    pub camera_position: [f32; 3],
    pub camera_target: [f32; 3],
    /// Mounted under the session context
    pub session_scoped: Vec<SceneElement>,
    /// Mounted beside it, available with or without a session
    pub unscoped: Vec<SceneElement>,
}

impl SceneLayout {
    pub fn from_config(config: &SceneConfig) -> Self {
        Self {
            camera_position: config.camera.position,
            camera_target: [0.0, 0.0, 0.0],
            session_scoped: vec![
                SceneElement::Light(LightSpec::Ambient {
                    intensity: config.lighting.ambient_intensity,
                }),
                SceneElement::Light(LightSpec::Point {
                    position: config.lighting.point_position,
                    intensity: config.lighting.point_intensity,
                }),
                SceneElement::AssetModel {
                    path: config.assets.model.clone(),
                },
                SceneElement::AmbientSound {
                    path: config.assets.sound.clone(),
                },
            ],
            unscoped: vec![SceneElement::OrbitControls],
        }
    }

    pub fn lights(&self) -> impl Iterator<Item = &LightSpec> {
        self.session_scoped.iter().filter_map(|e| match e {
            SceneElement::Light(light) => Some(light),
            _ => None,
        })
    }

    pub fn has_orbit_controls(&self) -> bool {
        self.unscoped.contains(&SceneElement::OrbitControls)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let layout = SceneLayout::from_config(&SceneConfig::default());

        assert_eq!(layout.camera_position, [0.0, 1.6, 2.0]);
        let lights: Vec<_> = layout.lights().collect();
        assert_eq!(
            lights,
            vec![
                &LightSpec::Ambient { intensity: 0.5 },
                &LightSpec::Point {
                    position: [2.0, 2.0, 2.0],
                    intensity: 1.0
                },
            ]
        );
    }

    #[test]
    fn test_controls_outside_session_scope() {
        let layout = SceneLayout::from_config(&SceneConfig::default());

        assert!(layout.has_orbit_controls());
        assert!(!layout.session_scoped.contains(&SceneElement::OrbitControls));
        assert!(layout.session_scoped.contains(&SceneElement::AssetModel {
            path: "giftbox.glb".to_string()
        }));
        assert!(layout.session_scoped.contains(&SceneElement::AmbientSound {
            path: "g_06.mp3".to_string()
        }));
    }
}
