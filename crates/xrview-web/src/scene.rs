//! Scene setup - camera, session scope and lights

use bevy::prelude::*;
use xrview_core::LightSpec;

use crate::app::Viewer;

/// Config intensities are unitless; these map them onto Bevy's photometric units
const AMBIENT_BRIGHTNESS_SCALE: f32 = 400.0;
const POINT_LUMENS_SCALE: f32 = 200_000.0;

pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_scene);
    }
}

/// Marker component for the main camera
#[derive(Component)]
pub struct MainCamera;

/// Root entity for everything mounted under the session context
#[derive(Component)]
pub struct SessionScope;

fn setup_scene(mut commands: Commands, viewer: Res<Viewer>) {
    let layout = viewer.layout();

    commands.spawn((
        Camera3d::default(),
        Transform::from_translation(Vec3::from_array(layout.camera_position))
            .looking_at(Vec3::from_array(layout.camera_target), Vec3::Y),
        MainCamera,
    ));

    let scope = commands
        .spawn((SessionScope, Transform::default(), Visibility::default()))
        .id();

    for light in layout.lights() {
        match light {
            LightSpec::Ambient { intensity } => {
                commands.insert_resource(AmbientLight {
                    color: Color::WHITE,
                    brightness: intensity * AMBIENT_BRIGHTNESS_SCALE,
                    ..default()
                });
            }
            LightSpec::Point { position, intensity } => {
                commands.spawn((
                    PointLight {
                        intensity: intensity * POINT_LUMENS_SCALE,
                        shadows_enabled: false,
                        ..default()
                    },
                    Transform::from_translation(Vec3::from_array(*position)),
                    ChildOf(scope),
                ));
            }
        }
    }

    tracing::info!(
        camera = ?layout.camera_position,
        "Scene mounted"
    );
}
