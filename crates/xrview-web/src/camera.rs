//! Orbit camera controls for desktop preview
//!
//! Mounted outside the session scope so navigation keeps working whether or
//! not an immersive session is running.

use bevy::input::mouse::{AccumulatedMouseMotion, AccumulatedMouseScroll};
use bevy::prelude::*;

use crate::app::Viewer;
use crate::scene::MainCamera;

/// Camera controller settings
#[derive(Debug, Clone, Resource)]
pub struct OrbitSettings {
    pub distance: f32,
    pub target_distance: f32, // For smooth zoom
    pub azimuth: f32,
    pub elevation: f32,
    pub target: Vec3,
    pub target_focus: Vec3, // For smooth re-centering
    pub sensitivity: f32,
    pub zoom_speed: f32,
    pub smooth_factor: f32,
}

impl OrbitSettings {
    /// Spherical coordinates (Y up) matching a camera placed at `position`
    pub fn looking_from(position: Vec3, target: Vec3) -> Self {
        let offset = position - target;
        let distance = offset.length().max(0.05);
        Self {
            distance,
            target_distance: distance,
            azimuth: offset.x.atan2(offset.z),
            elevation: (offset.y / distance).clamp(-1.0, 1.0).asin(),
            target,
            target_focus: target,
            sensitivity: 0.005,
            zoom_speed: 0.1,
            smooth_factor: 0.15,
        }
    }

    fn eye(&self) -> Vec3 {
        let x = self.distance * self.elevation.cos() * self.azimuth.sin();
        let y = self.distance * self.elevation.sin();
        let z = self.distance * self.elevation.cos() * self.azimuth.cos();
        self.target + Vec3::new(x, y, z)
    }
}

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, init_orbit)
            .add_systems(Update, update_camera.run_if(resource_exists::<OrbitSettings>));
    }
}

fn init_orbit(mut commands: Commands, viewer: Res<Viewer>) {
    let layout = viewer.layout();
    if !layout.has_orbit_controls() {
        return;
    }
    commands.insert_resource(OrbitSettings::looking_from(
        Vec3::from_array(layout.camera_position),
        Vec3::from_array(layout.camera_target),
    ));
}

fn update_camera(
    mut camera_query: Query<&mut Transform, With<MainCamera>>,
    mut settings: ResMut<OrbitSettings>,
    mouse_motion: Res<AccumulatedMouseMotion>,
    mouse_scroll: Res<AccumulatedMouseScroll>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    touch_input: Res<Touches>,
    time: Res<Time>,
    mut contexts: bevy_egui::EguiContexts,
) {
    // Don't fight the overlay for the pointer
    let egui_wants_pointer = contexts
        .ctx_mut()
        .map(|ctx| ctx.wants_pointer_input())
        .unwrap_or(false);

    let motion = mouse_motion.delta;

    // Orbit with left mouse drag
    if mouse_button.pressed(MouseButton::Left) && !egui_wants_pointer {
        settings.azimuth -= motion.x * settings.sensitivity;
        settings.elevation = (settings.elevation - motion.y * settings.sensitivity)
            .clamp(-1.5, 1.5);
    }

    // Pan with right mouse drag in the view plane
    if mouse_button.pressed(MouseButton::Right) && !egui_wants_pointer {
        let right = Vec3::new(settings.azimuth.cos(), 0.0, -settings.azimuth.sin());
        let pan_speed = settings.distance * 0.002;
        settings.target_focus -= right * motion.x * pan_speed;
        settings.target_focus += Vec3::Y * motion.y * pan_speed;
    }

    // Zoom with scroll
    if !egui_wants_pointer && mouse_scroll.delta.y != 0.0 {
        let zoom_factor = 1.0 - mouse_scroll.delta.y * settings.zoom_speed * 0.3;
        settings.target_distance = (settings.target_distance * zoom_factor).clamp(0.2, 20.0);
    }

    // Touch support for mobile
    if touch_input.iter().count() == 1 && !egui_wants_pointer {
        for touch in touch_input.iter() {
            let delta = touch.delta();
            if delta != Vec2::ZERO {
                settings.azimuth -= delta.x * settings.sensitivity;
                settings.elevation = (settings.elevation - delta.y * settings.sensitivity)
                    .clamp(-1.5, 1.5);
            }
        }
    }

    // Pinch to zoom
    if touch_input.iter().count() == 2 {
        let touches: Vec<_> = touch_input.iter().collect();
        if let (Some(t1), Some(t2)) = (touches.first(), touches.get(1)) {
            let curr_dist = t1.position().distance(t2.position());
            let prev_dist = (t1.position() - t1.delta())
                .distance(t2.position() - t2.delta());
            let zoom_factor = prev_dist / curr_dist.max(1.0);
            settings.target_distance = (settings.target_distance * zoom_factor).clamp(0.2, 20.0);
        }
    }

    // Smooth interpolation for zoom and target
    let dt = time.delta_secs();
    let lerp_factor = 1.0 - (-settings.smooth_factor * 60.0 * dt).exp();
    settings.distance = settings.distance + (settings.target_distance - settings.distance) * lerp_factor;
    settings.target = settings.target + (settings.target_focus - settings.target) * lerp_factor;

    if let Ok(mut transform) = camera_query.single_mut() {
        transform.translation = settings.eye();
        transform.look_at(settings.target, Vec3::Y);
    }
}
