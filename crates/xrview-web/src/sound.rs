//! Ambient sound playback

use bevy::asset::LoadState;
use bevy::audio::{PlaybackMode, Volume};
use bevy::prelude::*;
use xrview_core::PlaybackParams;

use crate::app::Viewer;
use crate::scene::{MainCamera, SessionScope};

pub struct SoundPlugin;

impl Plugin for SoundPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AmbientAudio>()
            .add_systems(Startup, begin_ambient_load)
            .add_systems(Update, (attach_listener, start_when_loaded));
    }
}

/// Handle of the ambient clip while it loads
#[derive(Resource, Default)]
pub struct AmbientAudio {
    pub handle: Option<Handle<AudioSource>>,
}

/// Marker for the single ambient audio source
#[derive(Component)]
pub struct AmbientSoundSource;

fn begin_ambient_load(
    asset_server: Res<AssetServer>,
    mut viewer: ResMut<Viewer>,
    mut audio: ResMut<AmbientAudio>,
) {
    if let Some(path) = viewer.sound.begin_load() {
        tracing::info!("Loading ambient sound: {}", path);
        audio.handle = Some(asset_server.load(path.to_string()));
    }
}

fn attach_listener(
    mut commands: Commands,
    mut viewer: ResMut<Viewer>,
    cameras: Query<Entity, (With<MainCamera>, Without<SpatialListener>)>,
) {
    let Ok(camera) = cameras.single() else {
        return;
    };
    if viewer.sound.attach_listener() {
        commands.entity(camera).insert(SpatialListener::default());
    }
}

/// Starts playback as soon as the clip is decoded; autoplay is not gated on
/// a user gesture, so the browser may keep the audio context suspended.
fn start_when_loaded(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    audio: Res<AmbientAudio>,
    mut viewer: ResMut<Viewer>,
    scope: Query<Entity, With<SessionScope>>,
) {
    if viewer.sound.is_playing() || viewer.sound.status().is_failed() {
        return;
    }
    let Some(handle) = &audio.handle else {
        return;
    };

    match asset_server.load_state(handle) {
        LoadState::Loaded => {
            let Some(params) = viewer.sound.complete_load() else {
                return;
            };
            let mut source = commands.spawn((
                AudioPlayer::new(handle.clone()),
                playback_settings(params),
                AmbientSoundSource,
            ));
            if let Ok(scope) = scope.single() {
                source.insert(ChildOf(scope));
            }
        }
        LoadState::Failed(err) => {
            viewer.sound.fail_load(err.to_string());
        }
        _ => {}
    }
}

fn playback_settings(params: PlaybackParams) -> PlaybackSettings {
    PlaybackSettings {
        mode: if params.looped {
            PlaybackMode::Loop
        } else {
            PlaybackMode::Once
        },
        volume: Volume::Linear(params.volume),
        ..default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_playback_settings_loop_at_half_volume() {
        let settings = playback_settings(PlaybackParams::default());
        assert!(matches!(settings.mode, PlaybackMode::Loop));
        assert!(matches!(settings.volume, Volume::Linear(v) if v == 0.5));
        assert!(!settings.paused);
    }
}
