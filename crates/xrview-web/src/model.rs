//! glTF model loading and animation playback
//!
//! Bevy samples the clip; the playhead comes from the view model, which is
//! ticked once per frame here.

use bevy::asset::LoadState;
use bevy::gltf::Gltf;
use bevy::prelude::*;
use xrview_core::{BindOutcome, ClipInfo};

use crate::app::Viewer;
use crate::scene::SessionScope;

pub struct ModelPlugin;

impl Plugin for ModelPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, load_model)
            .add_systems(
                Update,
                (
                    detect_model_failure,
                    bind_loaded_model,
                    attach_animation_players,
                    tick_model_animation,
                )
                    .chain(),
            );
    }
}

/// Marker for the spawned glTF scene
#[derive(Component)]
pub struct ModelRoot;

/// Handles for the model and the animation graph built from its clip
#[derive(Resource)]
pub struct ModelAsset {
    pub handle: Handle<Gltf>,
    /// Bumped every time the glTF (re)loads, used as the binding source key
    pub generation: u64,
    pub root: Option<Entity>,
    pub graph: Option<(Handle<AnimationGraph>, AnimationNodeIndex)>,
}

fn load_model(mut commands: Commands, asset_server: Res<AssetServer>, viewer: Res<Viewer>) {
    let path = viewer.config().assets.model.clone();
    tracing::info!("Loading model: {}", path);
    commands.insert_resource(ModelAsset {
        handle: asset_server.load(path),
        generation: 0,
        root: None,
        graph: None,
    });
}

fn detect_model_failure(
    asset_server: Res<AssetServer>,
    model: Res<ModelAsset>,
    mut viewer: ResMut<Viewer>,
) {
    if viewer.model_status().is_ready() || viewer.model_status().is_failed() {
        return;
    }
    if let LoadState::Failed(err) = asset_server.load_state(&model.handle) {
        viewer.model_failed(err.to_string());
    }
}

fn bind_loaded_model(
    mut commands: Commands,
    mut events: MessageReader<AssetEvent<Gltf>>,
    gltfs: Res<Assets<Gltf>>,
    clips: Res<Assets<AnimationClip>>,
    mut graphs: ResMut<Assets<AnimationGraph>>,
    mut model: ResMut<ModelAsset>,
    mut viewer: ResMut<Viewer>,
    scope: Query<Entity, With<SessionScope>>,
) {
    let model_id = model.handle.id();
    let mut changed = false;
    for event in events.read() {
        match event {
            AssetEvent::LoadedWithDependencies { id } | AssetEvent::Modified { id }
                if *id == model_id =>
            {
                changed = true;
            }
            _ => {}
        }
    }
    if !changed {
        return;
    }

    let Some(gltf) = gltfs.get(&model.handle) else {
        return;
    };

    model.generation += 1;
    let infos: Vec<ClipInfo> = gltf
        .animations
        .iter()
        .map(|handle| ClipInfo {
            name: gltf
                .named_animations
                .iter()
                .find(|(_, named)| *named == handle)
                .map(|(name, _)| name.to_string()),
            duration: clips.get(handle).map(|clip| clip.duration()).unwrap_or(0.0),
        })
        .collect();

    match viewer.model_loaded(model.generation, &infos) {
        BindOutcome::Bound { clip_index } => {
            let (graph, node) = AnimationGraph::from_clip(gltf.animations[clip_index].clone());
            model.graph = Some((graphs.add(graph), node));
        }
        BindOutcome::Static => {
            model.graph = None;
        }
        BindOutcome::Unchanged => {}
    }

    if model.root.is_some() {
        // Hot reloads respawn through the scene asset itself
        return;
    }

    let Some(scene) = gltf
        .default_scene
        .clone()
        .or_else(|| gltf.scenes.first().cloned())
    else {
        tracing::warn!("Model contains no scenes, nothing to render");
        return;
    };

    let mut root = commands.spawn((SceneRoot(scene), ModelRoot));
    if let Ok(scope) = scope.single() {
        root.insert(ChildOf(scope));
    }
    model.root = Some(root.id());
}

/// Point every animation player in the model at the current graph.
///
/// Players appear once the scene is instantiated and again after a reload.
fn attach_animation_players(
    mut commands: Commands,
    model: Res<ModelAsset>,
    mut players: Query<(Entity, &mut AnimationPlayer, Option<&AnimationGraphHandle>)>,
) {
    for (entity, mut player, current) in &mut players {
        match &model.graph {
            Some((graph, node)) => {
                if current.map(|h| &h.0) == Some(graph) {
                    continue;
                }
                commands
                    .entity(entity)
                    .insert(AnimationGraphHandle(graph.clone()));
                player.stop_all();
                // Paused: the playhead is driven by tick_model_animation
                player.play(*node).repeat().pause();
            }
            None => {
                if current.is_some() {
                    commands.entity(entity).remove::<AnimationGraphHandle>();
                    player.stop_all();
                }
            }
        }
    }
}

fn tick_model_animation(
    time: Res<Time>,
    model: Res<ModelAsset>,
    mut viewer: ResMut<Viewer>,
    mut players: Query<&mut AnimationPlayer>,
) {
    viewer.tick(time.delta_secs());

    let (Some(position), Some((_, node))) = (viewer.animation.position(), &model.graph) else {
        return;
    };
    for mut player in &mut players {
        if let Some(active) = player.animation_mut(*node) {
            active.seek_to(position);
        }
    }
}
