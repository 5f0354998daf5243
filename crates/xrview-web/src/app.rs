//! Bevy application setup

use bevy::asset::AssetMetaCheck;
use bevy::prelude::*;
use bevy_egui::EguiPlugin;
use xrview_core::{SceneConfig, ViewModel};

use crate::camera::CameraPlugin;
use crate::model::ModelPlugin;
use crate::scene::ScenePlugin;
use crate::sound::SoundPlugin;
use crate::ui::UiPlugin;

/// Asset folder, copied next to index.html by trunk's `copy-dir` link
pub const ASSET_DIR: &str = "assets";

/// The mounted view, constructed once and shared by every plugin
#[derive(Resource, Deref, DerefMut)]
pub struct Viewer(pub ViewModel);

/// Run the Bevy application
pub fn run(config: SceneConfig) {
    App::new()
        .insert_resource(ClearColor(Color::srgb(0.1, 0.1, 0.15)))
        .add_plugins(DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: "xrview".to_string(),
                    canvas: Some("#xrview-canvas".to_string()),
                    fit_canvas_to_parent: true,
                    prevent_default_event_handling: false,
                    ..default()
                }),
                ..default()
            })
            .set(AssetPlugin {
                file_path: ASSET_DIR.to_string(),
                // Don't look for .meta files - static hosting doesn't have them
                meta_check: AssetMetaCheck::Never,
                ..default()
            })
        )
        .add_plugins(EguiPlugin::default())
        .insert_resource(Viewer(ViewModel::mount(config)))
        .add_plugins(ScenePlugin)
        .add_plugins(CameraPlugin)
        .add_plugins(ModelPlugin)
        .add_plugins(SoundPlugin)
        .add_plugins(UiPlugin)
        .add_systems(Last, teardown_on_exit)
        .run();
}

/// Late session `end` events must not reach an unmounted view
fn teardown_on_exit(mut exits: MessageReader<AppExit>, viewer: Res<Viewer>) {
    if exits.read().next().is_some() {
        viewer.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_dir_matches_trunk_copy() {
        let index = include_str!("../index.html");
        let copy = format!(r#"<link data-trunk rel="copy-dir" href="{}" />"#, ASSET_DIR);
        assert!(index.contains(&copy));
    }
}
