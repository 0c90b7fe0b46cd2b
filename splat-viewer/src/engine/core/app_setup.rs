use bevy::asset::AssetMetaCheck;
use bevy::prelude::*;
use bevy_common_assets::json::JsonAssetPlugin;

// Crate engine modules
use crate::engine::assets::splat_scene_asset::{SplatSceneAsset, SplatSceneLoader};
use crate::engine::assets::viewer_config::ViewerConfig;
use crate::engine::camera::controller::{
    PointerLockWatch, apply_look, apply_navigation, collect_movement_keys, handle_capture_gestures,
};
use crate::engine::camera::navigator::Navigator;
use crate::engine::core::app_state::{
    SceneStatusChanged, ViewerPhase, ViewerStatus, log_phase_transitions,
};
use crate::engine::core::window_config::create_window_config;
use crate::engine::loading::config_loader::{ConfigLoader, resolve_config, start_config_loading};
use crate::engine::loading::scene_loader::{
    LoadSceneRequest, SceneLoader, UnmountSceneRequest, begin_scene_loads,
    handle_unmount_requests, poll_scene_load,
};
use crate::engine::render::material::SplatMaterial;
use crate::engine::render::scene_mount::unmount_scene;
// Host messaging
use crate::rpc::web_rpc::WebRpcPlugin;

pub fn create_app() -> App {
    let mut app = App::new();
    app.add_plugins(create_default_plugins())
        .add_plugins(SplatViewerPlugin);
    app
}

/// Everything the viewer needs on top of Bevy's default plugins.
pub struct SplatViewerPlugin;

impl Plugin for SplatViewerPlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<ViewerPhase>()
            .add_plugins(MaterialPlugin::<SplatMaterial>::default())
            // Registers ViewerConfig as a loadable asset type from JSON files.
            .add_plugins(JsonAssetPlugin::<ViewerConfig>::new(&["json"]))
            .init_asset::<SplatSceneAsset>()
            .register_asset_loader(SplatSceneLoader)
            .add_plugins(WebRpcPlugin)
            .insert_resource(ClearColor(Color::BLACK));

        // Initialise resources early
        app.init_resource::<ViewerConfig>()
            .init_resource::<ConfigLoader>()
            .init_resource::<SceneLoader>()
            .init_resource::<ViewerStatus>()
            .init_resource::<PointerLockWatch>()
            .add_event::<LoadSceneRequest>()
            .add_event::<UnmountSceneRequest>()
            .add_event::<SceneStatusChanged>();

        app.add_systems(Startup, (spawn_camera, start_config_loading).chain())
            .add_systems(
                Update,
                (
                    resolve_config.run_if(in_state(ViewerPhase::Configuring)),
                    handle_unmount_requests,
                    begin_scene_loads,
                    poll_scene_load.run_if(in_state(ViewerPhase::Loading)),
                )
                    .chain(),
            )
            .add_systems(
                Update,
                // Navigation runs only while a scene is on screen.
                (
                    handle_capture_gestures,
                    collect_movement_keys,
                    apply_look,
                    apply_navigation,
                )
                    .chain()
                    .run_if(in_state(ViewerPhase::Ready)),
            )
            .add_systems(OnExit(ViewerPhase::Ready), unmount_scene)
            .add_systems(Update, log_phase_transitions);
    }
}

fn spawn_camera(mut commands: Commands, config: Res<ViewerConfig>) {
    let navigator = Navigator::new(&config.navigation);
    commands.spawn((Camera3d::default(), navigator.transform(), navigator));
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    DefaultPlugins.set(window_config).set(asset_config)
}
