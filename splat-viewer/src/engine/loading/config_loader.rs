use bevy::asset::LoadState;
use bevy::prelude::*;

use crate::engine::assets::viewer_config::ViewerConfig;
use crate::engine::camera::navigator::Navigator;
use crate::engine::core::app_state::ViewerPhase;
use crate::engine::loading::scene_loader::LoadSceneRequest;

pub const VIEWER_CONFIG_PATH: &str = "viewer_config.json";

#[derive(Resource, Default)]
pub struct ConfigLoader {
    handle: Option<Handle<ViewerConfig>>,
}

pub fn start_config_loading(mut loader: ResMut<ConfigLoader>, asset_server: Res<AssetServer>) {
    loader.handle = Some(asset_server.load(VIEWER_CONFIG_PATH));
}

/// Install the loaded configuration, or the defaults if the file is missing or
/// invalid, then leave `Configuring`.
pub fn resolve_config(
    loader: Res<ConfigLoader>,
    asset_server: Res<AssetServer>,
    configs: Res<Assets<ViewerConfig>>,
    mut current: ResMut<ViewerConfig>,
    mut navigators: Query<(&mut Navigator, &mut Transform)>,
    mut requests: EventWriter<LoadSceneRequest>,
    mut next_phase: ResMut<NextState<ViewerPhase>>,
) {
    let Some(handle) = &loader.handle else {
        return;
    };

    let config = match asset_server.get_load_state(handle) {
        Some(LoadState::Loaded) => match configs.get(handle) {
            Some(config) => {
                info!("✓ Viewer config loaded from {}", VIEWER_CONFIG_PATH);
                config.clone()
            }
            None => ViewerConfig::default(),
        },
        Some(LoadState::Failed(error)) => {
            warn!("Viewer config unavailable, using defaults: {}", error);
            ViewerConfig::default()
        }
        _ => return,
    };

    for (mut navigator, mut transform) in &mut navigators {
        navigator.configure(&config.navigation);
        *transform = navigator.transform();
    }

    if let Some(path) = &config.initial_scene {
        requests.write(LoadSceneRequest { path: path.clone() });
    }

    *current = config;
    next_phase.set(ViewerPhase::Idle);
}
