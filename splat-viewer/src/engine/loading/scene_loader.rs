use bevy::asset::{AssetLoadError, LoadState};
use bevy::prelude::*;
use splat_scene::{DecodeFailure, DecodeOptions};

use crate::engine::assets::splat_scene_asset::SplatSceneAsset;
use crate::engine::assets::viewer_config::ViewerConfig;
use crate::engine::camera::navigator::Navigator;
use crate::engine::core::app_state::{
    SceneErrorKind, SceneStatus, SceneStatusChanged, ViewerPhase, ViewerStatus, publish_status,
};
use crate::engine::loading::generation::{LoadGeneration, LoadTicket};
use crate::engine::render::framing::frame_positions;
use crate::engine::render::scene_mount::{
    MountedScene, SceneRenderAssets, mount_scene, release_scene,
};

/// Ask the viewer to replace the current scene. `path` is an asset path; on
/// the web it is fetched relative to the hosting page.
#[derive(Event, Debug, Clone)]
pub struct LoadSceneRequest {
    pub path: String,
}

/// Drop the current scene (and any load in flight) and return to idle.
#[derive(Event, Debug, Clone, Default)]
pub struct UnmountSceneRequest;

#[derive(Debug)]
pub struct PendingLoad {
    pub ticket: LoadTicket,
    pub path: String,
    pub handle: Handle<SplatSceneAsset>,
}

/// Tracks the single scene load allowed to be in flight.
#[derive(Resource, Default)]
pub struct SceneLoader {
    generation: LoadGeneration,
    requested: Option<String>,
    pending: Option<PendingLoad>,
}

impl SceneLoader {
    /// Remember a path to load; a later request overrides an earlier one.
    pub fn queue(&mut self, path: String) {
        self.requested = Some(path);
    }

    pub fn take_requested(&mut self) -> Option<String> {
        self.requested.take()
    }

    /// Start tracking a new load. Any load still pending is superseded and its
    /// handle dropped.
    pub fn track(&mut self, path: String, handle: Handle<SplatSceneAsset>) -> LoadTicket {
        let ticket = self.generation.begin();
        if let Some(stale) = self.pending.replace(PendingLoad {
            ticket,
            path,
            handle,
        }) {
            debug!("Superseding pending load of {}", stale.path);
        }
        ticket
    }

    pub fn cancel(&mut self) {
        self.generation.invalidate();
        self.requested = None;
        if let Some(stale) = self.pending.take() {
            debug!("Cancelled pending load of {}", stale.path);
        }
    }

    pub fn pending(&self) -> Option<&PendingLoad> {
        self.pending.as_ref()
    }

    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        self.generation.is_current(ticket)
    }

    /// Take the pending load if it is still current; a stale one is discarded.
    pub fn take_current(&mut self) -> Option<PendingLoad> {
        let pending = self.pending.take()?;
        if self.generation.is_current(pending.ticket) {
            Some(pending)
        } else {
            debug!("Discarding stale load of {}", pending.path);
            None
        }
    }
}

pub fn handle_unmount_requests(
    mut requests: EventReader<UnmountSceneRequest>,
    mut loader: ResMut<SceneLoader>,
    phase: Res<State<ViewerPhase>>,
    mut status: ResMut<ViewerStatus>,
    mut status_events: EventWriter<SceneStatusChanged>,
    mut next_phase: ResMut<NextState<ViewerPhase>>,
) {
    if requests.read().last().is_none() {
        return;
    }

    loader.cancel();
    if *phase.get() == ViewerPhase::Configuring {
        return;
    }

    publish_status(&mut status, &mut status_events, SceneStatus::Idle);
    // Leaving Ready runs the scene teardown.
    next_phase.set(ViewerPhase::Idle);
}

/// Start the newest requested load once configuration has resolved.
pub fn begin_scene_loads(
    mut requests: EventReader<LoadSceneRequest>,
    mut loader: ResMut<SceneLoader>,
    phase: Res<State<ViewerPhase>>,
    config: Res<ViewerConfig>,
    asset_server: Res<AssetServer>,
    mut status: ResMut<ViewerStatus>,
    mut status_events: EventWriter<SceneStatusChanged>,
    mut next_phase: ResMut<NextState<ViewerPhase>>,
) {
    if let Some(request) = requests.read().last() {
        loader.queue(request.path.clone());
    }
    // Decode options are only known once configuration resolves.
    if *phase.get() == ViewerPhase::Configuring {
        return;
    }
    let Some(path) = loader.take_requested() else {
        return;
    };

    let options = config.decode.clone();
    let handle: Handle<SplatSceneAsset> =
        asset_server.load_with_settings(path.clone(), move |settings: &mut DecodeOptions| {
            *settings = options.clone();
        });
    loader.track(path.clone(), handle);

    publish_status(
        &mut status,
        &mut status_events,
        SceneStatus::Loading { path },
    );
    next_phase.set(ViewerPhase::Loading);
}

/// Resolve the pending load: frame and mount it, or report why it failed.
pub fn poll_scene_load(
    mut commands: Commands,
    mut loader: ResMut<SceneLoader>,
    asset_server: Res<AssetServer>,
    mut scenes: ResMut<Assets<SplatSceneAsset>>,
    mut render_assets: SceneRenderAssets,
    mounted: Option<Res<MountedScene>>,
    config: Res<ViewerConfig>,
    mut navigators: Query<&mut Navigator>,
    mut status: ResMut<ViewerStatus>,
    mut status_events: EventWriter<SceneStatusChanged>,
    mut next_phase: ResMut<NextState<ViewerPhase>>,
) {
    let (ticket, handle) = match loader.pending() {
        Some(pending) => (pending.ticket, pending.handle.clone()),
        None => return,
    };
    if !loader.is_current(ticket) {
        loader.take_current();
        return;
    }

    if !scenes.contains(&handle) {
        if let Some(LoadState::Failed(error)) = asset_server.get_load_state(&handle) {
            if let Some(pending) = loader.take_current() {
                publish_status(
                    &mut status,
                    &mut status_events,
                    fetch_failure(pending.path, &error),
                );
                next_phase.set(ViewerPhase::Failed);
            }
        }
        return;
    }

    let Some(pending) = loader.take_current() else {
        return;
    };
    // Taking the asset out releases the CPU copy once the mesh is built.
    let Some(asset) = scenes.remove(&pending.handle) else {
        return;
    };
    let mut scene = match asset.outcome {
        Ok(scene) => scene,
        Err(failure) => {
            publish_status(
                &mut status,
                &mut status_events,
                decode_failure(pending.path, &failure),
            );
            next_phase.set(ViewerPhase::Failed);
            return;
        }
    };

    if let Some(previous) = mounted {
        warn!("Releasing a scene that was still mounted");
        release_scene(&mut commands, &mut render_assets, &previous);
    }

    frame_positions(scene.attributes.positions_mut(), &config.framing);
    let points = match mount_scene(
        &mut commands,
        &mut render_assets,
        &scene.attributes,
        &config.shading,
    ) {
        Some(mounted) => {
            let points = mounted.points;
            commands.insert_resource(mounted);
            points
        }
        None => {
            commands.remove_resource::<MountedScene>();
            0
        }
    };

    for mut navigator in &mut navigators {
        navigator.reset();
    }

    publish_status(
        &mut status,
        &mut status_events,
        SceneStatus::Ready {
            path: pending.path,
            points,
            report: scene.report,
        },
    );
    next_phase.set(ViewerPhase::Ready);
}

/// A failed load state means the bytes never reached the decoder. Decode
/// failures arrive inside the asset instead.
fn fetch_failure(path: String, error: &AssetLoadError) -> SceneStatus {
    SceneStatus::Error {
        path,
        kind: SceneErrorKind::Fetch,
        reason: None,
        message: error.to_string(),
    }
}

fn decode_failure(path: String, failure: &DecodeFailure) -> SceneStatus {
    SceneStatus::Error {
        path,
        kind: SceneErrorKind::Decode,
        reason: Some(failure.kind()),
        message: failure.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::asset::io::AssetReaderError;
    use bevy::state::app::StatesPlugin;
    use splat_scene::{DecodeReport, VertexAttributeSet};

    use crate::engine::assets::splat_scene_asset::DecodedScene;
    use crate::engine::render::material::SplatMaterial;
    use crate::engine::render::scene_mount::unmount_scene;

    fn scene_app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, AssetPlugin::default(), StatesPlugin))
            .init_asset::<Mesh>()
            .init_asset::<SplatMaterial>()
            .init_asset::<SplatSceneAsset>()
            .init_state::<ViewerPhase>()
            .init_resource::<SceneLoader>()
            .init_resource::<ViewerStatus>()
            .init_resource::<ViewerConfig>()
            .add_event::<SceneStatusChanged>()
            .add_systems(Update, poll_scene_load)
            .add_systems(OnExit(ViewerPhase::Ready), unmount_scene);
        app
    }

    fn decoded(points: usize) -> SplatSceneAsset {
        let mut attributes = VertexAttributeSet::with_capacity(points);
        for i in 0..points {
            attributes.push([i as f32, 1.0, -1.0], [1.0, 0.5, 0.0], 0.01, 1.0);
        }
        SplatSceneAsset {
            outcome: Ok(DecodedScene {
                attributes,
                report: DecodeReport::default(),
            }),
        }
    }

    /// Insert an already decoded asset and track it as the pending load.
    fn load(app: &mut App, path: &str, asset: SplatSceneAsset) {
        let handle = app
            .world_mut()
            .resource_mut::<Assets<SplatSceneAsset>>()
            .add(asset);
        app.world_mut()
            .resource_mut::<SceneLoader>()
            .track(path.into(), handle);
    }

    fn status(app: &App) -> SceneStatus {
        app.world().resource::<ViewerStatus>().0.clone()
    }

    fn mounted_ids(app: &App) -> (Entity, AssetId<Mesh>, AssetId<SplatMaterial>, usize) {
        let mounted = app.world().resource::<MountedScene>();
        (
            mounted.entity,
            mounted.mesh.id(),
            mounted.material.id(),
            mounted.points,
        )
    }

    fn assert_released(
        app: &App,
        entity: Entity,
        mesh: AssetId<Mesh>,
        material: AssetId<SplatMaterial>,
    ) {
        let world = app.world();
        assert!(!world.entities().contains(entity));
        assert!(!world.resource::<Assets<Mesh>>().contains(mesh));
        assert!(!world.resource::<Assets<SplatMaterial>>().contains(material));
        assert_eq!(world.resource::<Assets<Mesh>>().len(), 1);
        assert_eq!(world.resource::<Assets<SplatMaterial>>().len(), 1);
    }

    #[test]
    fn loaded_scene_is_mounted() {
        let mut app = scene_app();
        load(&mut app, "a.ply", decoded(3));
        app.update();

        let (entity, _, _, points) = mounted_ids(&app);
        assert_eq!(points, 3);
        assert!(app.world().entities().contains(entity));
        assert!(matches!(
            status(&app),
            SceneStatus::Ready { points: 3, ref path, .. } if path == "a.ply"
        ));
        // The CPU copy is dropped once uploaded.
        assert!(app.world().resource::<Assets<SplatSceneAsset>>().is_empty());
    }

    #[test]
    fn leaving_ready_releases_scene_before_next_upload() {
        let mut app = scene_app();
        load(&mut app, "a.ply", decoded(3));
        app.update();
        app.update();
        assert_eq!(
            *app.world().resource::<State<ViewerPhase>>().get(),
            ViewerPhase::Ready
        );
        let (entity, mesh, material, _) = mounted_ids(&app);

        load(&mut app, "b.ply", decoded(5));
        app.world_mut()
            .resource_mut::<NextState<ViewerPhase>>()
            .set(ViewerPhase::Loading);
        app.update();

        assert_released(&app, entity, mesh, material);
        let (next_entity, _, _, points) = mounted_ids(&app);
        assert_ne!(next_entity, entity);
        assert_eq!(points, 5);
    }

    #[test]
    fn still_mounted_scene_is_released_before_upload() {
        let mut app = scene_app();
        load(&mut app, "a.ply", decoded(3));
        app.update();
        let (entity, mesh, material, _) = mounted_ids(&app);

        load(&mut app, "b.ply", decoded(4));
        app.update();

        assert_released(&app, entity, mesh, material);
        assert_eq!(mounted_ids(&app).3, 4);
    }

    #[test]
    fn superseded_load_is_never_mounted() {
        let mut app = scene_app();
        load(&mut app, "old.ply", decoded(3));
        load(&mut app, "new.ply", decoded(5));
        app.update();

        assert_eq!(mounted_ids(&app).3, 5);
        assert!(matches!(
            status(&app),
            SceneStatus::Ready { ref path, .. } if path == "new.ply"
        ));
        assert_eq!(app.world().resource::<Assets<Mesh>>().len(), 1);
    }

    #[test]
    fn cancelled_load_is_never_mounted() {
        let mut app = scene_app();
        load(&mut app, "a.ply", decoded(3));
        app.world_mut().resource_mut::<SceneLoader>().cancel();
        app.update();

        assert!(app.world().get_resource::<MountedScene>().is_none());
        assert!(app.world().resource::<Assets<Mesh>>().is_empty());
        assert_eq!(status(&app), SceneStatus::Idle);
    }

    #[test]
    fn decode_failure_reports_its_reason() {
        let mut app = scene_app();
        load(
            &mut app,
            "broken.ply",
            SplatSceneAsset {
                outcome: Err(DecodeFailure::NoHeaderEnd),
            },
        );
        app.update();
        app.update();

        assert!(app.world().get_resource::<MountedScene>().is_none());
        assert_eq!(
            *app.world().resource::<State<ViewerPhase>>().get(),
            ViewerPhase::Failed
        );
        match status(&app) {
            SceneStatus::Error {
                path, kind, reason, ..
            } => {
                assert_eq!(path, "broken.ply");
                assert_eq!(kind, SceneErrorKind::Decode);
                assert_eq!(reason, Some("no_header_end"));
            }
            other => panic!("expected an error status, got {other:?}"),
        }
    }

    #[test]
    fn reader_errors_are_fetch_failures() {
        let error = AssetLoadError::AssetReaderError(AssetReaderError::NotFound("a.ply".into()));
        match fetch_failure("a.ply".into(), &error) {
            SceneStatus::Error { kind, reason, .. } => {
                assert_eq!(kind, SceneErrorKind::Fetch);
                assert_eq!(reason, None);
            }
            other => panic!("expected an error status, got {other:?}"),
        }
    }

    #[test]
    fn second_load_supersedes_first() {
        let mut loader = SceneLoader::default();
        let first = loader.track("first.ply".into(), Handle::default());
        let second = loader.track("second.ply".into(), Handle::default());

        assert!(!loader.is_current(first));
        assert!(loader.is_current(second));

        let pending = loader.take_current().unwrap();
        assert_eq!(pending.path, "second.ply");
        assert!(loader.take_current().is_none());
    }

    #[test]
    fn cancel_discards_pending_and_queued() {
        let mut loader = SceneLoader::default();
        loader.queue("queued.ply".into());
        loader.track("pending.ply".into(), Handle::default());

        loader.cancel();

        assert!(loader.take_requested().is_none());
        assert!(loader.pending().is_none());
    }

    #[test]
    fn latest_queued_path_wins() {
        let mut loader = SceneLoader::default();
        loader.queue("a.ply".into());
        loader.queue("b.ply".into());
        assert_eq!(loader.take_requested().as_deref(), Some("b.ply"));
        assert!(loader.take_requested().is_none());
    }
}
