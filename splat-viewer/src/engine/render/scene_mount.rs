use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy::render::view::NoFrustumCulling;
use bevy::window::PrimaryWindow;
use splat_scene::VertexAttributeSet;

use crate::engine::assets::viewer_config::ShadingConfig;
use crate::engine::camera::controller::set_cursor_capture;
use crate::engine::camera::navigator::Navigator;
use crate::engine::render::material::SplatMaterial;
use crate::engine::render::mesh::build_splat_mesh;

/// Marker for the entity drawing the mounted scene.
#[derive(Component)]
pub struct SplatScene;

/// GPU-side resources of the scene currently on screen.
#[derive(Resource, Debug)]
pub struct MountedScene {
    pub entity: Entity,
    pub mesh: Handle<Mesh>,
    pub material: Handle<SplatMaterial>,
    pub points: usize,
}

#[derive(SystemParam)]
pub struct SceneRenderAssets<'w> {
    pub meshes: ResMut<'w, Assets<Mesh>>,
    pub materials: ResMut<'w, Assets<SplatMaterial>>,
}

/// Upload a scene and spawn its entity. An empty set mounts nothing.
pub fn mount_scene(
    commands: &mut Commands,
    render_assets: &mut SceneRenderAssets,
    attributes: &VertexAttributeSet,
    shading: &ShadingConfig,
) -> Option<MountedScene> {
    if attributes.is_empty() {
        warn!("No splats to mount; showing an empty scene");
        return None;
    }

    let mesh = render_assets.meshes.add(build_splat_mesh(attributes));
    let material = render_assets.materials.add(SplatMaterial::new(shading));

    // Quads grow in screen space, so the position-only AABB is too tight to cull with.
    let entity = commands
        .spawn((
            SplatScene,
            Mesh3d(mesh.clone()),
            MeshMaterial3d(material.clone()),
            Transform::IDENTITY,
            NoFrustumCulling,
        ))
        .id();

    info!("✓ Mounted {} splats", attributes.len());

    Some(MountedScene {
        entity,
        mesh,
        material,
        points: attributes.len(),
    })
}

/// Release a scene's mesh and material and despawn its entity. Assets that are
/// already gone are logged and skipped.
pub fn release_scene(
    commands: &mut Commands,
    render_assets: &mut SceneRenderAssets,
    scene: &MountedScene,
) {
    if render_assets.meshes.remove(&scene.mesh).is_none() {
        warn!("Scene mesh was already released");
    }
    if render_assets.materials.remove(&scene.material).is_none() {
        warn!("Scene material was already released");
    }
    commands.entity(scene.entity).try_despawn();
}

/// Teardown on leaving `Ready`: input first, then GPU resources.
pub fn unmount_scene(
    mut commands: Commands,
    mounted: Option<Res<MountedScene>>,
    mut render_assets: SceneRenderAssets,
    mut navigators: Query<&mut Navigator>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
) {
    for mut navigator in &mut navigators {
        navigator.release();
    }
    for mut window in &mut windows {
        set_cursor_capture(&mut window, false);
    }

    let Some(scene) = mounted else {
        return;
    };
    release_scene(&mut commands, &mut render_assets, &scene);
    commands.remove_resource::<MountedScene>();
    info!("Unmounted scene ({} splats)", scene.points);
}
