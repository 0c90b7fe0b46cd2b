use bevy::pbr::{MaterialPipeline, MaterialPipelineKey};
use bevy::prelude::*;
use bevy::reflect::TypePath;
use bevy::render::mesh::MeshVertexBufferLayoutRef;
use bevy::render::render_resource::{
    AsBindGroup, BlendComponent, BlendFactor, BlendOperation, BlendState,
    RenderPipelineDescriptor, ShaderRef, ShaderType, SpecializedMeshPipelineError,
};

use crate::engine::assets::viewer_config::ShadingConfig;
use crate::engine::render::mesh::{
    ATTRIBUTE_SPLAT_COLOUR, ATTRIBUTE_SPLAT_CORNER, ATTRIBUTE_SPLAT_OPACITY, ATTRIBUTE_SPLAT_SIZE,
};

const SHADER_ASSET_PATH: &str = "shaders/splat_points.wgsl";

#[derive(Debug, Clone, Copy, PartialEq, ShaderType)]
pub struct SplatParams {
    pub size_scale: f32,
    pub alpha_cutoff: f32,
    pub falloff: f32,
    pub max_point_px: f32,
}

impl From<&ShadingConfig> for SplatParams {
    fn from(shading: &ShadingConfig) -> Self {
        Self {
            size_scale: shading.size_scale,
            alpha_cutoff: shading.alpha_cutoff,
            falloff: shading.falloff,
            max_point_px: shading.max_point_px,
        }
    }
}

/// Soft additive splat material. Depth is tested but never written, so
/// overlapping splats accumulate regardless of draw order.
#[derive(Asset, TypePath, AsBindGroup, Debug, Clone)]
pub struct SplatMaterial {
    #[uniform(0)]
    pub params: SplatParams,
}

impl SplatMaterial {
    pub fn new(shading: &ShadingConfig) -> Self {
        Self {
            params: shading.into(),
        }
    }
}

impl Material for SplatMaterial {
    fn vertex_shader() -> ShaderRef {
        SHADER_ASSET_PATH.into()
    }

    fn fragment_shader() -> ShaderRef {
        SHADER_ASSET_PATH.into()
    }

    fn alpha_mode(&self) -> AlphaMode {
        AlphaMode::Add
    }

    fn specialize(
        _pipeline: &MaterialPipeline<Self>,
        descriptor: &mut RenderPipelineDescriptor,
        layout: &MeshVertexBufferLayoutRef,
        _key: MaterialPipelineKey<Self>,
    ) -> Result<(), SpecializedMeshPipelineError> {
        let vertex_layout = layout.0.get_layout(&[
            Mesh::ATTRIBUTE_POSITION.at_shader_location(0),
            ATTRIBUTE_SPLAT_COLOUR.at_shader_location(1),
            ATTRIBUTE_SPLAT_SIZE.at_shader_location(2),
            ATTRIBUTE_SPLAT_OPACITY.at_shader_location(3),
            ATTRIBUTE_SPLAT_CORNER.at_shader_location(4),
        ])?;
        descriptor.vertex.buffers = vec![vertex_layout];

        // Quads always face the camera.
        descriptor.primitive.cull_mode = None;

        if let Some(depth_stencil) = descriptor.depth_stencil.as_mut() {
            depth_stencil.depth_write_enabled = false;
        }

        // The fragment stage outputs straight alpha.
        let additive = BlendState {
            color: BlendComponent {
                src_factor: BlendFactor::SrcAlpha,
                dst_factor: BlendFactor::One,
                operation: BlendOperation::Add,
            },
            alpha: BlendComponent {
                src_factor: BlendFactor::One,
                dst_factor: BlendFactor::One,
                operation: BlendOperation::Add,
            },
        };
        if let Some(fragment) = descriptor.fragment.as_mut() {
            for target in fragment.targets.iter_mut().flatten() {
                target.blend = Some(additive);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_follow_shading_config() {
        let shading = ShadingConfig {
            size_scale: 120.0,
            alpha_cutoff: 0.05,
            falloff: 3.0,
            max_point_px: 64.0,
        };
        let material = SplatMaterial::new(&shading);
        assert_eq!(material.params.size_scale, 120.0);
        assert_eq!(material.params.alpha_cutoff, 0.05);
        assert_eq!(material.params.falloff, 3.0);
        assert_eq!(material.params.max_point_px, 64.0);
        assert_eq!(material.alpha_mode(), AlphaMode::Add);
    }
}
