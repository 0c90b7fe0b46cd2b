use bevy::prelude::*;
use bevy::render::mesh::{Indices, MeshVertexAttribute, PrimitiveTopology};
use bevy::render::render_asset::RenderAssetUsages;
use bevy::render::render_resource::VertexFormat;
use splat_scene::VertexAttributeSet;

pub const ATTRIBUTE_SPLAT_COLOUR: MeshVertexAttribute =
    MeshVertexAttribute::new("SplatColour", 917_340_201, VertexFormat::Float32x3);
pub const ATTRIBUTE_SPLAT_SIZE: MeshVertexAttribute =
    MeshVertexAttribute::new("SplatSize", 917_340_202, VertexFormat::Float32);
pub const ATTRIBUTE_SPLAT_OPACITY: MeshVertexAttribute =
    MeshVertexAttribute::new("SplatOpacity", 917_340_203, VertexFormat::Float32);
/// Quad corner in `[-1, 1]²`; the vertex shader expands it in screen space.
pub const ATTRIBUTE_SPLAT_CORNER: MeshVertexAttribute =
    MeshVertexAttribute::new("SplatCorner", 917_340_204, VertexFormat::Float32x2);

const CORNERS: [[f32; 2]; 4] = [[-1.0, -1.0], [1.0, -1.0], [1.0, 1.0], [-1.0, 1.0]];
const QUAD_INDICES: [u32; 6] = [0, 1, 2, 0, 2, 3];

pub const VERTICES_PER_SPLAT: usize = CORNERS.len();
pub const INDICES_PER_SPLAT: usize = QUAD_INDICES.len();

/// Build splat geometry: four vertices per point sharing its centre and
/// attributes, two triangles each.
///
/// WebGPU only rasterises one-pixel points, so a point primitive is emulated
/// with a screen-aligned quad.
pub fn build_splat_mesh(attributes: &VertexAttributeSet) -> Mesh {
    let vertex_count = attributes.len() * VERTICES_PER_SPLAT;

    let mut positions = Vec::with_capacity(vertex_count);
    let mut colours = Vec::with_capacity(vertex_count);
    let mut sizes = Vec::with_capacity(vertex_count);
    let mut opacities = Vec::with_capacity(vertex_count);
    let mut corners = Vec::with_capacity(vertex_count);
    let mut indices = Vec::with_capacity(attributes.len() * INDICES_PER_SPLAT);

    let splats = attributes
        .positions()
        .iter()
        .zip(attributes.colours())
        .zip(attributes.sizes())
        .zip(attributes.opacities());

    for (splat, (((position, colour), size), opacity)) in splats.enumerate() {
        let base = (splat * VERTICES_PER_SPLAT) as u32;
        for corner in CORNERS {
            positions.push(*position);
            colours.push(*colour);
            sizes.push(*size);
            opacities.push(*opacity);
            corners.push(corner);
        }
        indices.extend(QUAD_INDICES.map(|index| base + index));
    }

    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD,
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(ATTRIBUTE_SPLAT_COLOUR, colours);
    mesh.insert_attribute(ATTRIBUTE_SPLAT_SIZE, sizes);
    mesh.insert_attribute(ATTRIBUTE_SPLAT_OPACITY, opacities);
    mesh.insert_attribute(ATTRIBUTE_SPLAT_CORNER, corners);
    mesh.insert_indices(Indices::U32(indices));
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::render::mesh::VertexAttributeValues;

    fn two_splats() -> VertexAttributeSet {
        VertexAttributeSet::from_parts(
            vec![[0.0, 0.0, 0.0], [1.0, 2.0, 3.0]],
            vec![[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            vec![0.01, 0.05],
            vec![0.5, 1.0],
        )
        .unwrap()
    }

    #[test]
    fn four_vertices_and_six_indices_per_splat() {
        let mesh = build_splat_mesh(&two_splats());
        assert_eq!(mesh.count_vertices(), 8);

        let Some(Indices::U32(indices)) = mesh.indices() else {
            panic!("expected u32 indices");
        };
        assert_eq!(indices, &vec![0, 1, 2, 0, 2, 3, 4, 5, 6, 4, 6, 7]);
    }

    #[test]
    fn corners_share_splat_attributes() {
        let mesh = build_splat_mesh(&two_splats());

        let Some(VertexAttributeValues::Float32(sizes)) = mesh.attribute(ATTRIBUTE_SPLAT_SIZE)
        else {
            panic!("missing size attribute");
        };
        assert_eq!(&sizes[..4], &[0.01; 4]);
        assert_eq!(&sizes[4..], &[0.05; 4]);

        let Some(VertexAttributeValues::Float32x3(positions)) =
            mesh.attribute(Mesh::ATTRIBUTE_POSITION)
        else {
            panic!("missing position attribute");
        };
        assert!(positions[4..].iter().all(|p| *p == [1.0, 2.0, 3.0]));

        let Some(VertexAttributeValues::Float32x2(corners)) =
            mesh.attribute(ATTRIBUTE_SPLAT_CORNER)
        else {
            panic!("missing corner attribute");
        };
        assert_eq!(&corners[..4], &CORNERS);
    }

    #[test]
    fn empty_set_builds_empty_mesh() {
        let mesh = build_splat_mesh(&VertexAttributeSet::default());
        assert_eq!(mesh.count_vertices(), 0);
    }
}
