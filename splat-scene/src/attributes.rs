use serde::Serialize;

use crate::layout::ColourEncoding;

/// Per-point render attributes, one entry per vertex with a finite position.
///
/// The four sequences always have the same length; the only way to grow the
/// set is [`VertexAttributeSet::push`], which appends to all of them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VertexAttributeSet {
    positions: Vec<[f32; 3]>,
    colours: Vec<[f32; 3]>,
    sizes: Vec<f32>,
    opacities: Vec<f32>,
}

impl VertexAttributeSet {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            positions: Vec::with_capacity(capacity),
            colours: Vec::with_capacity(capacity),
            sizes: Vec::with_capacity(capacity),
            opacities: Vec::with_capacity(capacity),
        }
    }

    /// Build from parallel sequences; `None` if their lengths differ.
    pub fn from_parts(
        positions: Vec<[f32; 3]>,
        colours: Vec<[f32; 3]>,
        sizes: Vec<f32>,
        opacities: Vec<f32>,
    ) -> Option<Self> {
        let len = positions.len();
        if colours.len() != len || sizes.len() != len || opacities.len() != len {
            return None;
        }
        Some(Self {
            positions,
            colours,
            sizes,
            opacities,
        })
    }

    pub fn push(&mut self, position: [f32; 3], colour: [f32; 3], size: f32, opacity: f32) {
        self.positions.push(position);
        self.colours.push(colour);
        self.sizes.push(size);
        self.opacities.push(opacity);
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    pub fn colours(&self) -> &[[f32; 3]] {
        &self.colours
    }

    pub fn sizes(&self) -> &[f32] {
        &self.sizes
    }

    pub fn opacities(&self) -> &[f32] {
        &self.opacities
    }

    /// Positions may be rewritten in place (e.g. for framing); the slice
    /// cannot change length, so the sequences stay aligned.
    pub fn positions_mut(&mut self) -> &mut [[f32; 3]] {
        &mut self.positions
    }
}

/// Decode counters, reported for observability.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DecodeReport {
    /// Vertex count declared in the header.
    pub declared: usize,
    /// Vertices emitted into the attribute set.
    pub decoded: usize,
    /// Whole records dropped for a non-finite position.
    pub skipped_non_finite: usize,
    /// Declared records missing from a short payload.
    pub truncated: usize,
    pub colour: ColourEncoding,
    pub has_scale: bool,
    pub has_opacity: bool,
}
