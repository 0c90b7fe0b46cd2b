//! Scene rendering: splat geometry, the additive splat material, load-time
//! framing and the mount/unmount lifecycle of GPU resources.

/// Coordinate normalisation, centering and down-scaling of decoded positions.
pub mod framing;

/// Soft additive splat material with its pipeline specialisation.
///
/// Uses a custom vertex layout carrying colour, size, opacity and quad corner
/// per vertex, with depth writes disabled.
pub mod material;

/// Screen-aligned quad geometry built from decoded splat attributes.
pub mod mesh;

/// Scene entity spawning and explicit release of its mesh and material.
pub mod scene_mount;
