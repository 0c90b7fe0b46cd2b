//! Asset types for scene data and viewer configuration.

/// Decoded splat scene asset and its `.ply` loader.
pub mod splat_scene_asset;

/// JSON viewer configuration with per-section defaults.
pub mod viewer_config;
