//! Configuration and scene loading.
//!
//! Resolves the viewer configuration first, then runs at most one scene load
//! at a time, dropping results from loads that were superseded.

/// Viewer configuration loading with fallback to defaults.
pub mod config_loader;

/// Load tickets used to detect superseded loads.
pub mod generation;

/// Scene load requests, tracking and mount/failure resolution.
pub mod scene_loader;
