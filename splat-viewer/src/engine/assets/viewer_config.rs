use bevy::prelude::*;
use constants::navigation::{
    CAGE_MAX, CAGE_MIN, LOOK_SENSITIVITY, MOVE_SPEED, START_PITCH, START_POSITION, START_YAW,
};
use constants::render_settings::{
    ALPHA_CUTOFF, GAUSSIAN_FALLOFF, MAX_POINT_PIXELS, MAX_SCENE_RADIUS, POINT_SIZE_SCALE,
};
use serde::{Deserialize, Serialize};
use splat_scene::DecodeOptions;

/// Scene framing applied once per load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FramingConfig {
    /// Scenes whose bounding radius exceeds this are scaled down to fit.
    pub max_radius: f32,
}

impl Default for FramingConfig {
    fn default() -> Self {
        Self {
            max_radius: MAX_SCENE_RADIUS,
        }
    }
}

/// Splat shading uniforms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadingConfig {
    /// Pixel diameter of a unit-size splat at unit depth.
    pub size_scale: f32,
    pub alpha_cutoff: f32,
    pub falloff: f32,
    pub max_point_px: f32,
}

impl Default for ShadingConfig {
    fn default() -> Self {
        Self {
            size_scale: POINT_SIZE_SCALE,
            alpha_cutoff: ALPHA_CUTOFF,
            falloff: GAUSSIAN_FALLOFF,
            max_point_px: MAX_POINT_PIXELS,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationMode {
    /// Movement follows yaw only and stays level.
    #[default]
    Walk,
    /// Movement follows the full view orientation.
    Fly,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    pub mode: NavigationMode,
    /// Units per second.
    pub move_speed: f32,
    /// Radians per pixel of pointer motion.
    pub look_sensitivity: f32,
    pub cage_min: [f32; 3],
    pub cage_max: [f32; 3],
    pub start_position: [f32; 3],
    pub start_yaw: f32,
    pub start_pitch: f32,
    /// Pins the vertical axis to this height when set.
    pub lock_height: Option<f32>,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            mode: NavigationMode::Walk,
            move_speed: MOVE_SPEED,
            look_sensitivity: LOOK_SENSITIVITY,
            cage_min: CAGE_MIN,
            cage_max: CAGE_MAX,
            start_position: START_POSITION,
            start_yaw: START_YAW,
            start_pitch: START_PITCH,
            lock_height: None,
        }
    }
}

/// Runtime viewer configuration. Loaded from JSON as an asset, then installed
/// as a resource once resolved. Every field is optional in the file.
#[derive(Asset, Resource, TypePath, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub decode: DecodeOptions,
    pub framing: FramingConfig,
    pub shading: ShadingConfig,
    pub navigation: NavigationConfig,
    /// Scene path or URL loaded as soon as configuration resolves.
    pub initial_scene: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let json = r#"{ "navigation": { "mode": "fly", "lock_height": 0.0 } }"#;
        let config: ViewerConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.navigation.mode, NavigationMode::Fly);
        assert_eq!(config.navigation.lock_height, Some(0.0));
        assert_eq!(config.navigation.cage_min, CAGE_MIN);
        assert_eq!(config.shading, ShadingConfig::default());
        assert_eq!(config.decode, DecodeOptions::default());
        assert!(config.initial_scene.is_none());
    }

    #[test]
    fn empty_object_is_default() {
        let config: ViewerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ViewerConfig::default());
    }
}
