use constants::decode::{
    DEFAULT_COLOUR, DEFAULT_OPACITY, DEFAULT_SIZE, MAX_HEADER_BYTES, MAX_OPACITY, MAX_SIZE,
    MIN_OPACITY, MIN_SIZE, SIZE_MULTIPLIER,
};
use serde::{Deserialize, Serialize};

/// Decode tunables. Every field falls back to the shared constants when omitted
/// from a configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeOptions {
    pub max_header_bytes: usize,
    pub default_colour: [f32; 3],
    pub default_size: f32,
    pub default_opacity: f32,
    pub size_multiplier: f32,
    pub min_size: f32,
    pub max_size: f32,
    pub min_opacity: f32,
    pub max_opacity: f32,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_header_bytes: MAX_HEADER_BYTES,
            default_colour: DEFAULT_COLOUR,
            default_size: DEFAULT_SIZE,
            default_opacity: DEFAULT_OPACITY,
            size_multiplier: SIZE_MULTIPLIER,
            min_size: MIN_SIZE,
            max_size: MAX_SIZE,
            min_opacity: MIN_OPACITY,
            max_opacity: MAX_OPACITY,
        }
    }
}
