//! Tunable constants shared by the scene decoder and the viewer.
//!
//! Reconstruction outputs vary a lot between runs, so every clamp range,
//! fallback value and navigation bound lives here in one consistent set.

pub mod coordinate_system;
pub mod decode;
pub mod navigation;
pub mod render_settings;
