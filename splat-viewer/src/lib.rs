//! Interactive Gaussian-splat scene viewer.
//!
//! Decodes reconstruction-tool PLY output, uploads it as soft additive point
//! splats and lets the user walk through it with first-person controls.

pub mod engine;
pub mod rpc;

pub use engine::core::app_setup::{SplatViewerPlugin, create_app};
pub use engine::core::app_state::{SceneErrorKind, SceneStatus, SceneStatusChanged, ViewerPhase};
pub use engine::loading::scene_loader::{LoadSceneRequest, UnmountSceneRequest};
