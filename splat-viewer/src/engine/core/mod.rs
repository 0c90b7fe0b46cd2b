//! Core application setup and state management.
//!
//! Handles application lifecycle, window configuration, viewer phase
//! transitions and plugin initialisation for both native and WASM targets.

/// Plugin wiring for decoding, rendering, navigation and host messaging.
pub mod app_setup;

/// Viewer phase state machine and the observable scene status.
pub mod app_state;

/// Platform-specific window configuration for native and WASM builds.
///
/// Configures canvas integration for web targets and vsync settings.
pub mod window_config;
