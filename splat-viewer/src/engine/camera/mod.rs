//! First-person scene navigation.
//!
//! The navigator holds all camera and input state per camera entity; the
//! controller systems feed it Bevy input and copy its pose to the transform.

/// Bevy systems for pointer capture, key polling, look and per-frame movement.
pub mod controller;

/// Caged first-person camera state machine, independent of Bevy scheduling.
pub mod navigator;
