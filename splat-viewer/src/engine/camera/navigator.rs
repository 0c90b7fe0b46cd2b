use std::collections::HashSet;

use bevy::prelude::*;
use constants::navigation::MAX_PITCH;

use crate::engine::assets::viewer_config::{NavigationConfig, NavigationMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKey {
    Forward,
    Back,
    Left,
    Right,
    Up,
    Down,
}

impl MoveKey {
    pub const ALL: [MoveKey; 6] = [
        MoveKey::Forward,
        MoveKey::Back,
        MoveKey::Left,
        MoveKey::Right,
        MoveKey::Up,
        MoveKey::Down,
    ];

    /// Camera-local direction: forward is -Z, right is +X, up is +Y.
    fn local_direction(self) -> Vec3 {
        match self {
            MoveKey::Forward => Vec3::NEG_Z,
            MoveKey::Back => Vec3::Z,
            MoveKey::Left => Vec3::NEG_X,
            MoveKey::Right => Vec3::X,
            MoveKey::Up => Vec3::Y,
            MoveKey::Down => Vec3::NEG_Y,
        }
    }
}

/// Held movement keys and pointer capture, owned by one navigator.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: HashSet<MoveKey>,
    captured: bool,
}

impl InputState {
    pub fn set_key(&mut self, key: MoveKey, pressed: bool) {
        if pressed {
            self.held.insert(key);
        } else {
            self.held.remove(&key);
        }
    }

    pub fn is_held(&self, key: MoveKey) -> bool {
        self.held.contains(&key)
    }

    pub fn any_held(&self) -> bool {
        !self.held.is_empty()
    }

    pub fn is_captured(&self) -> bool {
        self.captured
    }

    fn clear(&mut self) {
        self.held.clear();
    }

    fn raw_direction(&self) -> Vec3 {
        self.held.iter().map(|key| key.local_direction()).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
}

/// Axis-aligned box the camera may not leave. Bounds may be asymmetric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraCage {
    min: Vec3,
    max: Vec3,
}

impl CameraCage {
    /// Corners in any order; they are sorted per axis.
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn min(&self) -> Vec3 {
        self.min
    }

    pub fn max(&self) -> Vec3 {
        self.max
    }

    pub fn clamp(&self, position: Vec3) -> Vec3 {
        position.clamp(self.min, self.max)
    }

    pub fn contains(&self, position: Vec3) -> bool {
        position.cmpge(self.min).all() && position.cmple(self.max).all()
    }
}

/// First-person controller. Unlocked it only follows explicit look drags;
/// once engaged (pointer captured) held keys translate the camera inside the
/// cage.
#[derive(Component, Debug, Clone)]
pub struct Navigator {
    mode: NavigationMode,
    move_speed: f32,
    look_sensitivity: f32,
    cage: CameraCage,
    lock_height: Option<f32>,
    start: CameraState,
    camera: CameraState,
    input: InputState,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(&NavigationConfig::default())
    }
}

impl Navigator {
    pub fn new(config: &NavigationConfig) -> Self {
        let cage = CameraCage::new(
            Vec3::from_array(config.cage_min),
            Vec3::from_array(config.cage_max),
        );
        // A locked height outside the cage would break the cage bound.
        let lock_height = config
            .lock_height
            .filter(|h| h.is_finite())
            .map(|h| h.clamp(cage.min.y, cage.max.y));

        let mut start = CameraState {
            position: cage.clamp(Vec3::from_array(config.start_position)),
            yaw: finite_or_zero(config.start_yaw),
            pitch: finite_or_zero(config.start_pitch).clamp(-MAX_PITCH, MAX_PITCH),
        };
        if !start.position.is_finite() {
            start.position = cage.clamp(Vec3::ZERO);
        }
        if let Some(height) = lock_height {
            start.position.y = height;
        }

        Self {
            mode: config.mode,
            move_speed: config.move_speed,
            look_sensitivity: config.look_sensitivity,
            cage,
            lock_height,
            start,
            camera: start,
            input: InputState::default(),
        }
    }

    /// Apply new settings and return to the start pose. Capture is kept.
    pub fn configure(&mut self, config: &NavigationConfig) {
        let input = std::mem::take(&mut self.input);
        *self = Self::new(config);
        self.input = input;
    }

    pub fn reset(&mut self) {
        self.camera = self.start;
    }

    pub fn engage(&mut self) {
        self.input.captured = true;
    }

    /// Leave the locked state; held keys are forgotten.
    pub fn release(&mut self) {
        self.input.captured = false;
        self.input.clear();
    }

    pub fn is_engaged(&self) -> bool {
        self.input.captured
    }

    pub fn set_key(&mut self, key: MoveKey, pressed: bool) {
        self.input.set_key(key, pressed);
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn camera(&self) -> &CameraState {
        &self.camera
    }

    pub fn cage(&self) -> &CameraCage {
        &self.cage
    }

    pub fn mode(&self) -> NavigationMode {
        self.mode
    }

    /// Turn by a pointer delta in pixels.
    pub fn look(&mut self, delta: Vec2) {
        if !delta.is_finite() {
            return;
        }
        let yaw = self.camera.yaw - delta.x * self.look_sensitivity;
        let pitch = (self.camera.pitch - delta.y * self.look_sensitivity).clamp(-MAX_PITCH, MAX_PITCH);
        if yaw.is_finite() && pitch.is_finite() {
            self.camera.yaw = yaw;
            self.camera.pitch = pitch;
        }
    }

    /// Advance one frame. Returns whether the position changed.
    ///
    /// Nothing happens unless the pointer is captured at the time of the call
    /// and a movement key is held. A non-finite result is never written.
    pub fn update(&mut self, delta_seconds: f32) -> bool {
        if !self.input.captured || !self.input.any_held() {
            return false;
        }
        if !delta_seconds.is_finite() || delta_seconds <= 0.0 {
            return false;
        }

        // Opposing keys cancel out.
        let raw = self.input.raw_direction();
        let Some(direction) = raw.try_normalize() else {
            return false;
        };

        let step = direction * self.move_speed * delta_seconds;
        let world_step = match self.mode {
            NavigationMode::Walk => Quat::from_rotation_y(self.camera.yaw) * step,
            NavigationMode::Fly => self.rotation() * step,
        };

        let mut next = self.cage.clamp(self.camera.position + world_step);
        if let Some(height) = self.lock_height {
            next.y = height;
        }

        if !next.is_finite() || !self.cage.contains(next) || next == self.camera.position {
            return false;
        }
        self.camera.position = next;
        true
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.camera.yaw, self.camera.pitch, 0.0)
    }

    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.camera.position).with_rotation(self.rotation())
    }
}

fn finite_or_zero(value: f32) -> f32 {
    if value.is_finite() { value } else { 0.0 }
}
