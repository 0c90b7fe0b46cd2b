/// Translation speed in scene units per second.
pub const MOVE_SPEED: f32 = 1.5;

/// Radians of yaw/pitch per pixel of pointer motion.
pub const LOOK_SENSITIVITY: f32 = 0.0025;

/// Pitch limit so the view never flips over the pole.
pub const MAX_PITCH: f32 = 1.55;

/// Camera cage. Shallower on -Z so the viewer cannot walk behind the
/// reconstructed surface, which has no back side.
pub const CAGE_MIN: [f32; 3] = [-2.5, -1.0, -1.5];
pub const CAGE_MAX: [f32; 3] = [2.5, 1.5, 4.0];

/// Pose applied whenever a scene mounts.
pub const START_POSITION: [f32; 3] = [0.0, 0.0, 3.0];
pub const START_YAW: f32 = 0.0;
pub const START_PITCH: f32 = 0.0;
