/// Pixel footprint numerator: on-screen diameter is `size * POINT_SIZE_SCALE / depth`.
pub const POINT_SIZE_SCALE: f32 = 300.0;

/// Fragments fainter than this are discarded.
pub const ALPHA_CUTOFF: f32 = 0.01;

/// Exponent coefficient of the per-splat Gaussian falloff.
pub const GAUSSIAN_FALLOFF: f32 = 2.0;

/// Upper bound on the on-screen diameter so near points do not flood the view.
pub const MAX_POINT_PIXELS: f32 = 256.0;

/// Scenes with a bounding radius above this are scaled down to fit.
pub const MAX_SCENE_RADIUS: f32 = 4.0;
