/// Zeroth real spherical-harmonic normalisation constant.
pub const SH_C0: f32 = 0.282_094_791_773_878_14;

/// Bytes of the buffer scanned for the header before giving up.
pub const MAX_HEADER_BYTES: usize = 10_000;

/// Sentinel line terminating the header.
pub const END_HEADER: &str = "end_header";

/// Fallback colour when neither SH nor literal RGB columns exist.
pub const DEFAULT_COLOUR: [f32; 3] = [0.7, 0.7, 0.7];

/// Fallback point footprint when no scale columns exist.
pub const DEFAULT_SIZE: f32 = 0.01;

/// Fallback opacity when no opacity column exists.
pub const DEFAULT_OPACITY: f32 = 0.8;

/// Multiplier from mean linear scale to point footprint.
pub const SIZE_MULTIPLIER: f32 = 0.02;

/// Footprint clamp range.
pub const MIN_SIZE: f32 = 0.001;
pub const MAX_SIZE: f32 = 0.1;

/// Opacity clamp range after the logistic.
pub const MIN_OPACITY: f32 = 0.1;
pub const MAX_OPACITY: f32 = 1.0;
