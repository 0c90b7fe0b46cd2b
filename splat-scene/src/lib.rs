//! Binary Gaussian-splat PLY decoding.
//!
//! Turns a reconstruction-tool output buffer into validated per-point render
//! attributes, and re-encodes it as a compact `.splat` stream.

/// Axis-aligned bounds accumulation for framing decoded scenes.
pub mod bounds;

/// Record decode into render attributes.
pub mod decode;

/// Failure taxonomy shared by every entry point.
pub mod error;

/// Header scanning and interpretation.
pub mod header;

/// Record layout, typed columns and optional attribute capabilities.
pub mod layout;

/// Tunable decode settings.
pub mod options;

/// `.splat` export ordered by splat importance.
pub mod splat_export;

mod attributes;

pub use attributes::{DecodeReport, VertexAttributeSet};
pub use bounds::SceneBounds;
pub use decode::{decode, decode_with_report};
pub use error::DecodeFailure;
pub use layout::{ColourEncoding, Endianness};
pub use options::DecodeOptions;
pub use splat_export::{SPLAT_RECORD_SIZE, SplatExportReport, export_splat};
