use constants::decode::SH_C0;
use serde::Serialize;
use tracing::info;

use crate::decode::{VertexRecords, normalise_channel, sigmoid};
use crate::error::DecodeFailure;
use crate::layout::{Capabilities, Column, ColourSource, Endianness};
use crate::options::DecodeOptions;

/// Bytes per `.splat` record: position, linear scale, RGBA and packed rotation.
pub const SPLAT_RECORD_SIZE: usize = 32;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SplatExportReport {
    pub input_vertices: usize,
    pub output_vertices: usize,
    pub bytes: usize,
}

struct Candidate<'a> {
    record: &'a [u8],
    position: [f32; 3],
    importance: f32,
}

/// Re-encode a scene buffer as a `.splat` stream.
///
/// Records are ordered by descending `exp(scale sum) * sigmoid(opacity)`, so a
/// progressive loader sees the largest, most opaque splats first. Vertices with
/// non-finite positions are dropped.
pub fn export_splat(
    buffer: &[u8],
    options: &DecodeOptions,
) -> Result<(Vec<u8>, SplatExportReport), DecodeFailure> {
    let records = VertexRecords::parse(buffer, options)?;
    let capabilities = records.capabilities;
    let endianness = records.endianness;

    let mut candidates: Vec<Candidate> = records
        .iter()
        .filter_map(|record| {
            let position = capabilities.read_position(record, endianness);
            if !position.iter().all(|v| v.is_finite()) {
                return None;
            }
            Some(Candidate {
                record,
                position,
                importance: importance(&capabilities, record, endianness),
            })
        })
        .collect();

    if candidates.is_empty() {
        return Err(DecodeFailure::NoValidVertices);
    }

    candidates.sort_by(|a, b| b.importance.total_cmp(&a.importance));

    let mut out = Vec::with_capacity(candidates.len() * SPLAT_RECORD_SIZE);
    for candidate in &candidates {
        write_record(&mut out, candidate, &capabilities, endianness, options);
    }

    let report = SplatExportReport {
        input_vertices: records.declared(),
        output_vertices: candidates.len(),
        bytes: out.len(),
    };
    info!(
        "Exported {} / {} splats ({} bytes)",
        report.output_vertices, report.input_vertices, report.bytes
    );

    Ok((out, report))
}

fn log_scales(capabilities: &Capabilities, record: &[u8], endianness: Endianness) -> [f32; 3] {
    match &capabilities.scale {
        Some(columns) => Column::read_triple(columns, record, endianness),
        None => [0.0; 3],
    }
}

fn raw_opacity(capabilities: &Capabilities, record: &[u8], endianness: Endianness) -> f32 {
    capabilities
        .opacity
        .map_or(0.0, |column| column.read(record, endianness))
}

fn importance(capabilities: &Capabilities, record: &[u8], endianness: Endianness) -> f32 {
    let scale_sum: f32 = log_scales(capabilities, record, endianness).iter().sum();
    let value = scale_sum.exp() * sigmoid(raw_opacity(capabilities, record, endianness));
    if value.is_nan() { f32::NEG_INFINITY } else { value }
}

fn unit_to_byte(value: f32) -> u8 {
    if value.is_nan() {
        return 0;
    }
    (value * 255.0).clamp(0.0, 255.0) as u8
}

fn write_record(
    out: &mut Vec<u8>,
    candidate: &Candidate,
    capabilities: &Capabilities,
    endianness: Endianness,
    options: &DecodeOptions,
) {
    let record = candidate.record;

    for value in candidate.position {
        out.extend_from_slice(&value.to_le_bytes());
    }
    for log_scale in log_scales(capabilities, record, endianness) {
        out.extend_from_slice(&log_scale.exp().to_le_bytes());
    }

    let rgb = match &capabilities.colour {
        ColourSource::SphericalHarmonic(columns) => {
            Column::read_triple(columns, record, endianness).map(|dc| 0.5 + SH_C0 * dc)
        }
        ColourSource::Rgb(columns) => {
            Column::read_triple(columns, record, endianness).map(normalise_channel)
        }
        ColourSource::Default => options.default_colour,
    };
    let alpha = match capabilities.opacity {
        Some(column) => sigmoid(column.read(record, endianness)),
        None => options.default_opacity,
    };
    out.extend(rgb.map(unit_to_byte));
    out.push(unit_to_byte(alpha));

    out.extend(pack_rotation(capabilities, record, endianness));
}

/// Normalised quaternion packed as `q * 128 + 128`; identity when absent or degenerate.
fn pack_rotation(capabilities: &Capabilities, record: &[u8], endianness: Endianness) -> [u8; 4] {
    let identity = [1.0, 0.0, 0.0, 0.0];
    let quat = capabilities
        .rotation
        .map(|columns| columns.map(|column| column.read(record, endianness)))
        .unwrap_or(identity);

    let norm = quat.iter().map(|q| q * q).sum::<f32>().sqrt();
    let unit = if norm.is_finite() && norm > 0.0 {
        quat.map(|q| q / norm)
    } else {
        identity
    };

    unit.map(|q| (q * 128.0 + 128.0).clamp(0.0, 255.0) as u8)
}
