use constants::decode::SH_C0;
use tracing::info;

use crate::attributes::{DecodeReport, VertexAttributeSet};
use crate::error::DecodeFailure;
use crate::header::{PlyHeader, parse_header, scan_header};
use crate::layout::{Capabilities, Column, ColourSource, Endianness};
use crate::options::DecodeOptions;

/// Decode a scene buffer with the default options.
pub fn decode(buffer: &[u8]) -> Result<VertexAttributeSet, DecodeFailure> {
    decode_with_report(buffer, &DecodeOptions::default()).map(|(attributes, _)| attributes)
}

/// Decode a scene buffer, also returning parse/skip counters.
pub fn decode_with_report(
    buffer: &[u8],
    options: &DecodeOptions,
) -> Result<(VertexAttributeSet, DecodeReport), DecodeFailure> {
    let records = VertexRecords::parse(buffer, options)?;
    let capabilities = records.capabilities;

    let mut attributes = VertexAttributeSet::with_capacity(records.available());
    let mut skipped_non_finite = 0;

    for record in records.iter() {
        let position = capabilities.read_position(record, records.endianness);
        if !position.iter().all(|v| v.is_finite()) {
            skipped_non_finite += 1;
            continue;
        }

        attributes.push(
            position,
            decode_colour(&capabilities, record, records.endianness, options),
            decode_size(&capabilities, record, records.endianness, options),
            decode_opacity(&capabilities, record, records.endianness, options),
        );
    }

    let report = DecodeReport {
        declared: records.declared(),
        decoded: attributes.len(),
        skipped_non_finite,
        truncated: records.declared() - records.available(),
        colour: capabilities.colour_encoding(),
        has_scale: capabilities.scale.is_some(),
        has_opacity: capabilities.opacity.is_some(),
    };

    info!(
        "Decoded {} / {} vertices ({} non-finite, {} truncated)",
        report.decoded, report.declared, report.skipped_non_finite, report.truncated
    );

    if attributes.is_empty() {
        return Err(DecodeFailure::NoValidVertices);
    }

    Ok((attributes, report))
}

/// Whole vertex records of a buffer, with the capabilities needed to read them.
pub(crate) struct VertexRecords<'a> {
    payload: &'a [u8],
    header: PlyHeader,
    pub(crate) capabilities: Capabilities,
    pub(crate) endianness: Endianness,
}

impl<'a> VertexRecords<'a> {
    pub(crate) fn parse(buffer: &'a [u8], options: &DecodeOptions) -> Result<Self, DecodeFailure> {
        let scan = scan_header(buffer, options.max_header_bytes)?;
        let header = parse_header(&scan.lines)?;
        let capabilities = header.layout.capabilities()?;

        let start = scan.payload_offset.saturating_add(header.vertex_data_offset);
        let payload = buffer.get(start..).unwrap_or(&[]);

        Ok(Self {
            payload,
            endianness: header.endianness,
            header,
            capabilities,
        })
    }

    pub(crate) fn declared(&self) -> usize {
        self.header.vertex_count
    }

    /// Declared records that are fully present in the payload.
    pub(crate) fn available(&self) -> usize {
        (self.payload.len() / self.header.layout.stride()).min(self.header.vertex_count)
    }

    /// Iterate whole records only; a partial trailing record is never read.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &'a [u8]> + '_ {
        self.payload
            .chunks_exact(self.header.layout.stride())
            .take(self.header.vertex_count)
    }
}

pub(crate) fn sigmoid(raw: f32) -> f32 {
    1.0 / (1.0 + (-raw).exp())
}

/// Clamp into `[min, max]`, substituting `fallback` for NaN input.
pub(crate) fn clamp_finite(value: f32, min: f32, max: f32, fallback: f32) -> f32 {
    if value.is_nan() {
        return fallback;
    }
    value.max(min).min(max)
}

/// Literal colour channels may be stored as 0..255 or 0..1.
pub(crate) fn normalise_channel(value: f32) -> f32 {
    if value > 1.0 { value / 255.0 } else { value }
}

pub(crate) fn decode_colour(
    capabilities: &Capabilities,
    record: &[u8],
    endianness: Endianness,
    options: &DecodeOptions,
) -> [f32; 3] {
    let default = options.default_colour;
    match &capabilities.colour {
        ColourSource::SphericalHarmonic(columns) => {
            let dc = Column::read_triple(columns, record, endianness);
            [0, 1, 2].map(|i| clamp_finite(0.5 + SH_C0 * dc[i], 0.0, 1.0, default[i]))
        }
        ColourSource::Rgb(columns) => {
            let rgb = Column::read_triple(columns, record, endianness);
            [0, 1, 2].map(|i| clamp_finite(normalise_channel(rgb[i]), 0.0, 1.0, default[i]))
        }
        ColourSource::Default => default.map(|c| clamp_finite(c, 0.0, 1.0, 0.0)),
    }
}

pub(crate) fn decode_size(
    capabilities: &Capabilities,
    record: &[u8],
    endianness: Endianness,
    options: &DecodeOptions,
) -> f32 {
    let Some(columns) = &capabilities.scale else {
        return options.default_size;
    };

    // Scales are stored as logarithms.
    let scales = Column::read_triple(columns, record, endianness);
    let mean = scales.iter().map(|s| s.exp()).sum::<f32>() / 3.0;
    clamp_finite(
        mean * options.size_multiplier,
        options.min_size,
        options.max_size,
        options.default_size,
    )
}

pub(crate) fn decode_opacity(
    capabilities: &Capabilities,
    record: &[u8],
    endianness: Endianness,
    options: &DecodeOptions,
) -> f32 {
    let Some(column) = &capabilities.opacity else {
        return options.default_opacity;
    };

    // Opacity is stored as a logit.
    clamp_finite(
        sigmoid(column.read(record, endianness)),
        options.min_opacity,
        options.max_opacity,
        options.default_opacity,
    )
}
