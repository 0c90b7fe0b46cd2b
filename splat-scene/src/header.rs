use constants::decode::END_HEADER;
use tracing::debug;

use crate::error::DecodeFailure;
use crate::layout::{Endianness, ScalarType, VertexLayout};

/// Header lines and the byte offset where the binary payload begins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderScan {
    pub lines: Vec<String>,
    pub payload_offset: usize,
}

/// Collect trimmed header lines up to the `end_header` sentinel.
///
/// Only the first `max_bytes` of the buffer are examined so a missing
/// sentinel never turns into a text scan of the whole payload.
pub fn scan_header(buffer: &[u8], max_bytes: usize) -> Result<HeaderScan, DecodeFailure> {
    let limit = buffer.len().min(max_bytes);
    let mut lines = Vec::new();
    let mut line_start = 0;

    for (i, &byte) in buffer[..limit].iter().enumerate() {
        if byte != b'\n' {
            continue;
        }

        let line = String::from_utf8_lossy(&buffer[line_start..i])
            .trim()
            .to_string();
        line_start = i + 1;

        if line == END_HEADER {
            return Ok(HeaderScan {
                lines,
                payload_offset: line_start,
            });
        }
        lines.push(line);
    }

    Err(DecodeFailure::NoHeaderEnd)
}

#[derive(Debug, Clone)]
enum PropertyDecl {
    Scalar(String, ScalarType),
    Unsupported(String),
}

#[derive(Debug, Clone)]
struct ElementDecl {
    name: String,
    count: usize,
    properties: Vec<PropertyDecl>,
}

impl ElementDecl {
    fn scalar_properties(&self) -> Result<Vec<(String, ScalarType)>, DecodeFailure> {
        self.properties
            .iter()
            .map(|property| match property {
                PropertyDecl::Scalar(name, scalar) => Ok((name.clone(), *scalar)),
                PropertyDecl::Unsupported(name) => Err(DecodeFailure::UnsupportedProperty {
                    element: self.name.clone(),
                    name: name.clone(),
                }),
            })
            .collect()
    }
}

/// Interpreted header: everything needed to walk the vertex records.
#[derive(Debug, Clone)]
pub struct PlyHeader {
    pub endianness: Endianness,
    pub vertex_count: usize,
    pub layout: VertexLayout,
    /// Bytes between the payload start and the first vertex record.
    pub vertex_data_offset: usize,
}

/// Interpret scanned header lines.
pub fn parse_header(lines: &[String]) -> Result<PlyHeader, DecodeFailure> {
    let mut endianness = Endianness::Little;
    let mut elements: Vec<ElementDecl> = Vec::new();

    for line in lines {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        match tokens.as_slice() {
            ["format", "binary_little_endian", ..] => endianness = Endianness::Little,
            ["format", "binary_big_endian", ..] => endianness = Endianness::Big,
            ["format", other, ..] => {
                return Err(DecodeFailure::UnsupportedFormat(other.to_string()));
            }
            ["element", name, count, ..] => elements.push(ElementDecl {
                name: name.to_string(),
                count: count.parse().unwrap_or(0),
                properties: Vec::new(),
            }),
            ["property", "list", .., name] => {
                if let Some(element) = elements.last_mut() {
                    element
                        .properties
                        .push(PropertyDecl::Unsupported(name.to_string()));
                }
            }
            ["property", scalar, name] => {
                if let Some(element) = elements.last_mut() {
                    let property = match ScalarType::parse(scalar) {
                        Some(scalar) => PropertyDecl::Scalar(name.to_string(), scalar),
                        None => PropertyDecl::Unsupported(name.to_string()),
                    };
                    element.properties.push(property);
                }
            }
            // Any other property shape has an unknown width.
            ["property", .., name] => {
                if let Some(element) = elements.last_mut() {
                    element
                        .properties
                        .push(PropertyDecl::Unsupported(name.to_string()));
                }
            }
            _ => {}
        }
    }

    let vertex_index = elements
        .iter()
        .position(|element| element.name == "vertex")
        .ok_or(DecodeFailure::EmptyOrInvalidHeader)?;
    let vertex = &elements[vertex_index];

    if vertex.count == 0 || vertex.properties.is_empty() {
        return Err(DecodeFailure::EmptyOrInvalidHeader);
    }

    let mut vertex_data_offset = 0usize;
    for element in &elements[..vertex_index] {
        let width: usize = element
            .scalar_properties()?
            .iter()
            .map(|(_, scalar)| scalar.width())
            .sum();
        vertex_data_offset = element
            .count
            .checked_mul(width)
            .and_then(|bytes| vertex_data_offset.checked_add(bytes))
            .ok_or(DecodeFailure::EmptyOrInvalidHeader)?;
    }

    let layout = VertexLayout::new(vertex.scalar_properties()?);

    debug!(
        "PLY header: {} vertices, {} properties ({} bytes/vertex), {:?}",
        vertex.count,
        layout.property_count(),
        layout.stride(),
        endianness
    );

    Ok(PlyHeader {
        endianness,
        vertex_count: vertex.count,
        layout,
        vertex_data_offset,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str) -> Vec<String> {
        text.lines().map(str::to_string).collect()
    }

    #[test]
    fn payload_starts_after_sentinel_newline() {
        let mut buffer = b"ply\nformat binary_little_endian 1.0\nend_header\n".to_vec();
        let header_len = buffer.len();
        buffer.extend_from_slice(&[0xff, 0x0a, 0x00]);

        let scan = scan_header(&buffer, 10_000).unwrap();
        assert_eq!(scan.payload_offset, header_len);
        assert_eq!(scan.lines, vec!["ply", "format binary_little_endian 1.0"]);
    }

    #[test]
    fn tolerates_carriage_returns() {
        let scan = scan_header(b"ply\r\nend_header\r\n", 10_000).unwrap();
        assert_eq!(scan.lines, vec!["ply"]);
        assert_eq!(scan.payload_offset, 17);
    }

    #[test]
    fn sentinel_beyond_scan_cap_is_not_found() {
        let mut buffer = vec![b'#'; 64];
        buffer.extend_from_slice(b"\nend_header\n");
        assert_eq!(scan_header(&buffer, 32), Err(DecodeFailure::NoHeaderEnd));
        assert!(scan_header(&buffer, 1_000).is_ok());
    }

    #[test]
    fn big_endian_tag_is_honoured() {
        let header = parse_header(&lines(
            "ply\nformat binary_big_endian 1.0\nelement vertex 3\nproperty float x",
        ))
        .unwrap();
        assert_eq!(header.endianness, Endianness::Big);
        assert_eq!(header.vertex_count, 3);
    }

    #[test]
    fn zero_vertices_is_invalid() {
        let result = parse_header(&lines(
            "ply\nformat binary_little_endian 1.0\nelement vertex 0\nproperty float x",
        ));
        assert_eq!(result.unwrap_err(), DecodeFailure::EmptyOrInvalidHeader);
    }

    #[test]
    fn vertex_without_properties_is_invalid() {
        let result = parse_header(&lines("ply\nformat binary_little_endian 1.0\nelement vertex 4"));
        assert_eq!(result.unwrap_err(), DecodeFailure::EmptyOrInvalidHeader);
    }

    #[test]
    fn ascii_payloads_are_rejected() {
        let result = parse_header(&lines("ply\nformat ascii 1.0\nelement vertex 1\nproperty float x"));
        assert_eq!(
            result.unwrap_err(),
            DecodeFailure::UnsupportedFormat("ascii".into())
        );
    }

    #[test]
    fn leading_elements_are_skipped() {
        let header = parse_header(&lines(
            "ply\nformat binary_little_endian 1.0\nelement extrinsic 2\nproperty float e\nproperty uchar flag\nelement vertex 1\nproperty float x",
        ))
        .unwrap();
        assert_eq!(header.vertex_data_offset, 10);
    }

    #[test]
    fn list_properties_on_vertices_are_rejected() {
        let result = parse_header(&lines(
            "ply\nformat binary_little_endian 1.0\nelement vertex 1\nproperty float x\nproperty list uchar int idx",
        ));
        assert!(matches!(
            result.unwrap_err(),
            DecodeFailure::UnsupportedProperty { ref name, .. } if name == "idx"
        ));
    }

    #[test]
    fn property_with_extra_tokens_is_rejected() {
        let result = parse_header(&lines(
            "ply\nformat binary_little_endian 1.0\nelement vertex 2\nproperty float x\nproperty float y\nproperty float z\nproperty float opacity extra",
        ));
        assert!(matches!(
            result.unwrap_err(),
            DecodeFailure::UnsupportedProperty { ref name, .. } if name == "extra"
        ));
    }

    #[test]
    fn malformed_property_before_vertex_is_rejected() {
        let result = parse_header(&lines(
            "ply\nformat binary_little_endian 1.0\nelement camera 1\nproperty float fov degrees\nelement vertex 1\nproperty float x",
        ));
        assert!(matches!(
            result.unwrap_err(),
            DecodeFailure::UnsupportedProperty { ref element, .. } if element == "camera"
        ));
    }

    #[test]
    fn trailing_face_lists_are_ignored() {
        let header = parse_header(&lines(
            "ply\nformat binary_little_endian 1.0\nelement vertex 1\nproperty float x\nelement face 1\nproperty list uchar int vertex_indices",
        ))
        .unwrap();
        assert_eq!(header.layout.property_count(), 1);
    }
}
