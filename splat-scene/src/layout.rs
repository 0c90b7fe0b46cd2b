use std::collections::HashMap;

use serde::Serialize;

use crate::error::DecodeFailure;

/// Byte order of the binary payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Endianness {
    #[default]
    Little,
    Big,
}

/// Fixed-width scalar property types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarType {
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Float32,
    Float64,
}

impl ScalarType {
    /// Map a header type token (both the classic and sized spellings).
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "char" | "int8" => Some(Self::Int8),
            "uchar" | "uint8" => Some(Self::UInt8),
            "short" | "int16" => Some(Self::Int16),
            "ushort" | "uint16" => Some(Self::UInt16),
            "int" | "int32" => Some(Self::Int32),
            "uint" | "uint32" => Some(Self::UInt32),
            "float" | "float32" => Some(Self::Float32),
            "double" | "float64" => Some(Self::Float64),
            _ => None,
        }
    }

    pub fn width(self) -> usize {
        match self {
            Self::Int8 | Self::UInt8 => 1,
            Self::Int16 | Self::UInt16 => 2,
            Self::Int32 | Self::UInt32 | Self::Float32 => 4,
            Self::Float64 => 8,
        }
    }
}

/// One readable column of a vertex record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub scalar: ScalarType,
    pub offset: usize,
}

impl Column {
    /// Read this column from a record slice exactly one stride long.
    pub fn read(&self, record: &[u8], endianness: Endianness) -> f32 {
        let bytes = &record[self.offset..self.offset + self.scalar.width()];
        match self.scalar {
            ScalarType::Int8 => bytes[0] as i8 as f32,
            ScalarType::UInt8 => bytes[0] as f32,
            ScalarType::Int16 => {
                let raw = fixed::<2>(bytes);
                match endianness {
                    Endianness::Little => i16::from_le_bytes(raw) as f32,
                    Endianness::Big => i16::from_be_bytes(raw) as f32,
                }
            }
            ScalarType::UInt16 => {
                let raw = fixed::<2>(bytes);
                match endianness {
                    Endianness::Little => u16::from_le_bytes(raw) as f32,
                    Endianness::Big => u16::from_be_bytes(raw) as f32,
                }
            }
            ScalarType::Int32 => {
                let raw = fixed::<4>(bytes);
                match endianness {
                    Endianness::Little => i32::from_le_bytes(raw) as f32,
                    Endianness::Big => i32::from_be_bytes(raw) as f32,
                }
            }
            ScalarType::UInt32 => {
                let raw = fixed::<4>(bytes);
                match endianness {
                    Endianness::Little => u32::from_le_bytes(raw) as f32,
                    Endianness::Big => u32::from_be_bytes(raw) as f32,
                }
            }
            ScalarType::Float32 => {
                let raw = fixed::<4>(bytes);
                match endianness {
                    Endianness::Little => f32::from_le_bytes(raw),
                    Endianness::Big => f32::from_be_bytes(raw),
                }
            }
            ScalarType::Float64 => {
                let raw = fixed::<8>(bytes);
                match endianness {
                    Endianness::Little => f64::from_le_bytes(raw) as f32,
                    Endianness::Big => f64::from_be_bytes(raw) as f32,
                }
            }
        }
    }

    pub fn read_triple(columns: &[Column; 3], record: &[u8], endianness: Endianness) -> [f32; 3] {
        columns.map(|column| column.read(record, endianness))
    }
}

fn fixed<const N: usize>(bytes: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes[..N]);
    out
}

/// Packed vertex record layout with a name lookup over its columns.
#[derive(Debug, Clone)]
pub struct VertexLayout {
    columns: Vec<Column>,
    index: HashMap<String, usize>,
    stride: usize,
}

impl VertexLayout {
    pub fn new(properties: Vec<(String, ScalarType)>) -> Self {
        let mut columns = Vec::with_capacity(properties.len());
        let mut index = HashMap::with_capacity(properties.len());
        let mut offset = 0;

        for (name, scalar) in properties {
            // First declaration wins on duplicate names.
            index.entry(name).or_insert(columns.len());
            columns.push(Column { scalar, offset });
            offset += scalar.width();
        }

        Self {
            columns,
            index,
            stride: offset,
        }
    }

    /// Bytes per vertex record.
    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn property_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column(&self, name: &str) -> Option<Column> {
        self.index.get(name).map(|&i| self.columns[i])
    }

    fn triple(&self, names: [&str; 3]) -> Option<[Column; 3]> {
        Some([
            self.column(names[0])?,
            self.column(names[1])?,
            self.column(names[2])?,
        ])
    }

    /// Resolve which optional attributes this file carries. Built once per
    /// file and consulted per record.
    pub fn capabilities(&self) -> Result<Capabilities, DecodeFailure> {
        let position = self
            .triple(["x", "y", "z"])
            .ok_or(DecodeFailure::MissingPosition)?;

        let colour = if let Some(columns) = self.triple(["f_dc_0", "f_dc_1", "f_dc_2"]) {
            ColourSource::SphericalHarmonic(columns)
        } else if let Some(columns) = self.triple(["red", "green", "blue"]) {
            ColourSource::Rgb(columns)
        } else {
            ColourSource::Default
        };

        let rotation = match (
            self.column("rot_0"),
            self.column("rot_1"),
            self.column("rot_2"),
            self.column("rot_3"),
        ) {
            (Some(a), Some(b), Some(c), Some(d)) => Some([a, b, c, d]),
            _ => None,
        };

        Ok(Capabilities {
            position,
            colour,
            scale: self.triple(["scale_0", "scale_1", "scale_2"]),
            opacity: self.column("opacity"),
            rotation,
        })
    }
}

/// Where a vertex gets its base colour from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColourSource {
    SphericalHarmonic([Column; 3]),
    Rgb([Column; 3]),
    Default,
}

/// Colour encoding detected in a file, for reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColourEncoding {
    SphericalHarmonic,
    Rgb,
    #[default]
    Default,
}

/// Presence descriptor for the optional attribute groups of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub position: [Column; 3],
    pub colour: ColourSource,
    pub scale: Option<[Column; 3]>,
    pub opacity: Option<Column>,
    pub rotation: Option<[Column; 4]>,
}

impl Capabilities {
    pub fn colour_encoding(&self) -> ColourEncoding {
        match self.colour {
            ColourSource::SphericalHarmonic(_) => ColourEncoding::SphericalHarmonic,
            ColourSource::Rgb(_) => ColourEncoding::Rgb,
            ColourSource::Default => ColourEncoding::Default,
        }
    }

    pub fn read_position(&self, record: &[u8], endianness: Endianness) -> [f32; 3] {
        Column::read_triple(&self.position, record, endianness)
    }
}
