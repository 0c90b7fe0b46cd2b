//! Synthetic PLY buffers for decoder tests.

#![allow(dead_code)]

pub struct PlyBuilder {
    big_endian: bool,
    properties: Vec<String>,
    declared: Option<usize>,
    records: Vec<Vec<f32>>,
}

impl PlyBuilder {
    pub fn new(properties: &[&str]) -> Self {
        Self {
            big_endian: false,
            properties: properties.iter().map(|p| p.to_string()).collect(),
            declared: None,
            records: Vec::new(),
        }
    }

    pub fn big_endian(mut self) -> Self {
        self.big_endian = true;
        self
    }

    /// Override the declared vertex count (defaults to the record count).
    pub fn declare(mut self, count: usize) -> Self {
        self.declared = Some(count);
        self
    }

    pub fn record(mut self, values: &[f32]) -> Self {
        assert_eq!(values.len(), self.properties.len());
        self.records.push(values.to_vec());
        self
    }

    pub fn header(&self) -> String {
        let format = if self.big_endian {
            "binary_big_endian"
        } else {
            "binary_little_endian"
        };
        let mut header = format!(
            "ply\nformat {format} 1.0\nelement vertex {}\n",
            self.declared.unwrap_or(self.records.len())
        );
        for property in &self.properties {
            header.push_str(&format!("property float {property}\n"));
        }
        header.push_str("end_header\n");
        header
    }

    pub fn build(&self) -> Vec<u8> {
        let mut bytes = self.header().into_bytes();
        for record in &self.records {
            for value in record {
                if self.big_endian {
                    bytes.extend_from_slice(&value.to_be_bytes());
                } else {
                    bytes.extend_from_slice(&value.to_le_bytes());
                }
            }
        }
        bytes
    }
}

pub const SPLAT_PROPERTIES: &[&str] = &[
    "x", "y", "z", "f_dc_0", "f_dc_1", "f_dc_2", "opacity", "scale_0", "scale_1", "scale_2",
    "rot_0", "rot_1", "rot_2", "rot_3",
];
