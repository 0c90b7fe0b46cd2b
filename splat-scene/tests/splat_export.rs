mod common;

use common::{PlyBuilder, SPLAT_PROPERTIES};
use splat_scene::{DecodeFailure, DecodeOptions, SPLAT_RECORD_SIZE, export_splat};

fn f32_at(bytes: &[u8], offset: usize) -> f32 {
    f32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap())
}

#[test]
fn records_are_ordered_by_importance() {
    let buffer = PlyBuilder::new(SPLAT_PROPERTIES)
        .record(&[1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, -3.0, -3.0, -3.0, 1.0, 0.0, 0.0, 0.0])
        .record(&[2.0, 0.0, 0.0, 0.0, 0.0, 0.0, 5.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0])
        .record(&[3.0, 0.0, 0.0, 0.0, 0.0, 0.0, -5.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0])
        .build();

    let (bytes, report) = export_splat(&buffer, &DecodeOptions::default()).unwrap();
    assert_eq!(report.output_vertices, 3);
    assert_eq!(bytes.len(), 3 * SPLAT_RECORD_SIZE);

    let xs: Vec<f32> = (0..3).map(|i| f32_at(&bytes, i * SPLAT_RECORD_SIZE)).collect();
    assert_eq!(xs, vec![2.0, 3.0, 1.0]);
}

#[test]
fn record_layout_matches_splat_format() {
    let buffer = PlyBuilder::new(SPLAT_PROPERTIES)
        .record(&[0.5, -1.0, 2.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 2.0])
        .build();
    let (bytes, _) = export_splat(&buffer, &DecodeOptions::default()).unwrap();

    assert_eq!(f32_at(&bytes, 0), 0.5);
    assert_eq!(f32_at(&bytes, 4), -1.0);
    assert_eq!(f32_at(&bytes, 8), 2.0);
    // Linear scale of log 0.
    assert_eq!(f32_at(&bytes, 12), 1.0);
    // Grey from a zero DC term, half alpha from a zero logit.
    assert_eq!(&bytes[24..28], &[127, 127, 127, 127]);
    // Quaternion (0, 0, 0, 1) after normalisation.
    assert_eq!(&bytes[28..32], &[128, 128, 128, 255]);
}

#[test]
fn non_finite_vertices_are_skipped() {
    let buffer = PlyBuilder::new(SPLAT_PROPERTIES)
        .record(&[f32::NAN, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0])
        .record(&[0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0])
        .build();
    let (_, report) = export_splat(&buffer, &DecodeOptions::default()).unwrap();
    assert_eq!(report.input_vertices, 2);
    assert_eq!(report.output_vertices, 1);
}

#[test]
fn missing_rotation_packs_identity() {
    let buffer = PlyBuilder::new(&["x", "y", "z"])
        .record(&[0.0, 0.0, 0.0])
        .build();
    let (bytes, _) = export_splat(&buffer, &DecodeOptions::default()).unwrap();
    assert_eq!(&bytes[28..32], &[255, 128, 128, 128]);
}

#[test]
fn empty_result_is_an_error() {
    let buffer = PlyBuilder::new(&["x", "y", "z"])
        .record(&[f32::INFINITY, 0.0, 0.0])
        .build();
    assert_eq!(
        export_splat(&buffer, &DecodeOptions::default()).unwrap_err(),
        DecodeFailure::NoValidVertices
    );
}
