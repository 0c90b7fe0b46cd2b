/// Reconstruction-to-render coordinate transform (row-major: [x_new, y_new, z_new]).
/// 180° X rotation: the reconstruction tool writes x right, y down, z forward;
/// the renderer expects x right, y up, z backward.
pub const COORDINATE_TRANSFORM: [[f32; 3]; 3] = [
    [1.0, 0.0, 0.0],  // X = X
    [0.0, -1.0, 0.0], // Y = -Y
    [0.0, 0.0, -1.0], // Z = -Z
];

/// Apply the reconstruction-to-render transform to one position.
pub fn transform_coordinates(position: [f32; 3]) -> [f32; 3] {
    let mut output = [0.0; 3];

    for i in 0..3 {
        for j in 0..3 {
            output[i] += COORDINATE_TRANSFORM[i][j] * position[j];
        }
    }

    output
}
