use bevy::prelude::*;
use constants::coordinate_system::transform_coordinates;
use splat_scene::SceneBounds;

use crate::engine::assets::viewer_config::FramingConfig;

/// What framing did to a point set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FramingReport {
    /// Bounds centre subtracted from every position, if it was finite.
    pub offset: Option<[f32; 3]>,
    /// Bounding radius before scaling.
    pub radius: f32,
    /// Uniform scale applied; never above 1.
    pub scale: f32,
}

/// Bring decoded positions into the renderer's frame, centred on the origin and
/// no larger than `max_radius`.
///
/// Positions arrive with y down and z forward and are rotated 180° about X to
/// y up, z backward. Splat sizes are left alone.
pub fn frame_positions(positions: &mut [[f32; 3]], config: &FramingConfig) -> FramingReport {
    for position in positions.iter_mut() {
        *position = transform_coordinates(*position);
    }

    let bounds = SceneBounds::from_positions(positions);
    let center = bounds.center();
    if bounds.is_empty() || !center.iter().all(|c| c.is_finite()) {
        warn!("Scene bounds are not finite; skipping centering and scaling");
        return FramingReport {
            offset: None,
            radius: f32::NAN,
            scale: 1.0,
        };
    }

    let radius = bounds.bounding_radius(positions);
    for position in positions.iter_mut() {
        for axis in 0..3 {
            position[axis] -= center[axis];
        }
    }

    if !radius.is_finite() {
        warn!("Scene radius is not finite; skipping scaling");
        return FramingReport {
            offset: Some(center),
            radius,
            scale: 1.0,
        };
    }

    let scale = if radius > config.max_radius && config.max_radius > 0.0 {
        config.max_radius / radius
    } else {
        1.0
    };
    if scale < 1.0 {
        for position in positions.iter_mut() {
            *position = position.map(|v| v * scale);
        }
    }

    info!(
        "Framed scene: centre {:?}, radius {:.3}, scale {:.4}",
        center, radius, scale
    );

    FramingReport {
        offset: Some(center),
        radius,
        scale,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn config(max_radius: f32) -> FramingConfig {
        FramingConfig { max_radius }
    }

    #[test]
    fn flips_y_and_z() {
        let mut positions = [[1.0, 2.0, 3.0], [-1.0, -2.0, -3.0]];
        frame_positions(&mut positions, &config(100.0));
        assert_eq!(positions[0], [1.0, -2.0, -3.0]);
        assert_eq!(positions[1], [-1.0, 2.0, 3.0]);
    }

    #[test]
    fn recentres_on_bounds_centre() {
        let mut positions = [[10.0, 0.0, 0.0], [12.0, 0.0, 0.0]];
        let report = frame_positions(&mut positions, &config(100.0));

        assert_eq!(report.offset, Some([11.0, 0.0, 0.0]));
        assert_relative_eq!(positions[0][0], -1.0);
        assert_relative_eq!(positions[1][0], 1.0);
        assert_eq!(report.scale, 1.0);
    }

    #[test]
    fn large_scenes_scale_down_to_max_radius() {
        let mut positions = [[-20.0, 0.0, 0.0], [20.0, 0.0, 0.0]];
        let report = frame_positions(&mut positions, &config(4.0));

        assert_relative_eq!(report.radius, 20.0);
        assert_relative_eq!(report.scale, 0.2);
        assert_relative_eq!(positions[0][0], -4.0);
        assert_relative_eq!(positions[1][0], 4.0);
    }

    #[test]
    fn small_scenes_are_never_scaled_up() {
        let mut positions = [[-0.5, 0.0, 0.0], [0.5, 0.0, 0.0]];
        let report = frame_positions(&mut positions, &config(4.0));

        assert_eq!(report.scale, 1.0);
        assert_relative_eq!(positions[1][0], 0.5);
    }

    #[test]
    fn non_finite_centre_skips_framing() {
        let mut positions = [[f32::MAX; 3], [f32::MAX; 3]];
        let report = frame_positions(&mut positions, &config(4.0));

        assert_eq!(report.offset, None);
        assert_eq!(report.scale, 1.0);
        assert_eq!(positions[0], [f32::MAX, -f32::MAX, -f32::MAX]);
    }

    #[test]
    fn non_finite_radius_skips_scaling() {
        let mut positions = [[-f32::MAX, 0.0, 0.0], [f32::MAX, 0.0, 0.0]];
        let report = frame_positions(&mut positions, &config(4.0));

        assert_eq!(report.offset, Some([0.0, 0.0, 0.0]));
        assert_eq!(report.scale, 1.0);
        assert_eq!(positions[1][0], f32::MAX);
    }

    #[test]
    fn empty_input_is_left_alone() {
        let report = frame_positions(&mut [], &config(4.0));
        assert_eq!(report.offset, None);
    }
}
