/// Axis-aligned bounds tracking over decoded positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneBounds {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

impl Default for SceneBounds {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneBounds {
    /// Create empty bounds initialised to infinity values.
    pub fn new() -> Self {
        Self {
            min: [f32::INFINITY; 3],
            max: [f32::NEG_INFINITY; 3],
        }
    }

    pub fn from_positions(positions: &[[f32; 3]]) -> Self {
        let mut bounds = Self::new();
        for position in positions {
            bounds.update(*position);
        }
        bounds
    }

    /// Grow the bounds to include a point.
    pub fn update(&mut self, position: [f32; 3]) {
        for axis in 0..3 {
            self.min[axis] = self.min[axis].min(position[axis]);
            self.max[axis] = self.max[axis].max(position[axis]);
        }
    }

    pub fn is_empty(&self) -> bool {
        (0..3).any(|axis| self.min[axis] > self.max[axis])
    }

    pub fn center(&self) -> [f32; 3] {
        [0, 1, 2].map(|axis| (self.min[axis] + self.max[axis]) * 0.5)
    }

    /// Radius of the sphere around `center()` enclosing every position.
    pub fn bounding_radius(&self, positions: &[[f32; 3]]) -> f32 {
        let center = self.center();
        positions
            .iter()
            .map(|p| {
                let d = [p[0] - center[0], p[1] - center[1], p[2] - center[2]];
                d[0] * d[0] + d[1] * d[1] + d[2] * d[2]
            })
            .fold(0.0f32, f32::max)
            .sqrt()
    }
}
