use super::vec2::Vec2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec2,
    pub rotation: f64, // Angle in radians
}

impl Transform {
    /// Creates a new transform.
    pub fn new(position: Vec2, rotation: f64) -> Self {
        Self { position, rotation }
    }

    /// Creates an identity transform (no translation, no rotation).
    pub fn identity() -> Self {
        Self {
            position: Vec2::ZERO,
            rotation: 0.0,
        }
    }

    /// Applies the transform (rotation then translation) to a point.
    pub fn apply(self, point: Vec2) -> Vec2 {
        let cos_a = self.rotation.cos();
        let sin_a = self.rotation.sin();
        let rotated_x = point.x * cos_a - point.y * sin_a;
        let rotated_y = point.x * sin_a + point.y * cos_a;
        Vec2::new(rotated_x, rotated_y) + self.position
    }

    /// Applies the inverse transform (inverse translation then inverse
    /// rotation) to a point.
    pub fn apply_inverse(self, point: Vec2) -> Vec2 {
        let translated = point - self.position;
        let cos_a = self.rotation.cos();
        let sin_a = self.rotation.sin();
        let rotated_x = translated.x * cos_a + translated.y * sin_a;
        let rotated_y = -translated.x * sin_a + translated.y * cos_a;
        Vec2::new(rotated_x, rotated_y)
    }

    /// Rotates a vector by this transform's rotation without translating it.
    pub fn apply_rotation(self, v: Vec2) -> Vec2 {
        v.rotate(self.rotation)
    }
}

/// Describes the motion of a body over a step for time-of-impact
/// interpolation. Shapes are defined relative to the body origin, which may
/// not coincide with the center of mass, so the center positions are
/// interpolated and then shifted back to the origin.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Sweep {
    /// Local center of mass position.
    pub local_center: Vec2,
    /// Center world position at the start of the step.
    pub c0: Vec2,
    /// Center world position at the end of the step.
    pub c: Vec2,
    /// World angle at the start of the step.
    pub a0: f64,
    /// World angle at the end of the step.
    pub a: f64,
}

impl Sweep {
    /// Returns the interpolated transform at `alpha`, a factor in [0, 1]
    /// where 0 indicates the start of the step.
    pub fn transform_at(&self, alpha: f64) -> Transform {
        let position = (1.0 - alpha) * self.c0 + alpha * self.c;
        let rotation = (1.0 - alpha) * self.a0 + alpha * self.a;

        // Shift from center of mass back to the body origin
        let origin = position - self.local_center.rotate(rotation);
        Transform::new(origin, rotation)
    }

    /// Advances the sweep forward, yielding a new initial state at time `t`.
    pub fn advance(&mut self, t: f64) {
        self.c0 = (1.0 - t) * self.c0 + t * self.c;
        self.a0 = (1.0 - t) * self.a0 + t * self.a;
    }
}
