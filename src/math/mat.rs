use super::vec2::Vec2;

/// A 2-by-2 matrix stored in column-major order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat22 {
    pub col1: Vec2,
    pub col2: Vec2,
}

impl Mat22 {
    /// Constructs the matrix from its columns.
    pub fn new(col1: Vec2, col2: Vec2) -> Self {
        Self { col1, col2 }
    }

    /// Constructs an orthonormal rotation matrix from an angle (radians).
    pub fn from_angle(angle: f64) -> Self {
        let c = angle.cos();
        let s = angle.sin();
        Self {
            col1: Vec2::new(c, s),
            col2: Vec2::new(-s, c),
        }
    }

    /// The identity matrix.
    pub fn identity() -> Self {
        Self {
            col1: Vec2::new(1.0, 0.0),
            col2: Vec2::new(0.0, 1.0),
        }
    }

    /// Extracts the angle this matrix represents, assuming it is a rotation
    /// matrix.
    pub fn angle(&self) -> f64 {
        self.col1.y.atan2(self.col1.x)
    }

    /// Multiplies the matrix with a vector.
    pub fn mul_vec(&self, v: Vec2) -> Vec2 {
        Vec2::new(
            self.col1.x * v.x + self.col2.x * v.y,
            self.col1.y * v.x + self.col2.y * v.y,
        )
    }

    /// Multiplies the transpose of the matrix with a vector.
    pub fn mul_vec_t(&self, v: Vec2) -> Vec2 {
        Vec2::new(v.dot(self.col1), v.dot(self.col2))
    }

    /// Returns the inverse of this matrix. A singular matrix yields the zero
    /// matrix instead of dividing by zero, so degenerate geometry cannot halt
    /// the stepping loop.
    pub fn inverse(&self) -> Self {
        let a = self.col1.x;
        let b = self.col2.x;
        let c = self.col1.y;
        let d = self.col2.y;
        let mut det = a * d - b * c;
        if det != 0.0 {
            det = 1.0 / det;
        }
        Self {
            col1: Vec2::new(det * d, -det * c),
            col2: Vec2::new(-det * b, det * a),
        }
    }

    /// Solves `A * x = b` for `x` in one shot, cheaper than computing the
    /// inverse. A singular matrix yields the zero vector.
    pub fn solve(&self, b: Vec2) -> Vec2 {
        let a11 = self.col1.x;
        let a12 = self.col2.x;
        let a21 = self.col1.y;
        let a22 = self.col2.y;
        let mut det = a11 * a22 - a12 * a21;
        if det != 0.0 {
            det = 1.0 / det;
        }
        Vec2::new(det * (a22 * b.x - a12 * b.y), det * (a11 * b.y - a21 * b.x))
    }
}

/// Minimal 3-component vector used only by `Mat33`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(self, other: Self) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }
}

/// A 3-by-3 matrix stored in column-major order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat33 {
    pub col1: Vec3,
    pub col2: Vec3,
    pub col3: Vec3,
}

impl Mat33 {
    /// Constructs the matrix from its columns.
    pub fn new(col1: Vec3, col2: Vec3, col3: Vec3) -> Self {
        Self { col1, col2, col3 }
    }

    /// The zero matrix.
    pub fn zero() -> Self {
        Self {
            col1: Vec3::ZERO,
            col2: Vec3::ZERO,
            col3: Vec3::ZERO,
        }
    }

    /// Solves `A * x = b` for `x`. A singular matrix yields the zero vector.
    pub fn solve33(&self, b: Vec3) -> Vec3 {
        let mut det = self.col1.dot(self.col2.cross(self.col3));
        if det != 0.0 {
            det = 1.0 / det;
        }
        Vec3::new(
            det * b.dot(self.col2.cross(self.col3)),
            det * self.col1.dot(b.cross(self.col3)),
            det * self.col1.dot(self.col2.cross(b)),
        )
    }

    /// Solves the upper 2-by-2 equation of `A * x = b`. A singular block
    /// yields the zero vector.
    pub fn solve22(&self, b: Vec2) -> Vec2 {
        let a11 = self.col1.x;
        let a12 = self.col2.x;
        let a21 = self.col1.y;
        let a22 = self.col2.y;
        let mut det = a11 * a22 - a12 * a21;
        if det != 0.0 {
            det = 1.0 / det;
        }
        Vec2::new(det * (a22 * b.x - a12 * b.y), det * (a11 * b.y - a21 * b.x))
    }
}
