use crate::math::transform::Transform;
use crate::math::vec2::Vec2;
use crate::shapes::Shape;

/// An Axis-Aligned Bounding Box defined by its minimum and maximum corner
/// points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    pub min: Vec2,
    pub max: Vec2,
}

impl AABB {
    /// Creates a new AABB. Corner coordinates are sorted so `min <= max`
    /// holds per axis.
    pub fn new(min: Vec2, max: Vec2) -> Self {
        AABB {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Checks if this AABB overlaps with another AABB.
    pub fn overlaps(&self, other: &AABB) -> bool {
        let x_overlap = self.max.x >= other.min.x && self.min.x <= other.max.x;
        let y_overlap = self.max.y >= other.min.y && self.min.y <= other.max.y;
        x_overlap && y_overlap
    }

    /// Merges another AABB into this one, expanding this AABB to contain
    /// both.
    pub fn merge(&mut self, other: &AABB) {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    /// Returns this AABB grown by `margin` on every side.
    pub fn extended(&self, margin: f64) -> Self {
        let m = Vec2::new(margin, margin);
        AABB {
            min: self.min - m,
            max: self.max + m,
        }
    }

    /// Computes the world-space AABB of a shape at the given transform.
    pub fn of_shape(shape: &Shape, xf: &Transform) -> Self {
        match shape {
            Shape::Circle(circle) => {
                let r = Vec2::new(circle.radius, circle.radius);
                AABB {
                    min: xf.position - r,
                    max: xf.position + r,
                }
            }
            Shape::Polygon(polygon) => {
                let mut min = xf.apply(polygon.vertices[0]);
                let mut max = min;
                for &v in polygon.vertices.iter().skip(1) {
                    let world = xf.apply(v);
                    min = min.min(world);
                    max = max.max(world);
                }
                AABB { min, max }
            }
        }
    }
}

/// Conservative overlap test between two shapes at the given transforms,
/// comparing their world AABBs. Used for sensor contacts, which only need a
/// touching boolean and never a manifold.
pub fn test_overlap(shape_a: &Shape, xf_a: &Transform, shape_b: &Shape, xf_b: &Transform) -> bool {
    let aabb_a = AABB::of_shape(shape_a, xf_a);
    let aabb_b = AABB::of_shape(shape_b, xf_b);
    aabb_a.overlaps(&aabb_b)
}
