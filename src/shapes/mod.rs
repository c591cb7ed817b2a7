pub mod circle;
pub mod polygon;

pub use circle::Circle;
pub use polygon::{Polygon, ShapeError};

use crate::common::settings::POLYGON_RADIUS;

/// Enum representing the geometry attached to a fixture.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Circle(Circle),
    Polygon(Polygon),
}

/// Numeric rank of a shape kind. The contact dispatch table is indexed by
/// pairs of these ranks, and contact creation canonicalizes fixture order so
/// the higher-or-equal rank is stored first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ShapeType {
    Circle = 0,
    Polygon = 1,
}

impl Shape {
    pub fn shape_type(&self) -> ShapeType {
        match self {
            Shape::Circle(_) => ShapeType::Circle,
            Shape::Polygon(_) => ShapeType::Polygon,
        }
    }

    /// The shape's skin radius: the full radius for circles, the thin
    /// polygon skin otherwise. Used when projecting manifolds to world space.
    pub fn radius(&self) -> f64 {
        match self {
            Shape::Circle(c) => c.radius,
            Shape::Polygon(_) => POLYGON_RADIUS,
        }
    }
}
