use crate::collision::aabb::AABB;
use crate::common::material::Material;
use crate::math::transform::Transform;
use crate::shapes::{Shape, ShapeType};

/// Collision filtering data. A nonzero group index overrides the
/// category/mask test: fixtures sharing a positive group always collide,
/// fixtures sharing a negative group never do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Filter {
    /// The category this fixture belongs to (a single bit, normally).
    pub category_bits: u16,
    /// The categories this fixture accepts collisions with.
    pub mask_bits: u16,
    /// Collision group override; 0 means no group.
    pub group_index: i16,
}

impl Default for Filter {
    fn default() -> Self {
        Self {
            category_bits: 0x0001,
            mask_bits: 0xFFFF,
            group_index: 0,
        }
    }
}

/// A shape attached to a body, carrying the collision filter, material and
/// sensor flag. Fixtures never move relative to their body.
#[derive(Debug, Clone, PartialEq)]
pub struct Fixture {
    /// Owning body index.
    pub body: usize,
    pub shape: Shape,
    pub material: Material,
    pub filter: Filter,
    /// Sensors detect overlap but never generate manifold points.
    pub sensor: bool,
}

impl Fixture {
    pub fn new(body: usize, shape: Shape) -> Self {
        Self {
            body,
            shape,
            material: Material::default(),
            filter: Filter::default(),
            sensor: false,
        }
    }

    pub fn shape_type(&self) -> ShapeType {
        self.shape.shape_type()
    }

    /// World-space AABB of this fixture at the given body transform.
    pub fn aabb(&self, xf: &Transform) -> AABB {
        AABB::of_shape(&self.shape, xf)
    }
}
