//! Defines physical material properties.

/// Surface properties of a fixture that the solver combines per contact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Coefficient of restitution (bounciness). Range [0, 1].
    pub restitution: f64,
    /// Coefficient of friction. Range [0, infinity).
    pub friction: f64,
}

impl Material {
    /// Creates a new material with the given restitution and friction.
    pub fn new(restitution: f64, friction: f64) -> Self {
        Material {
            restitution: restitution.clamp(0.0, 1.0),
            friction: friction.max(0.0),
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Material {
            restitution: 0.2,
            friction: 0.5,
        }
    }
}

/// Combines the friction of two touching fixtures. The geometric mean keeps
/// a frictionless fixture frictionless against anything.
pub fn mix_friction(friction_a: f64, friction_b: f64) -> f64 {
    (friction_a * friction_b).sqrt()
}

/// Combines the restitution of two touching fixtures. Taking the maximum
/// lets a bouncy fixture bounce off anything, e.g. a ball on a table.
pub fn mix_restitution(restitution_a: f64, restitution_b: f64) -> f64 {
    restitution_a.max(restitution_b)
}
