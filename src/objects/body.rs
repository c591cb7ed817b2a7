use crate::contact::contact::EdgeRef;
use crate::math::transform::{Sweep, Transform};
use crate::math::vec2::Vec2;

/// A rigid body as seen by the contact layer: a transform, a sweep for
/// continuous motion, a sleep state, and the head of its contact edge list.
/// Mass, velocity and force state belong to the external solver.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    /// World position of the body origin.
    pub position: Vec2,
    /// World rotation in radians.
    pub rotation: f64,
    /// Motion interpolation state consumed by the external TOI scheduler.
    pub sweep: Sweep,
    /// Head of this body's contact edge list.
    pub contact_list: Option<EdgeRef>,
    /// Fixtures attached to this body.
    pub fixtures: Vec<usize>,
    awake: bool,
}

impl Body {
    pub fn new(position: Vec2, rotation: f64) -> Self {
        let sweep = Sweep {
            local_center: Vec2::ZERO,
            c0: position,
            c: position,
            a0: rotation,
            a: rotation,
        };
        Self {
            position,
            rotation,
            sweep,
            contact_list: None,
            fixtures: Vec::new(),
            awake: true,
        }
    }

    /// The body's current world transform.
    pub fn transform(&self) -> Transform {
        Transform::new(self.position, self.rotation)
    }

    /// Moves the body, resetting both ends of its sweep to the new pose.
    pub fn set_transform(&mut self, position: Vec2, rotation: f64) {
        self.position = position;
        self.rotation = rotation;
        let center = position + self.sweep.local_center.rotate(rotation);
        self.sweep.c0 = center;
        self.sweep.c = center;
        self.sweep.a0 = rotation;
        self.sweep.a = rotation;
    }

    pub fn is_awake(&self) -> bool {
        self.awake
    }

    pub fn set_awake(&mut self, awake: bool) {
        self.awake = awake;
    }

    /// Advances the sweep to time `alpha` within the step and moves the body
    /// to the interpolated pose. Used by the external continuous-collision
    /// scheduler.
    pub fn advance(&mut self, alpha: f64) {
        self.sweep.advance(alpha);
        self.sweep.c = self.sweep.c0;
        self.sweep.a = self.sweep.a0;
        self.synchronize_transform();
    }

    /// Snaps the body pose to the end state of its sweep.
    pub fn synchronize_transform(&mut self) {
        let xf = self.sweep.transform_at(1.0);
        self.position = xf.position;
        self.rotation = xf.rotation;
    }
}
