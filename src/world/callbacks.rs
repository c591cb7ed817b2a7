//! Pluggable world callbacks: contact events and collision filtering.
//!
//! Every hook has a no-op default implementation, so a world without a
//! user-supplied listener or filter is never an error.

use crate::collision::manifold::Manifold;
use crate::common::settings::MAX_MANIFOLD_POINTS;
use crate::contact::contact::Contact;
use crate::objects::fixture::Fixture;

/// The impulses the solver applied at each manifold point, reported through
/// `ContactListener::post_solve`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ContactImpulse {
    pub normal_impulses: [f64; MAX_MANIFOLD_POINTS],
    pub tangent_impulses: [f64; MAX_MANIFOLD_POINTS],
    pub count: usize,
}

/// Receives contact lifecycle events.
///
/// `begin_contact`/`end_contact` fire exactly once per touching transition.
/// `pre_solve` fires for every non-sensor contact on every update, touching
/// or not, together with the previous step's manifold so the solver can do
/// its impulse bookkeeping. `post_solve` is invoked by the external solver
/// after impulses are computed, not by the contact pass itself.
pub trait ContactListener {
    fn begin_contact(&mut self, _contact: &Contact) {}
    fn end_contact(&mut self, _contact: &Contact) {}
    /// The contact is mutable so the callback can disable it for the
    /// current step via `Contact::set_enabled(false)`.
    fn pre_solve(&mut self, _contact: &mut Contact, _old_manifold: &Manifold) {}
    fn post_solve(&mut self, _contact: &Contact, _impulse: &ContactImpulse) {}
}

/// Listener that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultContactListener;

impl ContactListener for DefaultContactListener {}

/// Decides which fixture pairs are allowed to collide.
pub trait ContactFilter {
    /// Returns true if contact calculations should be performed between
    /// these two fixtures.
    fn should_collide(&self, fixture_a: &Fixture, fixture_b: &Fixture) -> bool;

    /// Returns true if the fixture should be considered by a ray query
    /// originating from `origin` (another fixture, if the query has one).
    fn ray_collide(&self, origin: Option<&Fixture>, fixture: &Fixture) -> bool {
        match origin {
            Some(origin_fixture) => self.should_collide(origin_fixture, fixture),
            None => true,
        }
    }
}

/// The default filter: a shared nonzero group index decides outright
/// (positive collides, negative never), otherwise both fixtures' masks must
/// accept the other's category.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultContactFilter;

impl ContactFilter for DefaultContactFilter {
    fn should_collide(&self, fixture_a: &Fixture, fixture_b: &Fixture) -> bool {
        let filter_a = fixture_a.filter;
        let filter_b = fixture_b.filter;

        if filter_a.group_index == filter_b.group_index && filter_a.group_index != 0 {
            return filter_a.group_index > 0;
        }

        (filter_a.mask_bits & filter_b.category_bits) != 0
            && (filter_a.category_bits & filter_b.mask_bits) != 0
    }
}
