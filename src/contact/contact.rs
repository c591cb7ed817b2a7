use crate::collision::aabb::test_overlap;
use crate::collision::detection::{collide_circles, collide_polygon_and_circle, collide_polygons};
use crate::collision::manifold::{Manifold, WorldManifold};
use crate::common::material::{mix_friction, mix_restitution};
use crate::math::transform::Transform;
use crate::objects::body::Body;
use crate::objects::fixture::Fixture;
use crate::shapes::Shape;
use crate::world::callbacks::ContactListener;

/// Sentinel fixture index stored while a contact sits in the pool, so a
/// stale slot can never be mistaken for a live reference.
pub const INVALID_INDEX: usize = usize::MAX;

/// Which endpoint of a contact an edge belongs to: the edge linked into
/// fixture A's body or fixture B's body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactEnd {
    A = 0,
    B = 1,
}

/// Address of a single contact edge: a contact slot plus which of its two
/// ends. This is what the per-body intrusive lists link together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeRef {
    pub contact: usize,
    pub end: ContactEnd,
}

/// A contact edge connects bodies and contacts together in a contact graph
/// where each body is a node and each contact is an edge. Each contact has
/// two edges, one linked into each attached body's list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactEdge {
    /// Quick access to the other body attached to this contact.
    pub other: usize,
    /// The previous edge in the owning body's contact list.
    pub prev: Option<EdgeRef>,
    /// The next edge in the owning body's contact list.
    pub next: Option<EdgeRef>,
}

impl ContactEdge {
    fn cleared() -> Self {
        Self {
            other: INVALID_INDEX,
            prev: None,
            next: None,
        }
    }
}

/// Which narrow-phase routine evaluates this contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactKind {
    Circles,
    PolygonAndCircle,
    Polygons,
}

/// Dispatch table indexed by the two fixtures' shape-type ranks. Symmetric
/// in effect: (circle, polygon) and (polygon, circle) resolve to the same
/// routine, with the fixture order canonicalized at creation time.
const REGISTERS: [[ContactKind; 2]; 2] = [
    [ContactKind::Circles, ContactKind::PolygonAndCircle],
    [ContactKind::PolygonAndCircle, ContactKind::Polygons],
];

/// Manages the touching relationship between two fixtures. A contact exists
/// for each overlapping broad-phase AABB pair (unless filtered), so a
/// contact may exist with no contact points.
#[derive(Debug, Clone, PartialEq)]
pub struct Contact {
    fixture_a: usize,
    fixture_b: usize,
    kind: ContactKind,
    pub manifold: Manifold,
    /// Graph edges; `edges[0]` links into fixture A's body, `edges[1]` into
    /// fixture B's body.
    pub edges: [ContactEdge; 2],
    /// Number of continuous-collision sub-steps spent on this contact,
    /// maintained by the external TOI scheduler.
    pub toi_count: u32,
    /// Mixed friction of the two fixtures.
    pub friction: f64,
    /// Mixed restitution of the two fixtures.
    pub restitution: f64,
    /// Marker used by the external solver's island traversal.
    pub island: bool,
    enabled: bool,
    touching: bool,
    needs_filter: bool,
    pooled: bool,
}

impl Contact {
    /// Canonicalizes a fixture pair by shape-type rank and resolves its
    /// dispatch kind. The fixture with the higher-or-equal rank comes first,
    /// mirroring the dispatch table's row/column convention; callers must
    /// never assume fixture A is the pair they passed first.
    pub fn canonicalize(
        fixture_a: usize,
        fixture_b: usize,
        fixtures: &[Fixture],
    ) -> (usize, usize, ContactKind) {
        let type_a = fixtures[fixture_a].shape_type() as usize;
        let type_b = fixtures[fixture_b].shape_type() as usize;
        let kind = REGISTERS[type_a][type_b];
        if type_a >= type_b {
            (fixture_a, fixture_b, kind)
        } else {
            (fixture_b, fixture_a, kind)
        }
    }

    /// Builds a fresh contact for an already-canonicalized fixture pair.
    pub(crate) fn new(
        fixture_a: usize,
        fixture_b: usize,
        kind: ContactKind,
        fixtures: &[Fixture],
    ) -> Self {
        let mut contact = Self {
            fixture_a: INVALID_INDEX,
            fixture_b: INVALID_INDEX,
            kind,
            manifold: Manifold::default(),
            edges: [ContactEdge::cleared(), ContactEdge::cleared()],
            toi_count: 0,
            friction: 0.0,
            restitution: 0.0,
            island: false,
            enabled: true,
            touching: false,
            needs_filter: false,
            pooled: false,
        };
        contact.reset(fixture_a, fixture_b, kind, fixtures);
        contact
    }

    /// Resets a (possibly recycled) contact to its deterministic initial
    /// state: enabled, not touching, empty manifold, unlinked edges, zero
    /// TOI count.
    pub(crate) fn reset(
        &mut self,
        fixture_a: usize,
        fixture_b: usize,
        kind: ContactKind,
        fixtures: &[Fixture],
    ) {
        self.fixture_a = fixture_a;
        self.fixture_b = fixture_b;
        self.kind = kind;
        self.manifold = Manifold::default();
        self.edges = [ContactEdge::cleared(), ContactEdge::cleared()];
        self.toi_count = 0;
        self.friction = mix_friction(
            fixtures[fixture_a].material.friction,
            fixtures[fixture_b].material.friction,
        );
        self.restitution = mix_restitution(
            fixtures[fixture_a].material.restitution,
            fixtures[fixture_b].material.restitution,
        );
        self.island = false;
        self.enabled = true;
        self.touching = false;
        self.needs_filter = false;
        self.pooled = false;
    }

    /// Clears fixture references and marks the slot pooled. Only the pool
    /// owner may call this; observing a pooled contact is a contract
    /// violation.
    pub(crate) fn clear_for_pool(&mut self) {
        self.fixture_a = INVALID_INDEX;
        self.fixture_b = INVALID_INDEX;
        self.manifold = Manifold::default();
        self.edges = [ContactEdge::cleared(), ContactEdge::cleared()];
        self.touching = false;
        self.pooled = true;
    }

    /// The first fixture in this contact (canonical order, not creation
    /// order).
    pub fn fixture_a(&self) -> usize {
        self.fixture_a
    }

    /// The second fixture in this contact.
    pub fn fixture_b(&self) -> usize {
        self.fixture_b
    }

    pub fn kind(&self) -> ContactKind {
        self.kind
    }

    pub(crate) fn is_pooled(&self) -> bool {
        self.pooled
    }

    /// Is this contact touching?
    pub fn is_touching(&self) -> bool {
        self.touching
    }

    /// Enable or disable this contact, typically from inside a pre-solve
    /// callback. A disable lasts for the current step only; the next update
    /// re-enables the contact.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Flags this contact for filter re-evaluation on the next step, used
    /// after a fixture's filter data changes.
    pub fn flag_for_filtering(&mut self) {
        self.needs_filter = true;
    }

    pub fn needs_filtering(&self) -> bool {
        self.needs_filter
    }

    pub(crate) fn clear_filter_flag(&mut self) {
        self.needs_filter = false;
    }

    pub fn edge(&self, end: ContactEnd) -> &ContactEdge {
        &self.edges[end as usize]
    }

    pub(crate) fn edge_mut(&mut self, end: ContactEnd) -> &mut ContactEdge {
        &mut self.edges[end as usize]
    }

    /// The fixture whose body owns the given edge end.
    pub fn fixture_at(&self, end: ContactEnd) -> usize {
        match end {
            ContactEnd::A => self.fixture_a,
            ContactEnd::B => self.fixture_b,
        }
    }

    /// The world-space view of the current manifold at the bodies' current
    /// transforms.
    pub fn world_manifold(&self, bodies: &[Body], fixtures: &[Fixture]) -> WorldManifold {
        let fixture_a = &fixtures[self.fixture_a];
        let fixture_b = &fixtures[self.fixture_b];
        let xf_a = bodies[fixture_a.body].transform();
        let xf_b = bodies[fixture_b.body].transform();
        WorldManifold::new(
            &self.manifold,
            &xf_a,
            fixture_a.shape.radius(),
            &xf_b,
            fixture_b.shape.radius(),
        )
    }

    /// Updates the manifold and touching status, matching old contact ids to
    /// new ones to warm-start the solver, and notifies the listener of any
    /// transition. Do not assume the fixture AABBs are overlapping.
    pub(crate) fn update(
        &mut self,
        bodies: &mut [Body],
        fixtures: &[Fixture],
        listener: &mut dyn ContactListener,
    ) {
        let old_manifold = self.manifold;

        // Re-enable this contact; a disable is scoped to one step.
        self.enabled = true;

        let was_touching = self.touching;

        let fixture_a = &fixtures[self.fixture_a];
        let fixture_b = &fixtures[self.fixture_b];
        let sensor = fixture_a.sensor || fixture_b.sensor;

        let body_a = fixture_a.body;
        let body_b = fixture_b.body;
        let xf_a = bodies[body_a].transform();
        let xf_b = bodies[body_b].transform();

        let touching;
        if sensor {
            touching = test_overlap(&fixture_a.shape, &xf_a, &fixture_b.shape, &xf_b);

            // Sensors don't generate manifolds.
            self.manifold.point_count = 0;
        } else {
            self.manifold = self.evaluate(fixtures, &xf_a, &xf_b);
            touching = self.manifold.point_count > 0;

            // Match old contact ids to new contact ids and copy the stored
            // impulses to warm start the solver. A point whose id has no
            // match starts cold.
            for i in 0..self.manifold.point_count {
                let mp2 = &mut self.manifold.points[i];
                mp2.normal_impulse = 0.0;
                mp2.tangent_impulse = 0.0;

                for j in 0..old_manifold.point_count {
                    let mp1 = &old_manifold.points[j];
                    if mp1.id.key() == mp2.id.key() {
                        mp2.normal_impulse = mp1.normal_impulse;
                        mp2.tangent_impulse = mp1.tangent_impulse;
                        break;
                    }
                }
            }

            if touching != was_touching {
                bodies[body_a].set_awake(true);
                bodies[body_b].set_awake(true);
            }
        }

        self.touching = touching;

        if !was_touching && touching {
            listener.begin_contact(self);
        }
        if was_touching && !touching {
            listener.end_contact(self);
        }
        if !sensor {
            listener.pre_solve(self, &old_manifold);
        }
    }

    /// Evaluates this contact's narrow-phase routine with the given
    /// transforms. A shape pair that does not match the stored dispatch kind
    /// is a programming error.
    pub fn evaluate(&self, fixtures: &[Fixture], xf_a: &Transform, xf_b: &Transform) -> Manifold {
        let shape_a = &fixtures[self.fixture_a].shape;
        let shape_b = &fixtures[self.fixture_b].shape;

        match (self.kind, shape_a, shape_b) {
            (ContactKind::Circles, Shape::Circle(a), Shape::Circle(b)) => {
                collide_circles(a, xf_a, b, xf_b)
            }
            (ContactKind::PolygonAndCircle, Shape::Polygon(a), Shape::Circle(b)) => {
                collide_polygon_and_circle(a, xf_a, b, xf_b)
            }
            (ContactKind::Polygons, Shape::Polygon(a), Shape::Polygon(b)) => {
                collide_polygons(a, xf_a, b, xf_b)
            }
            (kind, _, _) => panic!("shape pair does not match contact dispatch kind {:?}", kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::vec2::Vec2;
    use crate::shapes::{Circle, Polygon};
    use crate::world::callbacks::DefaultContactListener;

    fn circle_fixture(body: usize, radius: f64) -> Fixture {
        Fixture::new(body, Shape::Circle(Circle::new(radius)))
    }

    fn box_fixture(body: usize, half: f64) -> Fixture {
        Fixture::new(body, Shape::Polygon(Polygon::new_box(half, half)))
    }

    #[test]
    fn test_canonicalize_keeps_equal_ranks() {
        let fixtures = vec![circle_fixture(0, 1.0), circle_fixture(1, 1.0)];
        let (a, b, kind) = Contact::canonicalize(0, 1, &fixtures);
        assert_eq!((a, b), (0, 1));
        assert_eq!(kind, ContactKind::Circles);
    }

    #[test]
    fn test_canonicalize_swaps_lower_rank_first() {
        // Circle (rank 0) passed first, polygon (rank 1) second: swap so the
        // polygon is fixture A.
        let fixtures = vec![circle_fixture(0, 1.0), box_fixture(1, 0.5)];
        let (a, b, kind) = Contact::canonicalize(0, 1, &fixtures);
        assert_eq!((a, b), (1, 0));
        assert_eq!(kind, ContactKind::PolygonAndCircle);

        // Passing the pair the other way round lands on the same layout
        let (a2, b2, kind2) = Contact::canonicalize(1, 0, &fixtures);
        assert_eq!((a2, b2), (a, b));
        assert_eq!(kind2, kind);
    }

    #[test]
    fn test_dispatch_table_symmetry() {
        let fixtures = vec![box_fixture(0, 0.5), circle_fixture(1, 1.0)];
        let (_, _, kind_ab) = Contact::canonicalize(0, 1, &fixtures);
        let (_, _, kind_ba) = Contact::canonicalize(1, 0, &fixtures);
        assert_eq!(kind_ab, kind_ba);
    }

    #[test]
    fn test_new_contact_initial_state() {
        let fixtures = vec![circle_fixture(0, 1.0), circle_fixture(1, 1.0)];
        let contact = Contact::new(0, 1, ContactKind::Circles, &fixtures);
        assert!(contact.is_enabled());
        assert!(!contact.is_touching());
        assert!(!contact.needs_filtering());
        assert!(!contact.island);
        assert_eq!(contact.manifold.point_count, 0);
        assert_eq!(contact.toi_count, 0);
        assert!(contact.edge(ContactEnd::A).prev.is_none());
        assert!(contact.edge(ContactEnd::B).next.is_none());
    }

    #[test]
    fn test_reset_mixes_materials() {
        let mut fixtures = vec![circle_fixture(0, 1.0), circle_fixture(1, 1.0)];
        fixtures[0].material = crate::common::Material::new(0.1, 0.0);
        fixtures[1].material = crate::common::Material::new(0.9, 0.8);
        let contact = Contact::new(0, 1, ContactKind::Circles, &fixtures);
        assert_eq!(contact.friction, 0.0); // sqrt(0.0 * 0.8)
        assert_eq!(contact.restitution, 0.9); // max(0.1, 0.9)
    }

    #[test]
    fn test_clear_for_pool_clears_fixture_refs() {
        let fixtures = vec![circle_fixture(0, 1.0), circle_fixture(1, 1.0)];
        let mut contact = Contact::new(0, 1, ContactKind::Circles, &fixtures);
        contact.clear_for_pool();
        assert!(contact.is_pooled());
        assert_eq!(contact.fixture_a(), INVALID_INDEX);
        assert_eq!(contact.fixture_b(), INVALID_INDEX);
        assert!(!contact.is_touching());
    }

    #[test]
    fn test_update_touching_and_warm_start() {
        let mut bodies = vec![Body::new(Vec2::ZERO, 0.0), Body::new(Vec2::new(1.5, 0.0), 0.0)];
        let fixtures = vec![circle_fixture(0, 1.0), circle_fixture(1, 1.0)];
        let mut contact = Contact::new(0, 1, ContactKind::Circles, &fixtures);
        let mut listener = DefaultContactListener;

        contact.update(&mut bodies, &fixtures, &mut listener);
        assert!(contact.is_touching());
        assert_eq!(contact.manifold.point_count, 1);

        // Pretend the solver accumulated impulses, then update again; the
        // matching id must carry them forward.
        contact.manifold.points[0].normal_impulse = 3.5;
        contact.manifold.points[0].tangent_impulse = -1.25;
        contact.update(&mut bodies, &fixtures, &mut listener);
        assert_eq!(contact.manifold.points[0].normal_impulse, 3.5);
        assert_eq!(contact.manifold.points[0].tangent_impulse, -1.25);
    }

    #[test]
    fn test_update_wakes_bodies_on_transition() {
        let mut bodies = vec![Body::new(Vec2::ZERO, 0.0), Body::new(Vec2::new(1.5, 0.0), 0.0)];
        let fixtures = vec![circle_fixture(0, 1.0), circle_fixture(1, 1.0)];
        let mut contact = Contact::new(0, 1, ContactKind::Circles, &fixtures);
        let mut listener = DefaultContactListener;

        bodies[0].set_awake(false);
        bodies[1].set_awake(false);
        contact.update(&mut bodies, &fixtures, &mut listener);
        assert!(bodies[0].is_awake());
        assert!(bodies[1].is_awake());
    }

    #[test]
    fn test_update_reenables_disabled_contact() {
        let mut bodies = vec![Body::new(Vec2::ZERO, 0.0), Body::new(Vec2::new(1.5, 0.0), 0.0)];
        let fixtures = vec![circle_fixture(0, 1.0), circle_fixture(1, 1.0)];
        let mut contact = Contact::new(0, 1, ContactKind::Circles, &fixtures);
        let mut listener = DefaultContactListener;

        contact.set_enabled(false);
        assert!(!contact.is_enabled());
        contact.update(&mut bodies, &fixtures, &mut listener);
        assert!(contact.is_enabled());
    }

    #[test]
    fn test_update_sensor_has_no_manifold() {
        let mut bodies = vec![Body::new(Vec2::ZERO, 0.0), Body::new(Vec2::new(1.5, 0.0), 0.0)];
        let mut fixtures = vec![circle_fixture(0, 1.0), circle_fixture(1, 1.0)];
        fixtures[0].sensor = true;
        let mut contact = Contact::new(0, 1, ContactKind::Circles, &fixtures);
        let mut listener = DefaultContactListener;

        contact.update(&mut bodies, &fixtures, &mut listener);
        assert!(contact.is_touching());
        assert_eq!(contact.manifold.point_count, 0);
    }

    #[test]
    #[should_panic]
    fn test_evaluate_dispatch_mismatch_panics() {
        let fixtures = vec![circle_fixture(0, 1.0), circle_fixture(1, 1.0)];
        // Deliberately wrong kind for two circle fixtures
        let contact = Contact::new(0, 1, ContactKind::Polygons, &fixtures);
        contact.evaluate(&fixtures, &Transform::identity(), &Transform::identity());
    }
}
