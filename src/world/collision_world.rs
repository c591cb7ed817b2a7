use tracing::trace;

use crate::common::settings::AABB_EXTENSION;
use crate::contact::manager::ContactManager;
use crate::math::vec2::Vec2;
use crate::objects::body::Body;
use crate::objects::fixture::{Filter, Fixture};
use crate::shapes::Shape;
use crate::world::callbacks::{ContactFilter, ContactListener};
use crate::world::debug_draw::{Color, DebugDraw, DebugDrawFlags};

/// Owns the bodies, fixtures and the contact manager, and runs the
/// per-step contact pass. The constraint solver, joints and continuous
/// collision live outside; they consume the manifolds this world maintains.
///
/// Single-threaded by design: one contact pass runs to completion per step
/// on the physics-stepping thread.
pub struct CollisionWorld {
    pub bodies: Vec<Body>,
    fixtures: Vec<Fixture>,
    body_alive: Vec<bool>,
    fixture_alive: Vec<bool>,
    free_bodies: Vec<usize>,
    free_fixtures: Vec<usize>,
    pub contact_manager: ContactManager,
    debug_draw: Option<Box<dyn DebugDraw>>,
    pub draw_flags: DebugDrawFlags,
}

impl CollisionWorld {
    /// Creates a new, empty world with default listener and filter.
    pub fn new() -> Self {
        Self {
            bodies: Vec::new(),
            fixtures: Vec::new(),
            body_alive: Vec::new(),
            fixture_alive: Vec::new(),
            free_bodies: Vec::new(),
            free_fixtures: Vec::new(),
            contact_manager: ContactManager::new(),
            debug_draw: None,
            draw_flags: DebugDrawFlags::default(),
        }
    }

    /// Adds a body and returns its index.
    pub fn create_body(&mut self, position: Vec2, rotation: f64) -> usize {
        let body = Body::new(position, rotation);
        if let Some(index) = self.free_bodies.pop() {
            self.bodies[index] = body;
            self.body_alive[index] = true;
            index
        } else {
            self.bodies.push(body);
            self.body_alive.push(true);
            self.bodies.len() - 1
        }
    }

    /// Attaches a shape to a body and returns the fixture index.
    pub fn create_fixture(&mut self, body: usize, shape: Shape) -> usize {
        assert!(self.body_alive[body], "fixture attached to dead body");
        let fixture = Fixture::new(body, shape);
        let index = if let Some(index) = self.free_fixtures.pop() {
            self.fixtures[index] = fixture;
            self.fixture_alive[index] = true;
            index
        } else {
            self.fixtures.push(fixture);
            self.fixture_alive.push(true);
            self.fixtures.len() - 1
        };
        self.bodies[body].fixtures.push(index);
        index
    }

    /// Removes a fixture: destroys its contacts (firing `end_contact` for
    /// touching ones), detaches it from its body and frees the slot.
    pub fn destroy_fixture(&mut self, fixture: usize) {
        assert!(self.fixture_alive[fixture], "fixture destroyed twice");
        self.contact_manager
            .destroy_contacts_of_fixture(fixture, &mut self.bodies, &self.fixtures);

        let body = self.fixtures[fixture].body;
        self.bodies[body].fixtures.retain(|&f| f != fixture);
        self.fixture_alive[fixture] = false;
        self.free_fixtures.push(fixture);
        trace!(fixture, "destroyed fixture");
    }

    /// Removes a body together with its fixtures and contacts.
    pub fn destroy_body(&mut self, body: usize) {
        assert!(self.body_alive[body], "body destroyed twice");
        let fixtures = self.bodies[body].fixtures.clone();
        for fixture in fixtures {
            self.destroy_fixture(fixture);
        }
        self.body_alive[body] = false;
        self.free_bodies.push(body);
        trace!(body, "destroyed body");
    }

    pub fn body(&self, index: usize) -> &Body {
        assert!(self.body_alive[index], "body {} is not live", index);
        &self.bodies[index]
    }

    pub fn body_mut(&mut self, index: usize) -> &mut Body {
        assert!(self.body_alive[index], "body {} is not live", index);
        &mut self.bodies[index]
    }

    pub fn fixture(&self, index: usize) -> &Fixture {
        assert!(self.fixture_alive[index], "fixture {} is not live", index);
        &self.fixtures[index]
    }

    pub fn fixture_mut(&mut self, index: usize) -> &mut Fixture {
        assert!(self.fixture_alive[index], "fixture {} is not live", index);
        &mut self.fixtures[index]
    }

    /// Replaces a fixture's filter data and flags its contacts for
    /// re-evaluation on the next contact pass.
    pub fn set_filter_data(&mut self, fixture: usize, filter: Filter) {
        self.fixture_mut(fixture).filter = filter;
        self.contact_manager
            .refilter_fixture(fixture, &self.bodies, &self.fixtures);
    }

    pub fn set_contact_listener(&mut self, listener: Box<dyn ContactListener>) {
        self.contact_manager.listener = listener;
    }

    pub fn set_contact_filter(&mut self, filter: Box<dyn ContactFilter>) {
        self.contact_manager.filter = filter;
    }

    pub fn set_debug_draw(&mut self, draw: Box<dyn DebugDraw>) {
        self.debug_draw = Some(draw);
    }

    /// Runs one contact pass: finds newly overlapping fixture pairs, then
    /// updates the active contact set (creating, retiring and re-filtering
    /// contacts and firing listener events).
    pub fn update_contacts(&mut self) {
        self.find_new_contacts();
        self.contact_manager
            .collide(&mut self.bodies, &self.fixtures);
    }

    /// Scans all live fixture pairs for fat-AABB overlap and registers new
    /// candidate pairs. Stand-in for an external broad-phase index; the
    /// manager deduplicates pairs that already have a contact.
    fn find_new_contacts(&mut self) {
        let ids: Vec<usize> = (0..self.fixtures.len())
            .filter(|&i| self.fixture_alive[i])
            .collect();

        for (pos, &i) in ids.iter().enumerate() {
            for &j in ids.iter().skip(pos + 1) {
                if self.fixtures[i].body == self.fixtures[j].body {
                    continue;
                }

                let aabb_i = self
                    .fixtures[i]
                    .aabb(&self.bodies[self.fixtures[i].body].transform())
                    .extended(AABB_EXTENSION);
                let aabb_j = self
                    .fixtures[j]
                    .aabb(&self.bodies[self.fixtures[j].body].transform())
                    .extended(AABB_EXTENSION);

                if aabb_i.overlaps(&aabb_j) {
                    self.contact_manager
                        .add_pair(i, j, &mut self.bodies, &self.fixtures);
                }
            }
        }
    }

    /// Renders the debug categories selected in `draw_flags` through the
    /// registered `DebugDraw`. Joints are external to this world, so the
    /// JOINT flag is accepted but draws nothing.
    pub fn draw_debug_data(&mut self) {
        let Some(draw) = self.debug_draw.as_mut() else {
            return;
        };
        let flags = self.draw_flags;

        if flags.contains(DebugDrawFlags::SHAPE) {
            for (i, fixture) in self.fixtures.iter().enumerate() {
                if !self.fixture_alive[i] {
                    continue;
                }
                let body = &self.bodies[fixture.body];
                let color = if body.is_awake() {
                    Color::new(0.9, 0.7, 0.7)
                } else {
                    Color::new(0.6, 0.6, 0.6)
                };
                let xf = body.transform();
                match &fixture.shape {
                    Shape::Circle(circle) => {
                        let axis = xf.apply_rotation(Vec2::new(1.0, 0.0));
                        draw.draw_solid_circle(xf.position, circle.radius, axis, color);
                    }
                    Shape::Polygon(polygon) => {
                        let vertices: Vec<Vec2> =
                            polygon.vertices.iter().map(|&v| xf.apply(v)).collect();
                        draw.draw_solid_polygon(&vertices, color);
                    }
                }
            }
        }

        if flags.contains(DebugDrawFlags::AABB) {
            let color = Color::new(0.9, 0.3, 0.9);
            for (i, fixture) in self.fixtures.iter().enumerate() {
                if !self.fixture_alive[i] {
                    continue;
                }
                let aabb = fixture
                    .aabb(&self.bodies[fixture.body].transform())
                    .extended(AABB_EXTENSION);
                let corners = [
                    aabb.min,
                    Vec2::new(aabb.max.x, aabb.min.y),
                    aabb.max,
                    Vec2::new(aabb.min.x, aabb.max.y),
                ];
                draw.draw_polygon(&corners, color);
            }
        }

        if flags.contains(DebugDrawFlags::PAIR) {
            let color = Color::new(0.3, 0.9, 0.9);
            for (_, contact) in self.contact_manager.contacts() {
                let fixture_a = &self.fixtures[contact.fixture_a()];
                let fixture_b = &self.fixtures[contact.fixture_b()];
                let center_a = self.bodies[fixture_a.body].position;
                let center_b = self.bodies[fixture_b.body].position;
                draw.draw_segment(center_a, center_b, color);
            }
        }

        if flags.contains(DebugDrawFlags::CENTER_OF_MASS) {
            for (i, body) in self.bodies.iter().enumerate() {
                if !self.body_alive[i] {
                    continue;
                }
                let xf = body.transform();
                draw.draw_transform(&xf);
            }
        }
    }

    /// Slice view of the fixtures, for the external solver.
    pub fn fixtures(&self) -> &[Fixture] {
        &self.fixtures
    }
}

impl Default for CollisionWorld {
    fn default() -> Self {
        Self::new()
    }
}
