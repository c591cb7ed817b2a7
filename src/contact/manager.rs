//! Contact lifecycle management: pooled creation, graph linking, filter
//! re-evaluation and the per-step update pass.

use tracing::{debug, trace};

use crate::common::settings::AABB_EXTENSION;
use crate::contact::contact::{Contact, ContactEnd, EdgeRef};
use crate::objects::body::Body;
use crate::objects::fixture::Fixture;
use crate::world::callbacks::{
    ContactFilter, ContactListener, DefaultContactFilter, DefaultContactListener,
};

/// Owns the active contact set and the free-list pool it recycles contacts
/// through. Single-threaded: the whole contact pass for a step runs to
/// completion before the solver consumes any manifold.
pub struct ContactManager {
    contacts: Vec<Contact>,
    /// Slots available for reuse, most recently freed last.
    free: Vec<usize>,
    active_count: usize,
    pub listener: Box<dyn ContactListener>,
    pub filter: Box<dyn ContactFilter>,
}

impl ContactManager {
    pub fn new() -> Self {
        Self {
            contacts: Vec::new(),
            free: Vec::new(),
            active_count: 0,
            listener: Box::new(DefaultContactListener),
            filter: Box::new(DefaultContactFilter),
        }
    }

    /// Number of live contacts.
    pub fn contact_count(&self) -> usize {
        self.active_count
    }

    pub fn contact(&self, index: usize) -> &Contact {
        let contact = &self.contacts[index];
        assert!(!contact.is_pooled(), "contact {} is not live", index);
        contact
    }

    pub fn contact_mut(&mut self, index: usize) -> &mut Contact {
        let contact = &mut self.contacts[index];
        assert!(!contact.is_pooled(), "contact {} is not live", index);
        contact
    }

    /// Iterates the live contacts with their slot indices.
    pub fn contacts(&self) -> impl Iterator<Item = (usize, &Contact)> {
        self.contacts
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.is_pooled())
    }

    /// Handles a new candidate pair from the broad-phase. Rejects same-body
    /// pairs, pairs that already have a contact, and pairs the filter
    /// refuses; otherwise creates the contact and links it into both
    /// bodies' contact graphs. Returns the new contact's slot.
    pub fn add_pair(
        &mut self,
        fixture_a: usize,
        fixture_b: usize,
        bodies: &mut [Body],
        fixtures: &[Fixture],
    ) -> Option<usize> {
        let body_a = fixtures[fixture_a].body;
        let body_b = fixtures[fixture_b].body;

        if body_a == body_b {
            return None;
        }

        // Does a contact already exist? Walk body B's contact list.
        let mut edge_ref = bodies[body_b].contact_list;
        while let Some(er) = edge_ref {
            let contact = &self.contacts[er.contact];
            let edge = contact.edge(er.end);
            if edge.other == body_a {
                let fa = contact.fixture_a();
                let fb = contact.fixture_b();
                if (fa == fixture_a && fb == fixture_b) || (fa == fixture_b && fb == fixture_a) {
                    // A contact already exists.
                    return None;
                }
            }
            edge_ref = edge.next;
        }

        if !self
            .filter
            .should_collide(&fixtures[fixture_a], &fixtures[fixture_b])
        {
            return None;
        }

        let index = self.create(fixture_a, fixture_b, fixtures);
        self.link(index, bodies, fixtures);
        trace!(
            contact = index,
            fixture_a,
            fixture_b,
            "created contact"
        );
        Some(index)
    }

    /// Obtains a contact from the pool (resetting it) or grows the arena.
    /// Fixture order is canonicalized by shape-type rank before storage.
    fn create(&mut self, fixture_a: usize, fixture_b: usize, fixtures: &[Fixture]) -> usize {
        let (fixture_a, fixture_b, kind) = Contact::canonicalize(fixture_a, fixture_b, fixtures);
        self.active_count += 1;
        if let Some(index) = self.free.pop() {
            self.contacts[index].reset(fixture_a, fixture_b, kind, fixtures);
            index
        } else {
            self.contacts
                .push(Contact::new(fixture_a, fixture_b, kind, fixtures));
            self.contacts.len() - 1
        }
    }

    /// Links both of a fresh contact's edges at the head of the owning
    /// bodies' contact lists.
    fn link(&mut self, index: usize, bodies: &mut [Body], fixtures: &[Fixture]) {
        let body_a = fixtures[self.contacts[index].fixture_a()].body;
        let body_b = fixtures[self.contacts[index].fixture_b()].body;

        for (end, owner, other) in [
            (ContactEnd::A, body_a, body_b),
            (ContactEnd::B, body_b, body_a),
        ] {
            let head = bodies[owner].contact_list;
            {
                let edge = self.contacts[index].edge_mut(end);
                edge.other = other;
                edge.prev = None;
                edge.next = head;
            }
            if let Some(head_ref) = head {
                self.contacts[head_ref.contact].edge_mut(head_ref.end).prev =
                    Some(EdgeRef { contact: index, end });
            }
            bodies[owner].contact_list = Some(EdgeRef { contact: index, end });
        }
    }

    /// Destroys a contact: fires `end_contact` if it was touching, unlinks
    /// both graph edges in O(1), and returns the slot to the pool. The
    /// caller guarantees the contact is live; double-destroy is a contract
    /// violation caught by the pooled assertion.
    pub fn destroy(&mut self, index: usize, bodies: &mut [Body], fixtures: &[Fixture]) {
        let contact = &self.contacts[index];
        assert!(!contact.is_pooled(), "contact {} destroyed twice", index);

        if contact.is_touching() {
            self.listener.end_contact(&self.contacts[index]);
        }

        for end in [ContactEnd::A, ContactEnd::B] {
            let owner = fixtures[self.contacts[index].fixture_at(end)].body;
            let edge = *self.contacts[index].edge(end);

            match edge.prev {
                Some(prev) => self.contacts[prev.contact].edge_mut(prev.end).next = edge.next,
                None => bodies[owner].contact_list = edge.next,
            }
            if let Some(next) = edge.next {
                self.contacts[next.contact].edge_mut(next.end).prev = edge.prev;
            }
        }

        self.contacts[index].clear_for_pool();
        self.free.push(index);
        self.active_count -= 1;
        trace!(contact = index, "destroyed contact");
    }

    /// The per-step narrow-phase pass over the active contact set:
    /// re-filters flagged contacts, retires pairs whose fat AABBs stopped
    /// overlapping, skips pairs where both bodies sleep, and updates the
    /// rest.
    pub fn collide(&mut self, bodies: &mut [Body], fixtures: &[Fixture]) {
        for index in 0..self.contacts.len() {
            if self.contacts[index].is_pooled() {
                continue;
            }

            let fixture_a = self.contacts[index].fixture_a();
            let fixture_b = self.contacts[index].fixture_b();
            let body_a = fixtures[fixture_a].body;
            let body_b = fixtures[fixture_b].body;

            if self.contacts[index].needs_filtering() {
                if !self
                    .filter
                    .should_collide(&fixtures[fixture_a], &fixtures[fixture_b])
                {
                    debug!(contact = index, "refilter rejected contact");
                    self.destroy(index, bodies, fixtures);
                    continue;
                }
                self.contacts[index].clear_filter_flag();
            }

            // At least one body must be awake.
            if !bodies[body_a].is_awake() && !bodies[body_b].is_awake() {
                continue;
            }

            let aabb_a = fixtures[fixture_a]
                .aabb(&bodies[body_a].transform())
                .extended(AABB_EXTENSION);
            let aabb_b = fixtures[fixture_b]
                .aabb(&bodies[body_b].transform())
                .extended(AABB_EXTENSION);

            // The broad-phase pair stopped overlapping: retire the contact.
            if !aabb_a.overlaps(&aabb_b) {
                self.destroy(index, bodies, fixtures);
                continue;
            }

            let listener = self.listener.as_mut();
            self.contacts[index].update(bodies, fixtures, listener);
        }
    }

    /// Flags every contact attached to `fixture` for filter re-evaluation
    /// on the next pass.
    pub fn refilter_fixture(&mut self, fixture: usize, bodies: &[Body], fixtures: &[Fixture]) {
        let body = fixtures[fixture].body;
        let mut edge_ref = bodies[body].contact_list;
        while let Some(er) = edge_ref {
            let next = self.contacts[er.contact].edge(er.end).next;
            let contact = &mut self.contacts[er.contact];
            if contact.fixture_a() == fixture || contact.fixture_b() == fixture {
                contact.flag_for_filtering();
            }
            edge_ref = next;
        }
    }

    /// Destroys every contact attached to `fixture`; used when the fixture
    /// or its body is removed.
    pub fn destroy_contacts_of_fixture(
        &mut self,
        fixture: usize,
        bodies: &mut [Body],
        fixtures: &[Fixture],
    ) {
        let body = fixtures[fixture].body;
        let mut edge_ref = bodies[body].contact_list;
        while let Some(er) = edge_ref {
            let next = self.contacts[er.contact].edge(er.end).next;
            let contact = &self.contacts[er.contact];
            if contact.fixture_a() == fixture || contact.fixture_b() == fixture {
                self.destroy(er.contact, bodies, fixtures);
            }
            edge_ref = next;
        }
    }
}

impl Default for ContactManager {
    fn default() -> Self {
        Self::new()
    }
}
