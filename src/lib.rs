pub mod collision;
pub mod common;
pub mod contact;
pub mod math;
pub mod objects;
pub mod shapes;
pub mod world;

// Re-export key types for easier use
pub use collision::{Manifold, WorldManifold};
pub use common::Material;
pub use contact::{Contact, ContactManager};
pub use math::vec2::Vec2;
pub use math::{Sweep, Transform};
pub use objects::{Body, Filter, Fixture};
pub use shapes::{Circle, Polygon, Shape};
pub use world::{CollisionWorld, ContactFilter, ContactListener, DebugDraw};
