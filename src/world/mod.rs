pub mod callbacks;
pub mod collision_world;
pub mod debug_draw;

pub use callbacks::{
    ContactFilter, ContactImpulse, ContactListener, DefaultContactFilter, DefaultContactListener,
};
pub use collision_world::CollisionWorld;
pub use debug_draw::{Color, DebugDraw, DebugDrawFlags};
