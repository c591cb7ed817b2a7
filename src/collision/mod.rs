pub mod aabb;
pub mod detection;
pub mod manifold;

pub use aabb::{test_overlap, AABB};
pub use detection::{collide_circles, collide_polygon_and_circle, collide_polygons};
pub use manifold::{
    ContactFeature, FeatureKind, Manifold, ManifoldKind, ManifoldPoint, WorldManifold,
};
