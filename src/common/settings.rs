//! Shared tuning constants.

/// Maximum number of contact points in a manifold.
pub const MAX_MANIFOLD_POINTS: usize = 2;

/// A small length used as a collision tolerance. Chosen to be numerically
/// significant but visually insignificant (in meters).
pub const LINEAR_SLOP: f64 = 0.005;

/// The radius of the polygon "skin". Keeps polygon manifolds stable while
/// faces slide along each other.
pub const POLYGON_RADIUS: f64 = 2.0 * LINEAR_SLOP;

/// Margin added to fixture AABBs so contacts survive small movements
/// without being retired and re-created every step.
pub const AABB_EXTENSION: f64 = 0.1;
