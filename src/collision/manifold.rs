use crate::common::settings::MAX_MANIFOLD_POINTS;
use crate::math::transform::Transform;
use crate::math::vec2::Vec2;

/// The kind of geometric feature a contact point was generated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FeatureKind {
    #[default]
    Vertex = 0,
    Face = 1,
}

/// Identifies a contact point by the pair of shape features that produced
/// it. The same physical contact point keeps the same feature pairing across
/// small transform changes, which is what makes impulse warm-starting work:
/// matching is by exact key equality, never by position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ContactFeature {
    /// Feature index on shape A (vertex or edge index).
    pub index_a: u8,
    /// Feature index on shape B (vertex or edge index).
    pub index_b: u8,
    pub kind_a: FeatureKind,
    pub kind_b: FeatureKind,
}

impl ContactFeature {
    pub fn new(index_a: u8, index_b: u8, kind_a: FeatureKind, kind_b: FeatureKind) -> Self {
        Self {
            index_a,
            index_b,
            kind_a,
            kind_b,
        }
    }

    /// Packs the feature quadruple into a single comparable key.
    pub fn key(&self) -> u32 {
        (self.index_a as u32)
            | (self.index_b as u32) << 8
            | (self.kind_a as u32) << 16
            | (self.kind_b as u32) << 24
    }

    /// Returns the id with the A and B roles exchanged. Applied when the
    /// narrow phase evaluated the shapes in flipped order.
    pub fn swapped(&self) -> Self {
        Self {
            index_a: self.index_b,
            index_b: self.index_a,
            kind_a: self.kind_b,
            kind_b: self.kind_a,
        }
    }
}

/// How the manifold's local data is anchored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ManifoldKind {
    /// Circle-circle: `local_point` is circle A's center, each point's
    /// `local_point` is circle B's center.
    #[default]
    Circles,
    /// `local_point`/`local_normal` live on face A; points live on shape B.
    FaceA,
    /// `local_point`/`local_normal` live on face B; points live on shape A.
    FaceB,
}

/// A single contact point with its accumulated solver impulses and stable
/// identity.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ManifoldPoint {
    /// Usage depends on the manifold kind (see `ManifoldKind`).
    pub local_point: Vec2,
    /// Accumulated impulse along the contact normal.
    pub normal_impulse: f64,
    /// Accumulated impulse along the contact tangent (friction).
    pub tangent_impulse: f64,
    /// Stable identity used to match points across steps.
    pub id: ContactFeature,
}

/// The contact region between two shapes, in shape-local coordinates so it
/// stays valid while the bodies move. Holds at most `MAX_MANIFOLD_POINTS`
/// points.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Manifold {
    pub points: [ManifoldPoint; MAX_MANIFOLD_POINTS],
    /// Usage depends on the manifold kind; undefined for `Circles`.
    pub local_normal: Vec2,
    /// Usage depends on the manifold kind.
    pub local_point: Vec2,
    pub kind: ManifoldKind,
    pub point_count: usize,
}

/// World-space view of a manifold, computed on demand for the solver and
/// listeners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldManifold {
    /// World contact normal, pointing from shape A to shape B.
    pub normal: Vec2,
    /// World contact points (midway between the two surfaces).
    pub points: [Vec2; MAX_MANIFOLD_POINTS],
}

impl WorldManifold {
    /// Projects a manifold to world space using the current transforms and
    /// the shapes' skin radii.
    pub fn new(
        manifold: &Manifold,
        xf_a: &Transform,
        radius_a: f64,
        xf_b: &Transform,
        radius_b: f64,
    ) -> Self {
        let mut normal = Vec2::ZERO;
        let mut points = [Vec2::ZERO; MAX_MANIFOLD_POINTS];

        if manifold.point_count == 0 {
            return Self { normal, points };
        }

        match manifold.kind {
            ManifoldKind::Circles => {
                let point_a = xf_a.apply(manifold.local_point);
                let point_b = xf_b.apply(manifold.points[0].local_point);
                normal = Vec2::new(1.0, 0.0);
                if point_a.distance_squared(point_b) > f64::EPSILON * f64::EPSILON {
                    normal = (point_b - point_a).normalize();
                }
                let c_a = point_a + normal * radius_a;
                let c_b = point_b - normal * radius_b;
                points[0] = (c_a + c_b) * 0.5;
            }
            ManifoldKind::FaceA => {
                normal = xf_a.apply_rotation(manifold.local_normal);
                let plane_point = xf_a.apply(manifold.local_point);

                for i in 0..manifold.point_count {
                    let clip_point = xf_b.apply(manifold.points[i].local_point);
                    let c_a =
                        clip_point + normal * (radius_a - (clip_point - plane_point).dot(normal));
                    let c_b = clip_point - normal * radius_b;
                    points[i] = (c_a + c_b) * 0.5;
                }
            }
            ManifoldKind::FaceB => {
                normal = xf_b.apply_rotation(manifold.local_normal);
                let plane_point = xf_b.apply(manifold.local_point);

                for i in 0..manifold.point_count {
                    let clip_point = xf_a.apply(manifold.points[i].local_point);
                    let c_b =
                        clip_point + normal * (radius_b - (clip_point - plane_point).dot(normal));
                    let c_a = clip_point - normal * radius_a;
                    points[i] = (c_a + c_b) * 0.5;
                }

                // Ensure the normal points from A to B
                normal = -normal;
            }
        }

        Self { normal, points }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    const EPSILON: f64 = 1e-12;

    #[test]
    fn test_feature_key_roundtrip() {
        let id = ContactFeature::new(3, 7, FeatureKind::Face, FeatureKind::Vertex);
        let same = ContactFeature::new(3, 7, FeatureKind::Face, FeatureKind::Vertex);
        let other = ContactFeature::new(7, 3, FeatureKind::Vertex, FeatureKind::Face);
        assert_eq!(id.key(), same.key());
        assert_eq!(id, same);
        assert_ne!(id.key(), other.key());
        assert_eq!(id.swapped(), other);
        assert_eq!(id.swapped().swapped(), id);
    }

    #[test]
    fn test_feature_key_distinguishes_kind() {
        let vertex = ContactFeature::new(1, 1, FeatureKind::Vertex, FeatureKind::Vertex);
        let face = ContactFeature::new(1, 1, FeatureKind::Face, FeatureKind::Vertex);
        assert_ne!(vertex.key(), face.key());
    }

    #[test]
    fn test_world_manifold_empty() {
        let manifold = Manifold::default();
        let wm = WorldManifold::new(
            &manifold,
            &Transform::identity(),
            1.0,
            &Transform::identity(),
            1.0,
        );
        assert_eq!(wm.normal, Vec2::ZERO);
    }

    #[test]
    fn test_world_manifold_circles() {
        // Two unit circles, centers 1.5 apart on the x axis
        let mut manifold = Manifold {
            kind: ManifoldKind::Circles,
            local_point: Vec2::ZERO,
            point_count: 1,
            ..Default::default()
        };
        manifold.points[0].local_point = Vec2::ZERO;

        let xf_a = Transform::identity();
        let xf_b = Transform::new(Vec2::new(1.5, 0.0), 0.0);
        let wm = WorldManifold::new(&manifold, &xf_a, 1.0, &xf_b, 1.0);

        assert!((wm.normal.x - 1.0).abs() < EPSILON);
        assert!(wm.normal.y.abs() < EPSILON);
        // Surface of A at x=1.0, surface of B at x=0.5, midpoint at 0.75
        assert!((wm.points[0].x - 0.75).abs() < EPSILON);
        assert!(wm.points[0].y.abs() < EPSILON);
    }

    #[test]
    fn test_world_manifold_coincident_circles_fallback_normal() {
        let mut manifold = Manifold {
            kind: ManifoldKind::Circles,
            local_point: Vec2::ZERO,
            point_count: 1,
            ..Default::default()
        };
        manifold.points[0].local_point = Vec2::ZERO;

        let xf = Transform::identity();
        let wm = WorldManifold::new(&manifold, &xf, 1.0, &xf, 1.0);
        assert_eq!(wm.normal, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_world_manifold_face_b_normal_points_a_to_b() {
        // A face on shape B facing -x, shape A to the left of B
        let mut manifold = Manifold {
            kind: ManifoldKind::FaceB,
            local_normal: Vec2::new(-1.0, 0.0),
            local_point: Vec2::new(-0.5, 0.0),
            point_count: 1,
            ..Default::default()
        };
        manifold.points[0].local_point = Vec2::new(0.5, 0.0);

        let xf_a = Transform::identity();
        let xf_b = Transform::new(Vec2::new(1.0, 0.0), 0.0);
        let wm = WorldManifold::new(&manifold, &xf_a, 0.0, &xf_b, 0.0);

        // Face normal on B faces -x; reported normal must face from A to B
        assert!((wm.normal.x - 1.0).abs() < EPSILON);
    }
}
