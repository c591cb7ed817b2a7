//! Narrow-phase collision routines.
//!
//! Each routine is a pure function over two shapes and their transforms,
//! returning a manifold whose `point_count` is zero when the shapes are
//! separated. Contact points carry feature-derived ids so the same physical
//! point keeps the same id across consecutive steps.

use super::manifold::{ContactFeature, FeatureKind, Manifold, ManifoldKind};
use crate::common::settings::{LINEAR_SLOP, POLYGON_RADIUS};
use crate::math::transform::Transform;
use crate::math::vec2::Vec2;
use crate::shapes::{Circle, Polygon};

/// A vertex being clipped against the reference edge, together with the
/// feature id of whatever produced it.
#[derive(Debug, Clone, Copy, Default)]
struct ClipVertex {
    v: Vec2,
    id: ContactFeature,
}

/// Computes the collision manifold between two circles.
pub fn collide_circles(
    circle_a: &Circle,
    xf_a: &Transform,
    circle_b: &Circle,
    xf_b: &Transform,
) -> Manifold {
    let mut manifold = Manifold::default();

    let p_a = xf_a.apply(Vec2::ZERO);
    let p_b = xf_b.apply(Vec2::ZERO);

    let dist_sq = p_a.distance_squared(p_b);
    let radius = circle_a.radius + circle_b.radius;
    if dist_sq > radius * radius {
        return manifold;
    }

    manifold.kind = ManifoldKind::Circles;
    manifold.local_point = Vec2::ZERO;
    manifold.local_normal = Vec2::ZERO;
    manifold.point_count = 1;
    manifold.points[0].local_point = Vec2::ZERO;
    manifold.points[0].id = ContactFeature::default();
    manifold
}

/// Computes the collision manifold between a polygon (A) and a circle (B).
pub fn collide_polygon_and_circle(
    polygon_a: &Polygon,
    xf_a: &Transform,
    circle_b: &Circle,
    xf_b: &Transform,
) -> Manifold {
    let mut manifold = Manifold::default();

    // Circle center in the polygon's frame
    let c = xf_b.apply(Vec2::ZERO);
    let c_local = xf_a.apply_inverse(c);

    let radius = POLYGON_RADIUS + circle_b.radius;
    let count = polygon_a.vertex_count();

    // Find the face of maximum separation from the circle center
    let mut normal_index = 0;
    let mut separation = f64::NEG_INFINITY;
    for i in 0..count {
        let s = polygon_a.normals[i].dot(c_local - polygon_a.vertices[i]);
        if s > radius {
            return manifold;
        }
        if s > separation {
            separation = s;
            normal_index = i;
        }
    }

    let vert_index1 = normal_index;
    let vert_index2 = (vert_index1 + 1) % count;
    let v1 = polygon_a.vertices[vert_index1];
    let v2 = polygon_a.vertices[vert_index2];

    // Center inside the polygon
    if separation < f64::EPSILON {
        manifold.point_count = 1;
        manifold.kind = ManifoldKind::FaceA;
        manifold.local_normal = polygon_a.normals[normal_index];
        manifold.local_point = (v1 + v2) * 0.5;
        manifold.points[0].local_point = Vec2::ZERO;
        manifold.points[0].id = ContactFeature::default();
        return manifold;
    }

    // Which vertex region is the center in?
    let u1 = (c_local - v1).dot(v2 - v1);
    let u2 = (c_local - v2).dot(v1 - v2);
    if u1 <= 0.0 {
        if c_local.distance_squared(v1) > radius * radius {
            return manifold;
        }
        manifold.point_count = 1;
        manifold.kind = ManifoldKind::FaceA;
        manifold.local_normal = (c_local - v1).normalize();
        manifold.local_point = v1;
    } else if u2 <= 0.0 {
        if c_local.distance_squared(v2) > radius * radius {
            return manifold;
        }
        manifold.point_count = 1;
        manifold.kind = ManifoldKind::FaceA;
        manifold.local_normal = (c_local - v2).normalize();
        manifold.local_point = v2;
    } else {
        let face_center = (v1 + v2) * 0.5;
        let s = (c_local - face_center).dot(polygon_a.normals[vert_index1]);
        if s > radius {
            return manifold;
        }
        manifold.point_count = 1;
        manifold.kind = ManifoldKind::FaceA;
        manifold.local_normal = polygon_a.normals[vert_index1];
        manifold.local_point = face_center;
    }

    manifold.points[0].local_point = Vec2::ZERO;
    manifold.points[0].id = ContactFeature::default();
    manifold
}

/// Finds the edge of `poly1` with the maximum separation against `poly2`.
/// Returns `(edge index, separation)`.
fn find_max_separation(
    poly1: &Polygon,
    xf1: &Transform,
    poly2: &Polygon,
    xf2: &Transform,
) -> (usize, f64) {
    let rotation = xf1.rotation - xf2.rotation;

    let mut best_index = 0;
    let mut max_separation = f64::NEG_INFINITY;
    for i in 0..poly1.vertex_count() {
        // Edge normal and vertex of poly1 in poly2's frame
        let n = poly1.normals[i].rotate(rotation);
        let v1 = xf2.apply_inverse(xf1.apply(poly1.vertices[i]));

        // Deepest poly2 vertex along that normal
        let mut si = f64::INFINITY;
        for &v2 in &poly2.vertices {
            si = si.min(n.dot(v2 - v1));
        }

        if si > max_separation {
            max_separation = si;
            best_index = i;
        }
    }
    (best_index, max_separation)
}

/// Finds the edge on `poly2` most anti-parallel to reference edge `edge1` of
/// `poly1`, returning its two endpoints (world space) with feature ids.
fn find_incident_edge(
    poly1: &Polygon,
    xf1: &Transform,
    edge1: usize,
    poly2: &Polygon,
    xf2: &Transform,
) -> [ClipVertex; 2] {
    let count2 = poly2.vertex_count();

    // Reference normal in poly2's frame
    let normal1 = poly1.normals[edge1].rotate(xf1.rotation - xf2.rotation);

    let mut index = 0;
    let mut min_dot = f64::INFINITY;
    for (i, &n) in poly2.normals.iter().enumerate() {
        let dot = normal1.dot(n);
        if dot < min_dot {
            min_dot = dot;
            index = i;
        }
    }

    let i1 = index;
    let i2 = (i1 + 1) % count2;

    [
        ClipVertex {
            v: xf2.apply(poly2.vertices[i1]),
            id: ContactFeature::new(edge1 as u8, i1 as u8, FeatureKind::Face, FeatureKind::Vertex),
        },
        ClipVertex {
            v: xf2.apply(poly2.vertices[i2]),
            id: ContactFeature::new(edge1 as u8, i2 as u8, FeatureKind::Face, FeatureKind::Vertex),
        },
    ]
}

/// Sutherland-Hodgman clipping of a two-vertex segment against the half
/// plane `dot(normal, p) - offset <= 0`. A vertex created by the clip takes
/// its identity from the clipping edge (`vertex_index_a`).
fn clip_segment_to_line(
    v_in: &[ClipVertex; 2],
    normal: Vec2,
    offset: f64,
    vertex_index_a: usize,
) -> ([ClipVertex; 2], usize) {
    let mut v_out = [ClipVertex::default(); 2];
    let mut num_out = 0;

    let distance0 = normal.dot(v_in[0].v) - offset;
    let distance1 = normal.dot(v_in[1].v) - offset;

    if distance0 <= 0.0 {
        v_out[num_out] = v_in[0];
        num_out += 1;
    }
    if distance1 <= 0.0 {
        v_out[num_out] = v_in[1];
        num_out += 1;
    }

    // Segment straddles the plane: emit the intersection vertex
    if distance0 * distance1 < 0.0 {
        let interp = distance0 / (distance0 - distance1);
        v_out[num_out].v = v_in[0].v + (v_in[1].v - v_in[0].v) * interp;
        v_out[num_out].id = ContactFeature::new(
            vertex_index_a as u8,
            v_in[0].id.index_b,
            FeatureKind::Vertex,
            FeatureKind::Face,
        );
        num_out += 1;
    }

    (v_out, num_out)
}

/// Computes the collision manifold between two polygons using SAT and
/// reference-edge clipping.
pub fn collide_polygons(
    polygon_a: &Polygon,
    xf_a: &Transform,
    polygon_b: &Polygon,
    xf_b: &Transform,
) -> Manifold {
    let mut manifold = Manifold::default();
    let total_radius = 2.0 * POLYGON_RADIUS;

    let (edge_a, separation_a) = find_max_separation(polygon_a, xf_a, polygon_b, xf_b);
    if separation_a > total_radius {
        return manifold;
    }

    let (edge_b, separation_b) = find_max_separation(polygon_b, xf_b, polygon_a, xf_a);
    if separation_b > total_radius {
        return manifold;
    }

    // Prefer face A unless face B is meaningfully deeper, so the reference
    // face does not flap between steps and ids stay stable.
    let k_tol = 0.1 * LINEAR_SLOP;
    let (poly1, xf1, poly2, xf2, edge1, flip) = if separation_b > separation_a + k_tol {
        manifold.kind = ManifoldKind::FaceB;
        (polygon_b, xf_b, polygon_a, xf_a, edge_b, true)
    } else {
        manifold.kind = ManifoldKind::FaceA;
        (polygon_a, xf_a, polygon_b, xf_b, edge_a, false)
    };

    let incident_edge = find_incident_edge(poly1, xf1, edge1, poly2, xf2);

    let count1 = poly1.vertex_count();
    let iv1 = edge1;
    let iv2 = (edge1 + 1) % count1;
    let mut v11 = poly1.vertices[iv1];
    let mut v12 = poly1.vertices[iv2];

    let local_tangent = (v12 - v11).normalize();
    let local_normal = local_tangent.cross_vs(1.0);
    let plane_point = (v11 + v12) * 0.5;

    let tangent = xf1.apply_rotation(local_tangent);
    let normal = tangent.cross_vs(1.0);

    v11 = xf1.apply(v11);
    v12 = xf1.apply(v12);

    let front_offset = normal.dot(v11);
    let side_offset1 = -tangent.dot(v11) + total_radius;
    let side_offset2 = tangent.dot(v12) + total_radius;

    // Clip the incident edge against the reference edge's side planes
    let (clip_points1, np) = clip_segment_to_line(&incident_edge, -tangent, side_offset1, iv1);
    if np < 2 {
        return manifold;
    }
    let (clip_points2, np) = clip_segment_to_line(&clip_points1, tangent, side_offset2, iv2);
    if np < 2 {
        return manifold;
    }

    manifold.local_normal = local_normal;
    manifold.local_point = plane_point;

    let mut point_count = 0;
    for clip in &clip_points2 {
        let separation = normal.dot(clip.v) - front_offset;
        if separation <= total_radius {
            let cp = &mut manifold.points[point_count];
            cp.local_point = xf2.apply_inverse(clip.v);
            cp.id = if flip { clip.id.swapped() } else { clip.id };
            point_count += 1;
        }
    }
    manifold.point_count = point_count;
    manifold
}

#[cfg(test)]
mod tests {
    use super::*;
    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_collide_circles_overlapping() {
        let a = Circle::new(1.0);
        let b = Circle::new(1.0);
        let xf_a = Transform::identity();
        let xf_b = Transform::new(Vec2::new(1.5, 0.0), 0.0);

        let manifold = collide_circles(&a, &xf_a, &b, &xf_b);
        assert_eq!(manifold.point_count, 1);
        assert_eq!(manifold.kind, ManifoldKind::Circles);
        assert_eq!(manifold.points[0].id, ContactFeature::default());
        assert_eq!(manifold.points[0].normal_impulse, 0.0);
    }

    #[test]
    fn test_collide_circles_separated() {
        let a = Circle::new(1.0);
        let b = Circle::new(1.0);
        let xf_a = Transform::identity();
        let xf_b = Transform::new(Vec2::new(3.0, 0.0), 0.0);

        let manifold = collide_circles(&a, &xf_a, &b, &xf_b);
        assert_eq!(manifold.point_count, 0);
    }

    #[test]
    fn test_collide_circles_exact_touch_counts() {
        let a = Circle::new(1.0);
        let b = Circle::new(1.0);
        let xf_a = Transform::identity();
        let xf_b = Transform::new(Vec2::new(2.0, 0.0), 0.0);

        let manifold = collide_circles(&a, &xf_a, &b, &xf_b);
        assert_eq!(manifold.point_count, 1);
    }

    #[test]
    fn test_collide_polygon_circle_face_region() {
        let polygon = Polygon::new_box(0.5, 0.5);
        let circle = Circle::new(0.5);
        let xf_a = Transform::identity();
        // Circle to the right, overlapping the right face
        let xf_b = Transform::new(Vec2::new(0.8, 0.0), 0.0);

        let manifold = collide_polygon_and_circle(&polygon, &xf_a, &circle, &xf_b);
        assert_eq!(manifold.point_count, 1);
        assert_eq!(manifold.kind, ManifoldKind::FaceA);
        // Right face normal
        assert!((manifold.local_normal.x - 1.0).abs() < EPSILON);
        assert!(manifold.local_normal.y.abs() < EPSILON);
    }

    #[test]
    fn test_collide_polygon_circle_center_inside() {
        let polygon = Polygon::new_box(1.0, 1.0);
        let circle = Circle::new(0.25);
        let xf_a = Transform::identity();
        let xf_b = Transform::new(Vec2::new(0.1, 0.0), 0.0);

        let manifold = collide_polygon_and_circle(&polygon, &xf_a, &circle, &xf_b);
        assert_eq!(manifold.point_count, 1);
    }

    #[test]
    fn test_collide_polygon_circle_vertex_region() {
        let polygon = Polygon::new_box(0.5, 0.5);
        let circle = Circle::new(0.5);
        let xf_a = Transform::identity();
        // Circle beyond the top-right corner along the diagonal, overlapping
        let corner = Vec2::new(0.5, 0.5);
        let dir = corner.normalize();
        let xf_b = Transform::new(corner + dir * 0.4, 0.0);

        let manifold = collide_polygon_and_circle(&polygon, &xf_a, &circle, &xf_b);
        assert_eq!(manifold.point_count, 1);
        // Normal points from the corner towards the circle center
        assert!((manifold.local_normal.x - dir.x).abs() < 1e-6);
        assert!((manifold.local_normal.y - dir.y).abs() < 1e-6);
    }

    #[test]
    fn test_collide_polygon_circle_separated() {
        let polygon = Polygon::new_box(0.5, 0.5);
        let circle = Circle::new(0.5);
        let xf_a = Transform::identity();
        let xf_b = Transform::new(Vec2::new(3.0, 0.0), 0.0);

        let manifold = collide_polygon_and_circle(&polygon, &xf_a, &circle, &xf_b);
        assert_eq!(manifold.point_count, 0);
    }

    #[test]
    fn test_collide_polygons_overlapping_boxes() {
        let a = Polygon::new_box(0.5, 0.5);
        let b = Polygon::new_box(0.5, 0.5);
        let xf_a = Transform::identity();
        let xf_b = Transform::new(Vec2::new(0.8, 0.0), 0.0);

        let manifold = collide_polygons(&a, &xf_a, &b, &xf_b);
        assert_eq!(manifold.point_count, 2);
        // Reference face is A's right face
        assert_eq!(manifold.kind, ManifoldKind::FaceA);
        assert!((manifold.local_normal.x - 1.0).abs() < EPSILON);
        // The two points carry distinct ids
        assert_ne!(manifold.points[0].id.key(), manifold.points[1].id.key());
    }

    #[test]
    fn test_collide_polygons_separated() {
        let a = Polygon::new_box(0.5, 0.5);
        let b = Polygon::new_box(0.5, 0.5);
        let xf_a = Transform::identity();
        let xf_b = Transform::new(Vec2::new(2.0, 0.0), 0.0);

        let manifold = collide_polygons(&a, &xf_a, &b, &xf_b);
        assert_eq!(manifold.point_count, 0);
    }

    #[test]
    fn test_collide_polygons_ids_stable_under_small_motion() {
        // The same physical contact must keep the same feature ids when the
        // transforms move slightly, or warm-starting degenerates.
        let a = Polygon::new_box(0.5, 0.5);
        let b = Polygon::new_box(0.5, 0.5);
        let xf_a = Transform::identity();
        let xf_b0 = Transform::new(Vec2::new(0.8, 0.05), 0.0);
        let xf_b1 = Transform::new(Vec2::new(0.805, 0.052), 0.0);

        let m0 = collide_polygons(&a, &xf_a, &b, &xf_b0);
        let m1 = collide_polygons(&a, &xf_a, &b, &xf_b1);
        assert_eq!(m0.point_count, 2);
        assert_eq!(m1.point_count, 2);
        for i in 0..2 {
            assert_eq!(m0.points[i].id.key(), m1.points[i].id.key());
        }
    }

    #[test]
    fn test_collide_polygons_flip_swaps_feature_ids() {
        // A diamond (box rotated 45 degrees) pokes its corner into the tall
        // box B's right face. The deepest face lives on B, so the manifold
        // flips; after the id swap, each id's B side names B's face and its
        // A side names the diamond's vertex.
        let a = Polygon::new_box(0.5, 0.5);
        let b = Polygon::new_box(0.5, 2.0);
        let xf_a = Transform::new(Vec2::ZERO, std::f64::consts::FRAC_PI_4);
        let xf_b = Transform::new(Vec2::new(-1.0, 0.0), 0.0);

        let manifold = collide_polygons(&a, &xf_a, &b, &xf_b);
        assert_eq!(manifold.kind, ManifoldKind::FaceB);
        assert!(manifold.point_count >= 1);
        for i in 0..manifold.point_count {
            let id = manifold.points[i].id;
            assert_eq!(id.kind_a, FeatureKind::Vertex);
            assert_eq!(id.kind_b, FeatureKind::Face);
        }
    }

    #[test]
    fn test_collide_polygons_rotated() {
        // A small box dropped on a wide platform at a slight angle still
        // produces a two-point face manifold after clipping.
        let platform = Polygon::new_box(5.0, 0.5);
        let b = Polygon::new_box(0.5, 0.5);
        let xf_a = Transform::identity();
        let xf_b = Transform::new(Vec2::new(0.0, 0.95), 0.02);

        let manifold = collide_polygons(&platform, &xf_a, &b, &xf_b);
        assert!(manifold.point_count > 0);
    }
}
