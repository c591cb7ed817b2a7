use crate::math::vec2::Vec2;
use thiserror::Error;

/// Errors raised when constructing a shape from user-supplied geometry.
#[derive(Debug, Error, PartialEq)]
pub enum ShapeError {
    #[error("polygon needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),
    #[error("polygon edge {0} is degenerate (zero length)")]
    DegenerateEdge(usize),
    #[error("polygon is not convex or not counter-clockwise at vertex {0}")]
    NotConvex(usize),
}

/// A convex polygon defined by its vertices in local space, ordered
/// counter-clockwise, with precomputed outward edge normals.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub vertices: Vec<Vec2>,
    pub normals: Vec<Vec2>,
}

impl Polygon {
    /// Creates a new polygon from a counter-clockwise vertex list. The
    /// vertex winding and convexity are validated so the narrow phase can
    /// rely on outward normals.
    pub fn new(vertices: Vec<Vec2>) -> Result<Self, ShapeError> {
        let n = vertices.len();
        if n < 3 {
            return Err(ShapeError::TooFewVertices(n));
        }

        let mut normals = Vec::with_capacity(n);
        for i in 0..n {
            let v1 = vertices[i];
            let v2 = vertices[(i + 1) % n];
            let edge = v2 - v1;
            if edge.magnitude_squared() < 1e-18 {
                return Err(ShapeError::DegenerateEdge(i));
            }
            // Outward normal for CCW winding
            normals.push(Vec2::new(edge.y, -edge.x).normalize());
        }

        // Every vertex must lie on the inner side of every edge plane
        for i in 0..n {
            let v1 = vertices[i];
            let v2 = vertices[(i + 1) % n];
            let edge = v2 - v1;
            for (j, &v) in vertices.iter().enumerate() {
                if j == i || j == (i + 1) % n {
                    continue;
                }
                if edge.cross(v - v1) <= 0.0 {
                    return Err(ShapeError::NotConvex(i));
                }
            }
        }

        Ok(Polygon { vertices, normals })
    }

    /// Creates an axis-aligned box centered on the local origin.
    pub fn new_box(half_width: f64, half_height: f64) -> Self {
        let vertices = vec![
            Vec2::new(-half_width, -half_height),
            Vec2::new(half_width, -half_height),
            Vec2::new(half_width, half_height),
            Vec2::new(-half_width, half_height),
        ];
        let normals = vec![
            Vec2::new(0.0, -1.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(-1.0, 0.0),
        ];
        Polygon { vertices, normals }
    }

    /// Number of vertices (== number of edges).
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Calculates the centroid (center of mass for uniform density) of the
    /// polygon.
    pub fn centroid(&self) -> Vec2 {
        let n = self.vertices.len();
        let mut centroid = Vec2::ZERO;
        let mut signed_area_sum = 0.0;
        let origin = self.vertices[0];

        for i in 1..(n - 1) {
            let v1 = origin;
            let v2 = self.vertices[i];
            let v3 = self.vertices[i + 1];

            let triangle_signed_area = (v2 - v1).cross(v3 - v1) / 2.0;
            signed_area_sum += triangle_signed_area;
            centroid += (v1 + v2 + v3) / 3.0 * triangle_signed_area;
        }

        if signed_area_sum.abs() < 1e-10 {
            // Degenerate polygon, fall back to the vertex average
            let mut avg = Vec2::ZERO;
            for v in &self.vertices {
                avg += *v;
            }
            avg / (n as f64)
        } else {
            centroid / signed_area_sum
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_polygon_new() {
        let vertices = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(0.0, 1.0),
        ];
        let polygon = Polygon::new(vertices).unwrap();
        assert_eq!(polygon.vertex_count(), 3);
        assert_eq!(polygon.normals.len(), 3);
    }

    #[test]
    fn test_polygon_new_too_few_vertices() {
        let vertices = vec![Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0)];
        assert_eq!(Polygon::new(vertices), Err(ShapeError::TooFewVertices(2)));
    }

    #[test]
    fn test_polygon_new_rejects_clockwise_winding() {
        // Same triangle as above but wound clockwise
        let vertices = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(1.0, 0.0),
        ];
        assert!(matches!(Polygon::new(vertices), Err(ShapeError::NotConvex(_))));
    }

    #[test]
    fn test_polygon_new_rejects_degenerate_edge() {
        let vertices = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(0.0, 1.0),
        ];
        assert_eq!(Polygon::new(vertices), Err(ShapeError::DegenerateEdge(0)));
    }

    #[test]
    fn test_polygon_new_rejects_concave() {
        let vertices = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(2.0, 2.0),
            Vec2::new(1.0, 0.5), // Dents inward
            Vec2::new(0.0, 2.0),
        ];
        assert!(matches!(Polygon::new(vertices), Err(ShapeError::NotConvex(_))));
    }

    #[test]
    fn test_polygon_box_normals() {
        let b = Polygon::new_box(0.5, 0.5);
        assert_eq!(b.vertex_count(), 4);
        // Outward normals: down, right, up, left
        assert_eq!(b.normals[0], Vec2::new(0.0, -1.0));
        assert_eq!(b.normals[1], Vec2::new(1.0, 0.0));
        assert_eq!(b.normals[2], Vec2::new(0.0, 1.0));
        assert_eq!(b.normals[3], Vec2::new(-1.0, 0.0));

        // new() on the same vertices agrees with the precomputed normals
        let rebuilt = Polygon::new(b.vertices.clone()).unwrap();
        for (a, b) in rebuilt.normals.iter().zip(b.normals.iter()) {
            assert!((a.x - b.x).abs() < EPSILON);
            assert!((a.y - b.y).abs() < EPSILON);
        }
    }

    #[test]
    fn test_polygon_centroid_square_offset() {
        let offset = Vec2::new(10.0, -5.0);
        let vertices = vec![
            offset + Vec2::new(0.0, 0.0),
            offset + Vec2::new(1.0, 0.0),
            offset + Vec2::new(1.0, 1.0),
            offset + Vec2::new(0.0, 1.0),
        ];
        let polygon = Polygon::new(vertices).unwrap();
        let centroid = polygon.centroid();
        assert!((centroid.x - (offset.x + 0.5)).abs() < EPSILON);
        assert!((centroid.y - (offset.y + 0.5)).abs() < EPSILON);
    }

    #[test]
    fn test_polygon_centroid_triangle() {
        let vertices = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(3.0, 0.0),
            Vec2::new(0.0, 3.0),
        ];
        let polygon = Polygon::new(vertices).unwrap();
        let centroid = polygon.centroid();
        assert!((centroid.x - 1.0).abs() < EPSILON);
        assert!((centroid.y - 1.0).abs() < EPSILON);
    }
}
