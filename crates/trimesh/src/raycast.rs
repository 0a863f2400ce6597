//! Ray/triangle and point/triangle primitives.
//!
//! Ray intersection is Moller-Trumbore; closest point is the region-based
//! algorithm from Ericson's Real-Time Collision Detection.

use glam::Vec3;

/// Epsilon for determinant and front-face cutoffs in ray intersection.
const EPSILON: f32 = 1e-6;

/// Result of a ray-triangle intersection test.
#[derive(Debug, Clone, Copy)]
pub struct TriangleHit {
    /// Distance along the ray to the intersection point.
    pub t: f32,
    /// Barycentric weight of the second vertex.
    pub u: f32,
    /// Barycentric weight of the third vertex.
    pub v: f32,
}

/// Moller-Trumbore ray-triangle intersection.
///
/// `direction` should be normalized so `t` is a world distance. Hits behind
/// the origin (and closer than `EPSILON`) are rejected.
pub fn ray_triangle_intersection(
    origin: Vec3,
    direction: Vec3,
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
) -> Option<TriangleHit> {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;

    let pvec = direction.cross(edge2);
    let det = edge1.dot(pvec);

    // Near-zero determinant: ray parallel to the triangle plane.
    if det.abs() < EPSILON {
        return None;
    }
    let inv_det = 1.0 / det;

    let tvec = origin - v0;
    let u = tvec.dot(pvec) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let qvec = tvec.cross(edge1);
    let v = direction.dot(qvec) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = edge2.dot(qvec) * inv_det;
    if t < EPSILON {
        return None;
    }

    Some(TriangleHit { t, u, v })
}

/// Closest point on triangle `(a, b, c)` to `p`.
///
/// Classifies `p` against the triangle's Voronoi regions: vertex, edge, or
/// interior, in that order.
pub fn closest_point_on_triangle(p: Vec3, a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    let ab = b - a;
    let ac = c - a;
    let ap = p - a;

    let d1 = ab.dot(ap);
    let d2 = ac.dot(ap);
    if d1 <= 0.0 && d2 <= 0.0 {
        return a;
    }

    let bp = p - b;
    let d3 = ab.dot(bp);
    let d4 = ac.dot(bp);
    if d3 >= 0.0 && d4 <= d3 {
        return b;
    }

    let vc = d1 * d4 - d3 * d2;
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        let v = d1 / (d1 - d3);
        return a + ab * v;
    }

    let cp = p - c;
    let d5 = ab.dot(cp);
    let d6 = ac.dot(cp);
    if d6 >= 0.0 && d5 <= d6 {
        return c;
    }

    let vb = d5 * d2 - d1 * d6;
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        let w = d2 / (d2 - d6);
        return a + ac * w;
    }

    let va = d3 * d6 - d5 * d4;
    if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
        let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
        return b + (c - b) * w;
    }

    // Interior region.
    let denom = 1.0 / (va + vb + vc);
    let v = vb * denom;
    let w = vc * denom;
    a + ab * v + ac * w
}

#[cfg(test)]
mod tests {
    use super::*;

    const V0: Vec3 = Vec3::new(0.0, 0.0, 0.0);
    const V1: Vec3 = Vec3::new(1.0, 0.0, 0.0);
    const V2: Vec3 = Vec3::new(0.0, 1.0, 0.0);

    #[test]
    fn test_ray_hits_triangle_center() {
        let hit = ray_triangle_intersection(
            Vec3::new(0.25, 0.25, 1.0),
            Vec3::new(0.0, 0.0, -1.0),
            V0,
            V1,
            V2,
        )
        .expect("ray through the interior must hit");
        assert!((hit.t - 1.0).abs() < 1e-6);
        assert!((hit.u - 0.25).abs() < 1e-6);
        assert!((hit.v - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_ray_misses_outside() {
        let hit = ray_triangle_intersection(
            Vec3::new(2.0, 2.0, 1.0),
            Vec3::new(0.0, 0.0, -1.0),
            V0,
            V1,
            V2,
        );
        assert!(hit.is_none());
    }

    #[test]
    fn test_ray_ignores_triangle_behind() {
        let hit = ray_triangle_intersection(
            Vec3::new(0.25, 0.25, 1.0),
            Vec3::new(0.0, 0.0, 1.0),
            V0,
            V1,
            V2,
        );
        assert!(hit.is_none());
    }

    #[test]
    fn test_closest_point_interior_projects_to_plane() {
        let p = Vec3::new(0.25, 0.25, 3.0);
        let closest = closest_point_on_triangle(p, V0, V1, V2);
        assert!((closest - Vec3::new(0.25, 0.25, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_closest_point_vertex_region() {
        let p = Vec3::new(-1.0, -1.0, 0.5);
        assert_eq!(closest_point_on_triangle(p, V0, V1, V2), V0);
    }

    #[test]
    fn test_closest_point_edge_region() {
        let p = Vec3::new(0.5, -2.0, 0.0);
        let closest = closest_point_on_triangle(p, V0, V1, V2);
        assert!((closest - Vec3::new(0.5, 0.0, 0.0)).length() < 1e-6);
    }
}
