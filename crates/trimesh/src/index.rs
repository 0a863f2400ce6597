//! Static surface index for ray and nearest-point queries.
//!
//! A median-split bounding volume hierarchy over world-space triangles.
//! Built once from an immutable surface; all queries take `&self` and are
//! safe to issue concurrently.

use glam::{Affine3A, Vec3};
use tracing::debug;

use crate::aabb::Aabb;
use crate::raycast::{closest_point_on_triangle, ray_triangle_intersection};

/// Triangles per leaf before the build stops splitting.
const LEAF_SIZE: usize = 4;

/// Result of a successful [`SurfaceIndex::raycast`].
#[derive(Debug, Clone, Copy)]
pub struct SurfaceHit {
    /// Intersection point on the surface.
    pub point: Vec3,
    /// Distance from the ray origin along the (normalized) direction.
    pub distance: f32,
}

#[derive(Debug)]
enum IndexNode {
    Leaf {
        bounds: Aabb,
        triangles: Vec<u32>,
    },
    Internal {
        bounds: Aabb,
        left: Box<IndexNode>,
        right: Box<IndexNode>,
    },
}

impl IndexNode {
    fn bounds(&self) -> &Aabb {
        match self {
            IndexNode::Leaf { bounds, .. } => bounds,
            IndexNode::Internal { bounds, .. } => bounds,
        }
    }
}

/// Read-only spatial index over a triangle surface.
#[derive(Debug)]
pub struct SurfaceIndex {
    root: Option<IndexNode>,
    triangles: Vec<[Vec3; 3]>,
}

impl SurfaceIndex {
    /// Build an index over the given surface, transformed into world space.
    ///
    /// Degenerate and out-of-range triangles are skipped rather than
    /// rejected; an empty surface yields an index whose queries return
    /// `None`.
    pub fn build(positions: &[Vec3], triangles: &[[u32; 3]], transform: Affine3A) -> Self {
        let vertex_count = positions.len();
        let world_triangles: Vec<[Vec3; 3]> = triangles
            .iter()
            .filter(|tri| {
                tri.iter().all(|&i| (i as usize) < vertex_count)
                    && !crate::buffers::MeshBuffers::is_degenerate(tri)
            })
            .map(|&[a, b, c]| {
                [
                    transform.transform_point3(positions[a as usize]),
                    transform.transform_point3(positions[b as usize]),
                    transform.transform_point3(positions[c as usize]),
                ]
            })
            .collect();

        let mut entries: Vec<(u32, Vec3, Aabb)> = world_triangles
            .iter()
            .enumerate()
            .map(|(i, tri)| {
                let bounds = Aabb::from_points(tri.iter().copied());
                (i as u32, bounds.center(), bounds)
            })
            .collect();

        let root = if entries.is_empty() {
            None
        } else {
            Some(build_node(&mut entries))
        };

        debug!(
            "surface index built over {} triangles",
            world_triangles.len()
        );

        Self {
            root,
            triangles: world_triangles,
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Closest intersection of a ray with the surface.
    ///
    /// `direction` is normalized internally; a zero direction misses.
    pub fn raycast(&self, origin: Vec3, direction: Vec3) -> Option<SurfaceHit> {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO {
            return None;
        }

        let mut closest: Option<SurfaceHit> = None;
        let mut closest_t = f32::MAX;
        if let Some(root) = &self.root {
            self.raycast_node(root, origin, direction, &mut closest, &mut closest_t);
        }
        closest
    }

    fn raycast_node(
        &self,
        node: &IndexNode,
        origin: Vec3,
        direction: Vec3,
        closest: &mut Option<SurfaceHit>,
        closest_t: &mut f32,
    ) {
        match node {
            IndexNode::Leaf { bounds, triangles } => {
                let Some((t_enter, _)) = bounds.ray_intersect(origin, direction) else {
                    return;
                };
                if t_enter >= *closest_t {
                    return;
                }
                for &index in triangles {
                    let [a, b, c] = self.triangles[index as usize];
                    if let Some(hit) = ray_triangle_intersection(origin, direction, a, b, c) {
                        if hit.t < *closest_t {
                            *closest_t = hit.t;
                            *closest = Some(SurfaceHit {
                                point: origin + direction * hit.t,
                                distance: hit.t,
                            });
                        }
                    }
                }
            }
            IndexNode::Internal { left, right, .. } => {
                // Descend into the nearer child first so the far child can
                // often be culled by the tightened closest_t.
                let left_t = left.bounds().ray_intersect(origin, direction).map(|(t, _)| t);
                let right_t = right.bounds().ray_intersect(origin, direction).map(|(t, _)| t);
                let mut order = [(left_t, left), (right_t, right)];
                if let (Some(lt), Some(rt)) = (left_t, right_t) {
                    if rt < lt {
                        order.swap(0, 1);
                    }
                }
                for (entry, child) in order {
                    if let Some(t) = entry {
                        if t < *closest_t {
                            self.raycast_node(child, origin, direction, closest, closest_t);
                        }
                    }
                }
            }
        }
    }

    /// Nearest point on the surface to `point`, with its distance.
    ///
    /// Returns `None` only for an empty index.
    pub fn closest_point(&self, point: Vec3) -> Option<(Vec3, f32)> {
        let root = self.root.as_ref()?;
        let mut best_point = Vec3::ZERO;
        let mut best_dist_sq = f32::MAX;
        self.closest_node(root, point, &mut best_point, &mut best_dist_sq);
        Some((best_point, best_dist_sq.sqrt()))
    }

    fn closest_node(
        &self,
        node: &IndexNode,
        point: Vec3,
        best_point: &mut Vec3,
        best_dist_sq: &mut f32,
    ) {
        if node.bounds().distance_squared(point) >= *best_dist_sq {
            return;
        }
        match node {
            IndexNode::Leaf { triangles, .. } => {
                for &index in triangles {
                    let [a, b, c] = self.triangles[index as usize];
                    let candidate = closest_point_on_triangle(point, a, b, c);
                    let dist_sq = candidate.distance_squared(point);
                    if dist_sq < *best_dist_sq {
                        *best_dist_sq = dist_sq;
                        *best_point = candidate;
                    }
                }
            }
            IndexNode::Internal { left, right, .. } => {
                // Nearer child first tightens the bound for the other.
                let left_d = left.bounds().distance_squared(point);
                let right_d = right.bounds().distance_squared(point);
                let (first, second) = if right_d < left_d {
                    (right, left)
                } else {
                    (left, right)
                };
                self.closest_node(first, point, best_point, best_dist_sq);
                self.closest_node(second, point, best_point, best_dist_sq);
            }
        }
    }
}

/// Recursive median-split build over (triangle, centroid, bounds) entries.
fn build_node(entries: &mut [(u32, Vec3, Aabb)]) -> IndexNode {
    let mut bounds = Aabb::empty();
    for (_, _, tri_bounds) in entries.iter() {
        bounds = bounds.union(tri_bounds);
    }

    if entries.len() <= LEAF_SIZE {
        return IndexNode::Leaf {
            bounds,
            triangles: entries.iter().map(|(i, _, _)| *i).collect(),
        };
    }

    // Split at the centroid median along the widest axis.
    let size = bounds.size();
    let axis = if size.x >= size.y && size.x >= size.z {
        0
    } else if size.y >= size.z {
        1
    } else {
        2
    };
    let mid = entries.len() / 2;
    entries.select_nth_unstable_by(mid, |a, b| {
        a.1[axis].partial_cmp(&b.1[axis]).unwrap_or(std::cmp::Ordering::Equal)
    });

    let (left_entries, right_entries) = entries.split_at_mut(mid);
    IndexNode::Internal {
        bounds,
        left: Box::new(build_node(left_entries)),
        right: Box::new(build_node(right_entries)),
    }
}
