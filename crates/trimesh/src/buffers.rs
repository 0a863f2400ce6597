//! Raw mesh buffers.
//!
//! Positions and triangles are the source of truth; normals and UVs are
//! optional companion attributes. Vertex identity is the buffer index.

use glam::{Vec2, Vec3};
use thiserror::Error;

use crate::aabb::Aabb;

/// Errors from mesh buffer validation.
#[derive(Debug, Clone, Error)]
pub enum MeshError {
    /// A triangle references a vertex index outside the position buffer.
    #[error("triangle {triangle} references vertex {index} but only {vertex_count} vertices exist")]
    TriangleIndexOutOfRange {
        triangle: usize,
        index: u32,
        vertex_count: usize,
    },

    /// A non-empty attribute buffer does not match the vertex count.
    #[error("attribute buffer has {got} entries, expected {expected}")]
    AttributeCountMismatch { expected: usize, got: usize },
}

/// Vertex/triangle buffers with optional per-vertex normals and UVs.
///
/// Invariants (enforced by [`MeshBuffers::validate`]):
/// - every triangle index is below the vertex count
/// - `normals` and `uvs` are either empty or exactly vertex-count long
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshBuffers {
    pub positions: Vec<Vec3>,
    pub triangles: Vec<[u32; 3]>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
}

impl MeshBuffers {
    /// Create buffers from positions and triangles, with no attributes.
    pub fn new(positions: Vec<Vec3>, triangles: Vec<[u32; 3]>) -> Self {
        Self {
            positions,
            triangles,
            normals: Vec::new(),
            uvs: Vec::new(),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Get the three corner positions of a triangle.
    pub fn triangle_positions(&self, triangle: usize) -> (Vec3, Vec3, Vec3) {
        let [a, b, c] = self.triangles[triangle];
        (
            self.positions[a as usize],
            self.positions[b as usize],
            self.positions[c as usize],
        )
    }

    /// True when a triangle's indices are not pairwise distinct.
    pub fn is_degenerate(triangle: &[u32; 3]) -> bool {
        triangle[0] == triangle[1] || triangle[1] == triangle[2] || triangle[0] == triangle[2]
    }

    /// Check index bounds and attribute lengths without mutating anything.
    pub fn validate(&self) -> Result<(), MeshError> {
        let vertex_count = self.vertex_count();
        for (triangle, indices) in self.triangles.iter().enumerate() {
            for &index in indices {
                if index as usize >= vertex_count {
                    return Err(MeshError::TriangleIndexOutOfRange {
                        triangle,
                        index,
                        vertex_count,
                    });
                }
            }
        }
        if !self.normals.is_empty() && self.normals.len() != vertex_count {
            return Err(MeshError::AttributeCountMismatch {
                expected: vertex_count,
                got: self.normals.len(),
            });
        }
        if !self.uvs.is_empty() && self.uvs.len() != vertex_count {
            return Err(MeshError::AttributeCountMismatch {
                expected: vertex_count,
                got: self.uvs.len(),
            });
        }
        Ok(())
    }

    /// Recompute vertex normals from scratch.
    ///
    /// Accumulates unnormalized face normals per vertex (area weighting) and
    /// normalizes the sums. Vertices with no faces, and sums that cancel out,
    /// end up with a zero normal rather than NaN.
    pub fn recompute_normals(&mut self) {
        self.normals.clear();
        self.normals.resize(self.positions.len(), Vec3::ZERO);

        for triangle in &self.triangles {
            let [a, b, c] = *triangle;
            let v0 = self.positions[a as usize];
            let v1 = self.positions[b as usize];
            let v2 = self.positions[c as usize];
            let face_normal = (v1 - v0).cross(v2 - v0);
            self.normals[a as usize] += face_normal;
            self.normals[b as usize] += face_normal;
            self.normals[c as usize] += face_normal;
        }

        for normal in &mut self.normals {
            *normal = normal.normalize_or_zero();
        }
    }

    /// Tightest bounds around the current positions.
    pub fn compute_bounds(&self) -> Aabb {
        Aabb::from_points(self.positions.iter().copied())
    }
}
