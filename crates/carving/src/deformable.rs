//! Deformable mesh orchestration.

use glam::{Affine3A, Vec3};
use tracing::{debug, trace};

use trimesh::{Aabb, MeshBuffers, SurfaceIndex};

use crate::constraint::SurfaceConstraint;
use crate::feedback::CarveFeedback;
use crate::tools::CarveTool;
use crate::types::{CarveConfig, CarveError};
use crate::weld::{weld_mesh, WeldStats};

/// Immutable copy of the mesh as it was at construction.
///
/// Ground truth for containment and reset; never mutated.
#[derive(Debug, Clone)]
pub struct MeshSnapshot {
    positions: Vec<Vec3>,
    triangles: Vec<[u32; 3]>,
    normals: Vec<Vec3>,
    uvs: Vec<glam::Vec2>,
    local_bounds: Aabb,
}

impl MeshSnapshot {
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    pub fn local_bounds(&self) -> Aabb {
        self.local_bounds
    }
}

/// A mesh that carving tools can permanently deform.
///
/// Owns the working buffers and the original snapshot. Tool applications
/// move vertices through the containment constraint; welding repairs the
/// topology afterwards; reset restores the snapshot wholesale. All
/// operations are synchronous and must be externally serialized per
/// instance.
pub struct DeformableMesh {
    buffers: MeshBuffers,
    snapshot: MeshSnapshot,
    transform: Affine3A,
    inverse_transform: Affine3A,
    world_bounds: Aabb,
    local_bounds: Aabb,
    surface_index: Option<SurfaceIndex>,
    config: CarveConfig,
    feedback: Option<Box<dyn CarveFeedback>>,
}

impl std::fmt::Debug for DeformableMesh {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeformableMesh")
            .field("vertices", &self.buffers.vertex_count())
            .field("triangles", &self.buffers.triangle_count())
            .field("world_bounds", &self.world_bounds)
            .field("has_index", &self.surface_index.is_some())
            .finish()
    }
}

impl DeformableMesh {
    /// Create a deformable mesh from initial buffers and a local-to-world
    /// transform.
    ///
    /// Fails without constructing anything when the buffers are invalid.
    /// Normals are generated when absent; the local bounds default to the
    /// tight bounds of the positions. The surface index is built from the
    /// snapshot when the configuration asks for one.
    pub fn new(
        mut buffers: MeshBuffers,
        local_bounds: Option<Aabb>,
        transform: Affine3A,
        config: CarveConfig,
    ) -> Result<Self, CarveError> {
        buffers.validate()?;
        let config = config.sanitized();

        if buffers.normals.len() != buffers.positions.len() {
            buffers.recompute_normals();
        }

        let local_bounds = local_bounds.unwrap_or_else(|| buffers.compute_bounds());
        let snapshot = MeshSnapshot {
            positions: buffers.positions.clone(),
            triangles: buffers.triangles.clone(),
            normals: buffers.normals.clone(),
            uvs: buffers.uvs.clone(),
            local_bounds,
        };

        let surface_index = (config.use_surface_index && !snapshot.positions.is_empty())
            .then(|| SurfaceIndex::build(&snapshot.positions, &snapshot.triangles, transform));

        Ok(Self {
            world_bounds: local_bounds.transformed(transform),
            local_bounds,
            buffers,
            snapshot,
            transform,
            inverse_transform: transform.inverse(),
            surface_index,
            config,
            feedback: None,
        })
    }

    /// Install the observer notified after each mutating batch.
    pub fn set_feedback(&mut self, feedback: Box<dyn CarveFeedback>) {
        self.feedback = Some(feedback);
    }

    pub fn config(&self) -> &CarveConfig {
        &self.config
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.buffers.positions
    }

    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.buffers.triangles
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.buffers.normals
    }

    pub fn uvs(&self) -> &[glam::Vec2] {
        &self.buffers.uvs
    }

    pub fn snapshot(&self) -> &MeshSnapshot {
        &self.snapshot
    }

    /// World bounds of the original mesh. Deformed vertices never leave
    /// this box while bounds enforcement is on.
    pub fn world_bounds(&self) -> Aabb {
        self.world_bounds
    }

    /// Bounds of the current working positions, in local space.
    pub fn local_bounds(&self) -> Aabb {
        self.local_bounds
    }

    pub fn has_surface_index(&self) -> bool {
        self.surface_index.is_some()
    }

    /// World-space position of a working vertex.
    pub fn vertex_world(&self, index: usize) -> Option<Vec3> {
        self.buffers
            .positions
            .get(index)
            .map(|&local| self.transform.transform_point3(local))
    }

    /// Apply a tool across every vertex. Returns how many vertices moved.
    ///
    /// Vertices the tool does not act on are untouched; an application that
    /// affects nothing leaves the buffers byte-identical and triggers no
    /// recompute or feedback.
    pub fn apply_tool(&mut self, tool: &CarveTool) -> usize {
        trace!("apply_tool: start over {} vertices", self.buffers.vertex_count());

        let index = self
            .config
            .use_surface_index
            .then_some(self.surface_index.as_ref())
            .flatten();
        let constraint = SurfaceConstraint::new(self.world_bounds, index);
        let enforce = self.config.enforce_bounds;
        let transform = self.transform;
        let inverse = self.inverse_transform;

        let mut moved: Vec<(usize, Vec3)> = Vec::new();
        for (i, local) in self.buffers.positions.iter_mut().enumerate() {
            let world = transform.transform_point3(*local);
            let Some(proposed) = tool.propose(world) else {
                continue;
            };
            let target = if enforce {
                constraint.constrain(world, proposed, tool.motion_direction(world, proposed))
            } else {
                proposed
            };
            *local = inverse.transform_point3(target);
            moved.push((i, target));
        }

        let affected = moved.len();
        if affected > 0 {
            self.buffers.recompute_normals();
            self.local_bounds = self.buffers.compute_bounds();
            if let Some(feedback) = self.feedback.as_mut() {
                for &(i, position) in &moved {
                    feedback.vertex_moved(i, position);
                }
                feedback.commit();
            }
        }

        debug!("apply_tool: {} vertices affected", affected);
        affected
    }

    /// Merge near-duplicate vertices and drop collapsed triangles, using
    /// the configured weld threshold.
    pub fn weld(&mut self) -> WeldStats {
        let stats = weld_mesh(&mut self.buffers, self.config.weld_threshold);
        if stats.vertices_removed > 0 || stats.triangles_removed > 0 {
            self.local_bounds = self.buffers.compute_bounds();
        }
        stats
    }

    /// Restore the working buffers from the snapshot.
    pub fn reset(&mut self) {
        debug!("reset to snapshot ({} vertices)", self.snapshot.positions.len());
        self.buffers.positions = self.snapshot.positions.clone();
        self.buffers.triangles = self.snapshot.triangles.clone();
        self.buffers.normals = self.snapshot.normals.clone();
        self.buffers.uvs = self.snapshot.uvs.clone();
        self.buffers.recompute_normals();
        self.local_bounds = self.buffers.compute_bounds();
        if let Some(feedback) = self.feedback.as_mut() {
            feedback.reinitialize();
        }
    }

    /// Move a single vertex to a world-space position.
    ///
    /// Out-of-range indices are ignored. Normals and bounds are not
    /// recomputed; callers batching single-vertex edits trigger their own
    /// recompute via [`DeformableMesh::refresh`].
    pub fn set_vertex_world(&mut self, index: usize, world_position: Vec3) {
        let Some(local) = self.buffers.positions.get_mut(index) else {
            return;
        };
        *local = self.inverse_transform.transform_point3(world_position);
        if let Some(feedback) = self.feedback.as_mut() {
            feedback.vertex_moved(index, world_position);
            feedback.commit();
        }
    }

    /// Replace the whole working position buffer.
    ///
    /// Rejected without touching any state when the length differs from the
    /// current buffer.
    pub fn replace_positions(&mut self, positions: Vec<Vec3>) -> Result<(), CarveError> {
        if positions.len() != self.buffers.positions.len() {
            return Err(CarveError::VertexCountMismatch {
                expected: self.buffers.positions.len(),
                got: positions.len(),
            });
        }
        self.buffers.positions = positions;
        self.refresh();
        Ok(())
    }

    /// Recompute normals and working bounds after external edits.
    pub fn refresh(&mut self) {
        self.buffers.recompute_normals();
        self.local_bounds = self.buffers.compute_bounds();
    }

    /// Rebuild the surface index from the snapshot.
    ///
    /// The index always describes the original surface, so this only
    /// matters after toggling `use_surface_index` or to rebuild a dropped
    /// index.
    pub fn rebuild_surface_index(&mut self) {
        self.surface_index = (!self.snapshot.positions.is_empty()).then(|| {
            SurfaceIndex::build(
                &self.snapshot.positions,
                &self.snapshot.triangles,
                self.transform,
            )
        });
    }
}
