//! Vertex welding and degenerate-triangle removal.

use std::collections::HashMap;

use glam::Vec3;
use tracing::debug;

use trimesh::MeshBuffers;

use crate::types::MIN_WELD_THRESHOLD;

/// Counts reported by a weld pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WeldStats {
    /// Vertices merged away into an earlier canonical vertex.
    pub vertices_removed: usize,
    /// Triangles dropped because their remapped indices collapsed.
    pub triangles_removed: usize,
}

/// Merge vertices closer than `threshold` and drop collapsed triangles.
///
/// Vertices are visited in buffer order. Each one merges into the
/// lowest-numbered already-accepted canonical vertex within `threshold`
/// (first match wins), or becomes a new canonical vertex. Candidates come
/// from a spatial hash with cell size equal to the threshold, so any match
/// lies in the 3x3x3 cell neighborhood and the pass stays near-linear.
/// Triangles are remapped through the assignment; any triangle whose three
/// indices are no longer pairwise distinct is removed. Positions and UVs
/// are rebuilt in canonical insertion order; normals are recomputed.
///
/// Deterministic for a fixed input order and threshold.
pub fn weld_mesh(buffers: &mut MeshBuffers, threshold: f32) -> WeldStats {
    if buffers.positions.is_empty() {
        return WeldStats::default();
    }

    let threshold = threshold.max(MIN_WELD_THRESHOLD);
    let threshold_sq = threshold * threshold;
    let inv_cell = 1.0 / threshold;
    let has_uvs = buffers.uvs.len() == buffers.positions.len();

    let mut cells: HashMap<(i32, i32, i32), Vec<u32>> = HashMap::new();
    let mut remap: Vec<u32> = Vec::with_capacity(buffers.positions.len());
    let mut kept_positions: Vec<Vec3> = Vec::new();
    let mut kept_uvs = Vec::new();

    for (i, &position) in buffers.positions.iter().enumerate() {
        let key = cell_key(position, inv_cell);

        let mut canonical: Option<u32> = None;
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let Some(slots) = cells.get(&(key.0 + dx, key.1 + dy, key.2 + dz)) else {
                        continue;
                    };
                    for &slot in slots {
                        if kept_positions[slot as usize].distance_squared(position) < threshold_sq
                            && canonical.is_none_or(|best| slot < best)
                        {
                            canonical = Some(slot);
                        }
                    }
                }
            }
        }

        match canonical {
            Some(slot) => remap.push(slot),
            None => {
                let slot = kept_positions.len() as u32;
                kept_positions.push(position);
                if has_uvs {
                    kept_uvs.push(buffers.uvs[i]);
                }
                cells.entry(key).or_default().push(slot);
                remap.push(slot);
            }
        }
    }

    let triangle_count_before = buffers.triangles.len();
    for triangle in &mut buffers.triangles {
        for index in triangle.iter_mut() {
            *index = remap[*index as usize];
        }
    }
    buffers
        .triangles
        .retain(|triangle| !MeshBuffers::is_degenerate(triangle));

    let stats = WeldStats {
        vertices_removed: buffers.positions.len() - kept_positions.len(),
        triangles_removed: triangle_count_before - buffers.triangles.len(),
    };

    buffers.positions = kept_positions;
    buffers.uvs = kept_uvs;
    buffers.recompute_normals();

    debug!(
        "weld removed {} vertices and {} triangles",
        stats.vertices_removed, stats.triangles_removed
    );
    stats
}

fn cell_key(position: Vec3, inv_cell: f32) -> (i32, i32, i32) {
    (
        (position.x * inv_cell).floor() as i32,
        (position.y * inv_cell).floor() as i32,
        (position.z * inv_cell).floor() as i32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_weld_merges_near_duplicates() {
        // Two triangles meeting along what should be a shared edge, with the
        // shared corner duplicated and offset by less than the threshold.
        let mut buffers = MeshBuffers::new(
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
                Vec3::new(0.0005, 1.0, 0.0), // duplicate of vertex 2
                Vec3::new(1.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2], [1, 4, 3]],
        );

        let stats = weld_mesh(&mut buffers, 0.001);
        assert_eq!(stats.vertices_removed, 1);
        assert_eq!(stats.triangles_removed, 0);
        assert_eq!(buffers.positions.len(), 4);
        // The second triangle now references the canonical vertex 2.
        assert_eq!(buffers.triangles[1], [1, 3, 2]);
    }

    #[test]
    fn test_weld_drops_collapsed_triangles() {
        let mut buffers = MeshBuffers::new(
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0005, 0.0), // duplicate of vertex 1
                Vec3::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 3], [0, 1, 2]],
        );

        let stats = weld_mesh(&mut buffers, 0.001);
        assert_eq!(stats.vertices_removed, 1);
        assert_eq!(stats.triangles_removed, 1);
        // Vertex 3 became canonical slot 2 after the merge.
        assert_eq!(buffers.triangles, vec![[0, 1, 2]]);
    }

    #[test]
    fn test_weld_first_match_wins() {
        // Vertices 0 and 1 are distinct canonicals; vertex 2 is within the
        // threshold of both and must merge into the lower-numbered one.
        let mut buffers = MeshBuffers::new(
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(0.0008, 0.0, 0.0),
                Vec3::new(0.0004, 0.0, 0.0),
            ],
            vec![],
        );

        // 0 and 1 are farther apart than the threshold, so both survive.
        let stats = weld_mesh(&mut buffers, 0.0005);
        assert_eq!(stats.vertices_removed, 1);
        assert_eq!(buffers.positions.len(), 2);
        assert_eq!(buffers.positions[0], Vec3::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_weld_keeps_uvs_of_canonical_vertices() {
        let mut buffers = MeshBuffers::new(
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 0.0, 0.0001),
            ],
            vec![[0, 1, 2]],
        );
        buffers.uvs = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(0.9, 0.9),
        ];

        weld_mesh(&mut buffers, 0.001);
        assert_eq!(buffers.positions.len(), 2);
        assert_eq!(buffers.uvs, vec![Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0)]);
    }

    #[test]
    fn test_weld_no_duplicates_is_identity() {
        let positions = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ];
        let mut buffers = MeshBuffers::new(positions.clone(), vec![[0, 1, 2]]);

        let stats = weld_mesh(&mut buffers, 0.001);
        assert_eq!(stats, WeldStats::default());
        assert_eq!(buffers.positions, positions);
        assert_eq!(buffers.triangles, vec![[0, 1, 2]]);
    }

    #[test]
    fn test_weld_across_cell_boundaries() {
        // Two points straddling a hash cell boundary but within the
        // threshold must still merge.
        let mut buffers = MeshBuffers::new(
            vec![
                Vec3::new(0.9995 * 0.001, 0.0, 0.0),
                Vec3::new(1.0005 * 0.001, 0.0, 0.0),
            ],
            vec![],
        );
        let stats = weld_mesh(&mut buffers, 0.001);
        assert_eq!(stats.vertices_removed, 1);
    }

    #[test]
    fn test_weld_is_deterministic() {
        let build = || {
            MeshBuffers::new(
                vec![
                    Vec3::new(0.0, 0.0, 0.0),
                    Vec3::new(0.0002, 0.0, 0.0),
                    Vec3::new(1.0, 0.0, 0.0),
                    Vec3::new(1.0, 0.0002, 0.0),
                    Vec3::new(0.0, 1.0, 0.0),
                ],
                vec![[0, 2, 4], [1, 3, 4]],
            )
        };
        let mut a = build();
        let mut b = build();
        assert_eq!(weld_mesh(&mut a, 0.001), weld_mesh(&mut b, 0.001));
        assert_eq!(a.positions, b.positions);
        assert_eq!(a.triangles, b.triangles);
    }
}
