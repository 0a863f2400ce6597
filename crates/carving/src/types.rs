//! Core carving types and configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use trimesh::MeshError;

/// Smallest extent a tool dimension is allowed to take.
///
/// Non-positive radii, lengths and depths are clamped up to this at
/// configuration time so the geometry code never sees a degenerate shape.
pub const MIN_TOOL_EXTENT: f32 = 1e-4;

/// Smallest usable weld threshold.
pub const MIN_WELD_THRESHOLD: f32 = 1e-6;

/// One of the six signed canonical axes.
///
/// Tools express their working direction as an axis index (0..=2) plus a
/// sign, derived from the tool's orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum SignedAxis {
    PosX = 0,
    NegX = 1,
    PosY = 2,
    #[default]
    NegY = 3,
    PosZ = 4,
    NegZ = 5,
}

impl SignedAxis {
    /// Axis index: 0 = X, 1 = Y, 2 = Z.
    pub fn index(self) -> usize {
        match self {
            SignedAxis::PosX | SignedAxis::NegX => 0,
            SignedAxis::PosY | SignedAxis::NegY => 1,
            SignedAxis::PosZ | SignedAxis::NegZ => 2,
        }
    }

    pub fn sign(self) -> f32 {
        match self {
            SignedAxis::PosX | SignedAxis::PosY | SignedAxis::PosZ => 1.0,
            SignedAxis::NegX | SignedAxis::NegY | SignedAxis::NegZ => -1.0,
        }
    }

    /// Unit direction in the local frame.
    pub fn direction(self) -> glam::Vec3 {
        let mut dir = glam::Vec3::ZERO;
        dir[self.index()] = self.sign();
        dir
    }

    /// The two axis indices orthogonal to this one, in ascending order.
    pub fn lateral(self) -> (usize, usize) {
        match self.index() {
            0 => (1, 2),
            1 => (0, 2),
            _ => (0, 1),
        }
    }
}

/// Configuration for a deformable mesh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarveConfig {
    /// Vertices closer than this merge during a weld pass (default: 0.001).
    pub weld_threshold: f32,
    /// Route tool targets through the surface containment constraint
    /// (default: true).
    pub enforce_bounds: bool,
    /// Build and consult the surface index; without it containment degrades
    /// to the bounding-box clamp alone (default: true).
    pub use_surface_index: bool,
}

impl Default for CarveConfig {
    fn default() -> Self {
        Self {
            weld_threshold: 0.001,
            enforce_bounds: true,
            use_surface_index: true,
        }
    }
}

impl CarveConfig {
    /// Clamp out-of-range values instead of erroring later.
    pub(crate) fn sanitized(mut self) -> Self {
        self.weld_threshold = self.weld_threshold.max(MIN_WELD_THRESHOLD);
        self
    }
}

/// Errors from deformable-mesh boundary operations.
#[derive(Debug, Clone, Error)]
pub enum CarveError {
    /// A replacement vertex buffer did not match the working buffer length.
    #[error("replacement buffer has {got} vertices, expected {expected}")]
    VertexCountMismatch { expected: usize, got: usize },

    /// The initial mesh failed validation.
    #[error(transparent)]
    Mesh(#[from] MeshError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_signed_axis_directions() {
        assert_eq!(SignedAxis::PosX.direction(), Vec3::X);
        assert_eq!(SignedAxis::NegY.direction(), -Vec3::Y);
        assert_eq!(SignedAxis::PosZ.direction(), Vec3::Z);
        assert_eq!(SignedAxis::NegZ.sign(), -1.0);
    }

    #[test]
    fn test_signed_axis_lateral_pairs() {
        assert_eq!(SignedAxis::PosX.lateral(), (1, 2));
        assert_eq!(SignedAxis::NegY.lateral(), (0, 2));
        assert_eq!(SignedAxis::NegZ.lateral(), (0, 1));
    }

    #[test]
    fn test_config_defaults() {
        let config = CarveConfig::default();
        assert!((config.weld_threshold - 0.001).abs() < 1e-9);
        assert!(config.enforce_bounds);
        assert!(config.use_surface_index);
    }

    #[test]
    fn test_config_sanitize_clamps_threshold() {
        let config = CarveConfig {
            weld_threshold: -1.0,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(config.weld_threshold, MIN_WELD_THRESHOLD);
    }
}
