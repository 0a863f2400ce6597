//! Carving tool descriptors.
//!
//! A tool descriptor is rebuilt from the tool's current affine placement
//! each time it is applied and stays immutable for the duration of that
//! application. The descriptor answers two questions per vertex: does the
//! tool act on this point, and where does it want the point to go.

use glam::{Affine3A, Vec3};

use crate::types::SignedAxis;

pub mod drill;
pub mod grinder;

pub use drill::DrillTool;
pub use grinder::GrinderTool;

/// Affine placement of a tool with its cached inverse.
#[derive(Debug, Clone, Copy)]
pub struct ToolPlacement {
    world: Affine3A,
    inverse: Affine3A,
}

impl ToolPlacement {
    pub fn new(world: Affine3A) -> Self {
        Self {
            world,
            inverse: world.inverse(),
        }
    }

    pub fn identity() -> Self {
        Self::new(Affine3A::IDENTITY)
    }

    pub fn to_local(&self, point: Vec3) -> Vec3 {
        self.inverse.transform_point3(point)
    }

    pub fn to_world(&self, point: Vec3) -> Vec3 {
        self.world.transform_point3(point)
    }

    /// World-space position of the local origin.
    pub fn center(&self) -> Vec3 {
        Vec3::from(self.world.translation)
    }

    /// World-space (possibly scaled) image of a local basis axis.
    pub fn basis(&self, axis: usize) -> Vec3 {
        Vec3::from(self.world.matrix3.col(axis))
    }

    /// Normalized world direction of a signed local axis.
    pub fn axis_direction(&self, axis: SignedAxis) -> Vec3 {
        (self.basis(axis.index()) * axis.sign()).normalize_or_zero()
    }
}

impl Default for ToolPlacement {
    fn default() -> Self {
        Self::identity()
    }
}

/// A tool that can be applied to a deformable mesh.
#[derive(Debug, Clone)]
pub enum CarveTool {
    Drill(DrillTool),
    Grinder(GrinderTool),
}

impl CarveTool {
    /// Where the tool wants a world-space point to move, or `None` when the
    /// point is outside the tool's working volume.
    pub fn propose(&self, point: Vec3) -> Option<Vec3> {
        match self {
            CarveTool::Drill(drill) => {
                let (target, moved) = drill.project(point);
                moved.then_some(target)
            }
            CarveTool::Grinder(grinder) => grinder
                .should_grind(point)
                .then(|| grinder.grind_target(point)),
        }
    }

    /// Direction of motion for a point the tool moved from `from` to `to`.
    ///
    /// The drill pushes radially, so its direction is per-vertex; the
    /// grinder always moves along its grind direction.
    pub fn motion_direction(&self, from: Vec3, to: Vec3) -> Vec3 {
        match self {
            CarveTool::Drill(drill) => {
                let dir = (to - from).normalize_or_zero();
                if dir == Vec3::ZERO {
                    drill.drive_direction()
                } else {
                    dir
                }
            }
            CarveTool::Grinder(grinder) => grinder.grind_direction(),
        }
    }
}

impl From<DrillTool> for CarveTool {
    fn from(tool: DrillTool) -> Self {
        CarveTool::Drill(tool)
    }
}

impl From<GrinderTool> for CarveTool {
    fn from(tool: GrinderTool) -> Self {
        CarveTool::Grinder(tool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    #[test]
    fn test_placement_round_trip() {
        let placement = ToolPlacement::new(Affine3A::from_rotation_translation(
            Quat::from_rotation_y(0.8) * Quat::from_rotation_x(-0.3),
            Vec3::new(2.0, -1.0, 4.0),
        ));
        let p = Vec3::new(0.3, 0.7, -0.2);
        assert!((placement.to_world(placement.to_local(p)) - p).length() < 1e-5);
        assert!((placement.to_local(placement.to_world(p)) - p).length() < 1e-5);
    }

    #[test]
    fn test_axis_direction_is_unit() {
        let placement = ToolPlacement::new(Affine3A::from_scale_rotation_translation(
            Vec3::splat(3.0),
            Quat::from_rotation_z(1.2),
            Vec3::ZERO,
        ));
        for axis in [SignedAxis::PosX, SignedAxis::NegY, SignedAxis::PosZ] {
            let dir = placement.axis_direction(axis);
            assert!((dir.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_motion_direction_falls_back_to_drive_axis() {
        let drill = DrillTool::new(ToolPlacement::identity(), SignedAxis::NegY, 1.0, 4.0);
        let tool = CarveTool::from(drill);
        let p = Vec3::new(0.5, 0.0, 0.0);
        assert_eq!(tool.motion_direction(p, p), -Vec3::Y);
    }
}
