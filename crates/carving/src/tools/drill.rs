//! Cylindrical drill tool.

use glam::{Vec2, Vec3};

use trimesh::Aabb;

use crate::tools::ToolPlacement;
use crate::types::{SignedAxis, MIN_TOOL_EXTENT};

/// Radial distances below this count as "on the axis" during projection.
const AXIS_EPSILON: f32 = 1e-6;

/// A cylinder that pushes contained vertices radially out to its wall.
///
/// The placement origin is the cylinder's centroid; the drive axis runs
/// from the base (the end the tool enters from) to the tip. Containment
/// uses `effective_depth`, which may be shorter than the full length.
#[derive(Debug, Clone)]
pub struct DrillTool {
    placement: ToolPlacement,
    axis: SignedAxis,
    radius: f32,
    length: f32,
    effective_depth: f32,
}

impl DrillTool {
    /// Create a drill. Non-positive radius or length are clamped up to a
    /// minimum extent; the effective depth defaults to the full length.
    pub fn new(placement: ToolPlacement, axis: SignedAxis, radius: f32, length: f32) -> Self {
        let radius = radius.max(MIN_TOOL_EXTENT);
        let length = length.max(MIN_TOOL_EXTENT);
        Self {
            placement,
            axis,
            radius,
            length,
            effective_depth: length,
        }
    }

    /// Limit containment to the first `depth` units from the base.
    pub fn with_effective_depth(mut self, depth: f32) -> Self {
        self.effective_depth = depth.clamp(MIN_TOOL_EXTENT, self.length);
        self
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn length(&self) -> f32 {
        self.length
    }

    pub fn effective_depth(&self) -> f32 {
        self.effective_depth
    }

    /// Normalized world direction the drill advances in.
    pub fn drive_direction(&self) -> Vec3 {
        self.placement.axis_direction(self.axis)
    }

    /// Map a world point into the tool frame: X/Y lateral, Z axial with 0 at
    /// the base growing toward the tip. Exact algebraic inverse of
    /// [`DrillTool::tool_to_world`].
    pub fn world_to_tool(&self, point: Vec3) -> Vec3 {
        let local = self.placement.to_local(point);
        let (u, v) = self.axis.lateral();
        Vec3::new(
            local[u],
            local[v],
            self.axis.sign() * local[self.axis.index()] + self.length * 0.5,
        )
    }

    /// Inverse of [`DrillTool::world_to_tool`].
    pub fn tool_to_world(&self, tool_point: Vec3) -> Vec3 {
        let (u, v) = self.axis.lateral();
        let mut local = Vec3::ZERO;
        local[u] = tool_point.x;
        local[v] = tool_point.y;
        local[self.axis.index()] = self.axis.sign() * (tool_point.z - self.length * 0.5);
        self.placement.to_world(local)
    }

    /// True when the point is inside the active cutting volume: axial
    /// coordinate within `[0, effective_depth]`, radial distance strictly
    /// under the radius.
    pub fn contains(&self, point: Vec3) -> bool {
        let t = self.world_to_tool(point);
        if t.z < 0.0 || t.z > self.effective_depth {
            return false;
        }
        Vec2::new(t.x, t.y).length_squared() < self.radius * self.radius
    }

    /// Push a contained point radially out to the cylinder wall.
    ///
    /// The axial coordinate is preserved. A point on the axis itself has no
    /// radial direction, so it leaves along the fixed lateral reference
    /// direction instead. Returns the input unchanged with `false` when the
    /// point is outside the cutting volume.
    pub fn project(&self, point: Vec3) -> (Vec3, bool) {
        if !self.contains(point) {
            return (point, false);
        }

        let t = self.world_to_tool(point);
        let lateral = Vec2::new(t.x, t.y);
        let radial = lateral.length();
        let on_wall = if radial < AXIS_EPSILON {
            Vec2::new(self.radius, 0.0)
        } else {
            lateral * (self.radius / radial)
        };

        (self.tool_to_world(Vec3::new(on_wall.x, on_wall.y, t.z)), true)
    }

    /// [`DrillTool::project`] followed by a per-axis clamp into `bounds`.
    pub fn project_clamped(&self, point: Vec3, bounds: &Aabb) -> (Vec3, bool) {
        let (projected, moved) = self.project(point);
        (bounds.clamp_point(projected), moved)
    }
}
