//! Surface containment for tool-proposed vertex targets.

use glam::Vec3;
use tracing::trace;

use trimesh::{Aabb, SurfaceIndex};

/// Keeps deformed vertices inside the original geometry.
///
/// Containment is layered:
/// 1. the target is clamped per axis into the original world bounds,
///    unconditionally;
/// 2. with a surface index, a ray from the vertex's pre-move position along
///    the motion direction stops the vertex at the original shell when the
///    requested displacement would tunnel past it;
/// 3. when that ray misses and the clamp in step 1 actually changed the
///    target, the nearest point on the original surface is used instead,
///    re-clamped as a final safety net.
///
/// The result is always inside the bounds; without an index the constraint
/// degrades to the clamp alone.
#[derive(Debug, Clone, Copy)]
pub struct SurfaceConstraint<'a> {
    bounds: Aabb,
    index: Option<&'a SurfaceIndex>,
}

impl<'a> SurfaceConstraint<'a> {
    pub fn new(bounds: Aabb, index: Option<&'a SurfaceIndex>) -> Self {
        Self { bounds, index }
    }

    /// Constrain a proposed target for a vertex moving from `origin` along
    /// `direction`.
    pub fn constrain(&self, origin: Vec3, target: Vec3, direction: Vec3) -> Vec3 {
        let clamped = self.bounds.clamp_point(target);

        let Some(index) = self.index else {
            return clamped;
        };
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO {
            return clamped;
        }

        if let Some(hit) = index.raycast(origin, direction) {
            let requested = (target - origin).dot(direction);
            if requested > hit.distance {
                trace!("target stopped at the original shell");
                return self.bounds.clamp_point(hit.point);
            }
            clamped
        } else if clamped != target {
            // Ray missed and the raw target escaped the bounds: snap to the
            // nearest point on the original surface instead.
            match index.closest_point(clamped) {
                Some((nearest, _)) => self.bounds.clamp_point(nearest),
                None => clamped,
            }
        } else {
            clamped
        }
    }
}
