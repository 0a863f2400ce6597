//! Oriented-box grinder tool.

use glam::Vec3;

use crate::tools::ToolPlacement;
use crate::types::SignedAxis;

/// Half-extent of the unit box in its local frame.
const HALF_EXTENT: f32 = 0.5;

/// A unit box that planes vertices down onto its leading face.
///
/// The grind direction normally comes from a signed local axis; setting a
/// custom direction overrides the reported direction and plane without
/// changing which local axis the point test uses (see
/// [`GrinderTool::should_grind`]).
#[derive(Debug, Clone)]
pub struct GrinderTool {
    placement: ToolPlacement,
    axis: SignedAxis,
    custom_direction: Vec3,
    use_custom_direction: bool,
}

impl GrinderTool {
    pub fn new(placement: ToolPlacement, axis: SignedAxis) -> Self {
        Self {
            placement,
            axis,
            custom_direction: Vec3::ZERO,
            use_custom_direction: false,
        }
    }

    /// Override the grind direction with an explicit world-space direction.
    pub fn with_custom_direction(mut self, direction: Vec3) -> Self {
        self.custom_direction = direction.normalize_or_zero();
        self.use_custom_direction = true;
        self
    }

    pub fn axis(&self) -> SignedAxis {
        self.axis
    }

    /// Unit world vector the grinder advances in: the signed local axis
    /// mapped to world space, or the custom override when set and non-zero.
    pub fn grind_direction(&self) -> Vec3 {
        if self.use_custom_direction && self.custom_direction != Vec3::ZERO {
            self.custom_direction
        } else {
            self.placement.axis_direction(self.axis)
        }
    }

    /// Plane tangent to the box face most aligned with the grind direction.
    ///
    /// Returns `(point, normal)` with the normal facing back against the
    /// grind direction. The point is the box center offset by the box's
    /// projected half-extent along the direction (support function of the
    /// oriented box).
    pub fn grind_plane(&self) -> (Vec3, Vec3) {
        let direction = self.grind_direction();
        let support = HALF_EXTENT
            * (direction.dot(self.placement.basis(0)).abs()
                + direction.dot(self.placement.basis(1)).abs()
                + direction.dot(self.placement.basis(2)).abs());
        (self.placement.center() + direction * support, -direction)
    }

    /// Whether a world point participates in this grind.
    ///
    /// The test runs in the local frame against the axis selected by the
    /// enum, even when a custom direction overrides the reported grind
    /// direction: lateral coordinates must stay within the half-extent, and
    /// the axis coordinate must lie strictly on the carved side of the
    /// leading face.
    pub fn should_grind(&self, point: Vec3) -> bool {
        let local = self.placement.to_local(point);
        let (u, v) = self.axis.lateral();
        if local[u].abs() > HALF_EXTENT || local[v].abs() > HALF_EXTENT {
            return false;
        }
        self.axis.sign() * local[self.axis.index()] < HALF_EXTENT
    }

    /// Project a point onto the leading face: the axis coordinate becomes
    /// the face coordinate, the lateral coordinates are untouched.
    pub fn grind_target(&self, point: Vec3) -> Vec3 {
        let mut local = self.placement.to_local(point);
        local[self.axis.index()] = HALF_EXTENT * self.axis.sign();
        self.placement.to_world(local)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Affine3A, Quat};

    fn down_grinder() -> GrinderTool {
        GrinderTool::new(ToolPlacement::identity(), SignedAxis::NegY)
    }

    #[test]
    fn test_grind_direction_from_axis() {
        let grinder = down_grinder();
        assert_eq!(grinder.axis(), SignedAxis::NegY);
        assert_eq!(grinder.grind_direction(), -Vec3::Y);
    }

    #[test]
    fn test_grind_plane_touches_leading_face() {
        let (point, normal) = down_grinder().grind_plane();
        assert!((point - Vec3::new(0.0, -0.5, 0.0)).length() < 1e-6);
        assert!((normal - Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn test_grind_plane_of_rotated_box() {
        let placement = ToolPlacement::new(Affine3A::from_rotation_translation(
            Quat::from_rotation_z(std::f32::consts::FRAC_PI_4),
            Vec3::ZERO,
        ));

        // Along its own local axis the box always presents a face, rotated
        // or not: support extent stays at the half-extent.
        let grinder = GrinderTool::new(placement, SignedAxis::NegY);
        let (point, _) = grinder.grind_plane();
        let direction = grinder.grind_direction();
        assert!((point - direction * 0.5).length() < 1e-5);

        // A custom world-space direction can present an edge instead: the
        // projected extent of the rotated box along -Y is sqrt(2)/2.
        let grinder = GrinderTool::new(placement, SignedAxis::NegY).with_custom_direction(-Vec3::Y);
        let (point, normal) = grinder.grind_plane();
        let expected = 0.5 * std::f32::consts::SQRT_2;
        assert!((point.y + expected).abs() < 1e-5);
        assert!((normal - Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn test_should_grind_point_above_face() {
        let grinder = down_grinder();
        assert!(grinder.should_grind(Vec3::new(0.0, 2.0, 0.0)));
        assert!(grinder.should_grind(Vec3::new(0.0, 0.0, 0.0)));
        // Past the leading face on the un-carved side.
        assert!(!grinder.should_grind(Vec3::new(0.0, -0.6, 0.0)));
    }

    #[test]
    fn test_should_grind_rejects_lateral_overhang() {
        let grinder = down_grinder();
        assert!(!grinder.should_grind(Vec3::new(0.6, 2.0, 0.0)));
        assert!(!grinder.should_grind(Vec3::new(0.0, 2.0, -0.7)));
    }

    #[test]
    fn test_grind_target_lands_on_face() {
        let target = down_grinder().grind_target(Vec3::new(0.2, 2.0, -0.3));
        assert!((target - Vec3::new(0.2, -0.5, -0.3)).length() < 1e-6);
    }

    #[test]
    fn test_custom_direction_overrides_reported_direction_only() {
        let grinder = down_grinder().with_custom_direction(Vec3::X);
        assert_eq!(grinder.grind_direction(), Vec3::X);
        // The participation test still runs against the enum axis.
        assert!(grinder.should_grind(Vec3::new(0.0, 2.0, 0.0)));
        assert!(!grinder.should_grind(Vec3::new(0.6, 2.0, 0.0)));
        // And the target still projects onto the enum-axis face.
        let target = grinder.grind_target(Vec3::new(0.0, 2.0, 0.0));
        assert!((target - Vec3::new(0.0, -0.5, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_zero_custom_direction_falls_back_to_axis() {
        let grinder = down_grinder().with_custom_direction(Vec3::ZERO);
        assert_eq!(grinder.grind_direction(), -Vec3::Y);
    }
}
