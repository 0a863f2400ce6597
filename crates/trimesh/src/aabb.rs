//! Axis-aligned bounding boxes.

use glam::{Affine3A, Vec3};

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// An inverted box that grows to fit the first point included.
    pub fn empty() -> Self {
        Self {
            min: Vec3::splat(f32::MAX),
            max: Vec3::splat(f32::MIN),
        }
    }

    /// Build the tightest box around a set of points.
    ///
    /// Returns an empty (inverted) box when the iterator yields nothing.
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        let mut bounds = Self::empty();
        for p in points {
            bounds.include_point(p);
        }
        bounds
    }

    pub fn include_point(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn contains_point(&self, point: Vec3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }

    /// Clamp a point into the box, independently per axis.
    pub fn clamp_point(&self, point: Vec3) -> Vec3 {
        point.clamp(self.min, self.max)
    }

    pub fn intersects_sphere(&self, center: Vec3, radius: f32) -> bool {
        self.clamp_point(center).distance_squared(center) <= radius * radius
    }

    /// Squared distance from a point to the box (zero inside).
    pub fn distance_squared(&self, point: Vec3) -> f32 {
        self.clamp_point(point).distance_squared(point)
    }

    /// Slab test. Returns the entry/exit parameters along the ray, with the
    /// entry clamped to zero for origins inside the box. `None` on a miss.
    pub fn ray_intersect(&self, origin: Vec3, direction: Vec3) -> Option<(f32, f32)> {
        let mut t_enter = 0.0_f32;
        let mut t_exit = f32::MAX;

        for axis in 0..3 {
            let o = origin[axis];
            let d = direction[axis];
            if d.abs() < 1e-12 {
                // Parallel to the slab: either always inside it or never.
                if o < self.min[axis] || o > self.max[axis] {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / d;
            let mut t0 = (self.min[axis] - o) * inv;
            let mut t1 = (self.max[axis] - o) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_enter = t_enter.max(t0);
            t_exit = t_exit.min(t1);
            if t_enter > t_exit {
                return None;
            }
        }

        Some((t_enter, t_exit))
    }

    /// World-space box covering this local-space box under an affine
    /// transform, via the hull of its eight corners.
    pub fn transformed(&self, transform: Affine3A) -> Aabb {
        let mut out = Aabb::empty();
        for i in 0..8 {
            let corner = Vec3::new(
                if i & 1 != 0 { self.max.x } else { self.min.x },
                if i & 2 != 0 { self.max.y } else { self.min.y },
                if i & 4 != 0 { self.max.z } else { self.min.z },
            );
            out.include_point(transform.transform_point3(corner));
        }
        out
    }
}
