//! Triangle-mesh support for the carving system.
//!
//! This crate provides the mesh-side building blocks consumed by the
//! `carving` crate:
//! - Axis-aligned bounding boxes with ray and sphere tests
//! - Raw vertex/triangle buffers with normal and bounds recomputation
//! - Ray/triangle and closest-point-on-triangle primitives
//! - A static surface index for ray and nearest-point queries

pub mod aabb;
pub mod buffers;
pub mod index;
pub mod raycast;

pub use aabb::Aabb;
pub use buffers::{MeshBuffers, MeshError};
pub use index::{SurfaceHit, SurfaceIndex};
pub use raycast::{closest_point_on_triangle, ray_triangle_intersection, TriangleHit};
