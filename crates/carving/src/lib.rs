//! Runtime mesh carving.
//!
//! This crate lets interactive tools permanently deform a mesh's surface
//! while guaranteeing the deformed surface never escapes the original
//! geometry's bounds, and keeping the topology valid after repeated
//! deformation:
//!
//! - **Tools**: a cylindrical drill that pushes vertices radially to its
//!   wall, and an oriented-box grinder that planes vertices onto its
//!   leading face
//! - **Containment**: a layered constraint combining a bounding-box clamp
//!   with ray and nearest-point queries against the original surface
//! - **Welding**: merges near-duplicate vertices and drops collapsed
//!   triangles after repeated deformation
//!
//! # Example
//!
//! ```
//! use carving::{CarveConfig, CarveTool, DeformableMesh, DrillTool, SignedAxis, ToolPlacement};
//! use glam::{Affine3A, Vec3};
//! use trimesh::MeshBuffers;
//!
//! let buffers = MeshBuffers::new(
//!     vec![
//!         Vec3::new(-1.0, 0.0, -1.0),
//!         Vec3::new(1.0, 0.0, -1.0),
//!         Vec3::new(1.0, 0.0, 1.0),
//!         Vec3::new(-1.0, 0.0, 1.0),
//!     ],
//!     vec![[0, 2, 1], [0, 3, 2]],
//! );
//! let mut mesh =
//!     DeformableMesh::new(buffers, None, Affine3A::IDENTITY, CarveConfig::default()).unwrap();
//!
//! let drill = DrillTool::new(ToolPlacement::identity(), SignedAxis::NegY, 0.5, 4.0);
//! let affected = mesh.apply_tool(&CarveTool::from(drill));
//! let stats = mesh.weld();
//! # let _ = (affected, stats);
//! ```

pub mod constraint;
pub mod deformable;
pub mod feedback;
pub mod tools;
pub mod types;
pub mod weld;

pub use constraint::SurfaceConstraint;
pub use deformable::{DeformableMesh, MeshSnapshot};
pub use feedback::CarveFeedback;
pub use tools::{CarveTool, DrillTool, GrinderTool, ToolPlacement};
pub use types::{CarveConfig, CarveError, SignedAxis};
pub use weld::{weld_mesh, WeldStats};
