//! # Loft Mesh
//!
//! Quad-mesh lofting for thin-walled vessels: cups, bowls, plates, pots and
//! their lids. A vessel is an ordered stack of closed vertex loops; the
//! builder stitches consecutive loops into quads, closes ends with
//! concentric quad caps or pole fans, and welds separately built parts
//! through named openings.
//!
//! ## Architecture
//!
//! ```text
//! CurveSampler ──▶ LoopFactory ──▶ [EdgeLoop] ──▶ DisplacementEngine / solidify
//!                                      │
//!                                      ▼
//!                                 MeshBuilder ──▶ LoopBridge ──▶ VertexCuller
//!                                      │                              │
//!                                      ▼                              ▼
//!                                    Mesh ◀── MeshJoiner ◀── OpeningRegistry
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use loft_mesh::{LoopFactory, LoopShape, MeshBuilder};
//!
//! let factory = LoopFactory::new(LoopShape::Circle { radius: 30.0 });
//! let mut builder = MeshBuilder::new();
//! builder.add_loops(factory.emit_cap(32, 0.0, false)?);
//! builder.add_loop(factory.emit_loop(32, 40.0)?);
//! builder.add_loops(factory.emit_cap(32, 80.0, true)?);
//! let mesh = builder.build()?;
//! assert!(mesh.validate().is_ok());
//! # Ok::<(), loft_mesh::MeshError>(())
//! ```

pub mod bridge;
pub mod builder;
pub mod cull;
pub mod curve;
pub mod displace;
pub mod edge_loop;
pub mod error;
pub mod mesh;
pub mod openings;
pub mod shapes;
pub mod solidify;

pub use bridge::bridge;
pub use builder::MeshBuilder;
pub use cull::VertexCuller;
pub use curve::{resample_loops, sample_closed_shape, CurveSampler};
pub use displace::{
    emboss_z, DataCurve, DisplaceDirection, DisplacementEngine, DisplacementSignal,
    GridProjection, GridSignal, NormalFrame, SampleGrid, SamplePoint,
};
pub use edge_loop::{lerp_loop, EdgeLoop, OpeningTag, PartialRange, VertexSlot};
pub use error::{MeshError, MeshResult};
pub use mesh::{Face, Mesh, Opening};
pub use openings::{JoinSpec, MeshJoiner, OpeningRegistry};
pub use shapes::cap::{cap_face_count, cap_loop, CapGrid};
pub use shapes::{LoopFactory, LoopShape};
pub use solidify::solidify;
