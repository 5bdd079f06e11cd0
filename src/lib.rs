//! # mesh-tear
//!
//! mesh-tear prepares unstructured finite-element meshes for simulations that
//! need explicit interface elements between regions: cohesive-zone models,
//! polycrystal grain-boundary models, or fully fractured meshes. Given nodes
//! and material-tagged elements, it decides which nodes must be split,
//! creates the duplicate nodes, and rewires element connectivity so that
//! neighbouring elements no longer share them.
//!
//! ## Pipeline
//! 1. **Topology index**: node support (incident elements, ingestion order)
//!    and element neighbors.
//! 2. **Classification**: per-node material count, interface / rigid /
//!    boundary flags and duplicity under the chosen [`TearPolicy`].
//! 3. **Duplication**: `duplicity - 1` fresh nodes per split node and the
//!    `original -> [original, copies..]` map.
//! 4. **Tearing**: connectivity rewiring, policy by policy.
//!
//! ## Determinism
//!
//! Support order follows element ingestion order and neighbor lists are
//! sorted by element id, so two runs on the same input produce identical ids
//! and connectivity.
//!
//! ## Usage
//! ```rust
//! use mesh_tear::prelude::*;
//!
//! let mut mesh = Mesh::new();
//! for (i, xy) in [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]].iter().enumerate() {
//!     mesh.add_node(NodeId::new(i as u64 + 1), [xy[0], xy[1], 0.0]).unwrap();
//! }
//! let tri = ElementType::Triangle3;
//! let ids = |v: [u64; 3]| v.map(NodeId::new);
//! mesh.add_element(ElementId::new(0), tri, MaterialId::new(1), ids([1, 2, 3])).unwrap();
//! mesh.add_element(ElementId::new(1), tri, MaterialId::new(2), ids([1, 3, 4])).unwrap();
//!
//! let mut ctx = MeshContext::new(mesh, TearOptions::new(TearPolicy::Interface)).unwrap();
//! let summary = ctx.run().unwrap();
//! assert_eq!(summary.nodes_added, 2);
//! assert_eq!(ctx.baseline().get(NodeId::new(1)).unwrap().len(), 2);
//! ```

pub mod algs;
pub mod config;
pub mod debug_invariants;
pub mod geometry;
pub mod mesh_error;
pub mod topology;

pub use config::{TearOptions, TearPolicy};
pub use debug_invariants::DebugInvariants;
pub use mesh_error::{ErrorKind, MeshTearError, Stage};

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::algs::duplicate::DuplicatedNodes;
    pub use crate::algs::pipeline::{tear_mesh, MeshContext, TearOutput, TearSummary};
    pub use crate::config::{TearOptions, TearPolicy};
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::geometry::segment::{IgnoredSegment, Segment};
    pub use crate::mesh_error::{ErrorKind, MeshTearError};
    pub use crate::topology::cell_type::ElementType;
    pub use crate::topology::mesh::{Element, Mesh, Node};
    pub use crate::topology::point::{ElementId, MaterialId, NodeId, NodePair};
}
