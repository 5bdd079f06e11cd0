//! Mesh topology: ids, element types, node/element records and the
//! support/neighbor index built over them.
//!
//! Most users build a [`Mesh`](mesh::Mesh) and hand it to the pipeline; the
//! [`TopologyIndex`](index::TopologyIndex) is built by the first stage.

pub mod cell_type;
pub mod index;
pub mod mesh;
pub mod point;

pub use cell_type::ElementType;
pub use index::TopologyIndex;
pub use mesh::{Element, Mesh, Node, NodeFlags};
pub use point::{ElementId, MaterialId, NodeId, NodePair};
