//! MeshTearError: unified error type for mesh-tear public APIs.
//!
//! Every stage of the pipeline is a total function of its input except for
//! the exits listed here. Variants fall into four kinds (see [`ErrorKind`]):
//! rejected input while assembling a [`Mesh`](crate::topology::mesh::Mesh),
//! incompatible configuration, unresolved ids, and broken internal
//! invariants.

use std::fmt;

use thiserror::Error;

use crate::topology::point::{ElementId, MaterialId, NodeId};

/// Pipeline stage in which an id failed to resolve.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Building the node support lists.
    Support,
    /// Building the element neighbor lists.
    Neighbors,
    /// Classifying interfacial / rigid nodes.
    Classify,
    /// Creating duplicate nodes.
    Duplicate,
    /// Rewriting element connectivity.
    Tear,
    /// Post-run invariant validation.
    Validate,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Support => "support",
            Stage::Neighbors => "neighbors",
            Stage::Classify => "classify",
            Stage::Duplicate => "duplicate",
            Stage::Tear => "tear",
            Stage::Validate => "validate",
        };
        f.write_str(name)
    }
}

/// Coarse category of a [`MeshTearError`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The mesh handed over by ingestion was rejected while being assembled.
    Input,
    /// Policy parameters are missing or incompatible with the mesh.
    Configuration,
    /// A node or element id could not be resolved (upstream corruption).
    Lookup,
    /// An internal invariant was broken; never triggered by valid input.
    Invariant,
}

/// Unified error type for mesh-tear operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MeshTearError {
    /// A node id was added to the mesh twice.
    #[error("Mesh input error: duplicate node id `{0}`")]
    DuplicateNodeId(NodeId),
    /// An element id was added to the mesh twice.
    #[error("Mesh input error: duplicate element id `{0}`")]
    DuplicateElementId(ElementId),
    /// Connectivity length does not match the element type.
    #[error(
        "Mesh input error: element `{element}` expects {expected} nodes, found {found}"
    )]
    ConnectivityLength {
        element: ElementId,
        expected: usize,
        found: usize,
    },
    /// Element type code with no solid element counterpart.
    #[error("Mesh input error: unsupported element type code {0}")]
    UnknownElementType(u32),
    /// A duplicate node needs an id past `u64::MAX`.
    #[error("Mesh input error: no node id left after `{last}` for duplicate nodes")]
    NodeIdExhausted { last: NodeId },

    /// Domain policy selected without a rigid-domain id.
    #[error("Configuration error: domain policy requires a rigid domain id")]
    RigidDomainRequired,
    /// The rigid-domain id matches no element material in the mesh.
    #[error("Configuration error: rigid domain `{domain}` matches no material in the mesh")]
    RigidDomainNotFound { domain: MaterialId },

    /// A node id referenced by connectivity or support is not in the mesh.
    #[error("Lookup error: node `{node}` cannot be resolved (stage: {stage})")]
    UnknownNode { node: NodeId, stage: Stage },
    /// An element id referenced by support or neighbor lists is not in the mesh.
    #[error("Lookup error: element `{element}` cannot be resolved (stage: {stage})")]
    UnknownElement { element: ElementId, stage: Stage },

    /// A node ended up with a duplicity below one.
    #[error("Invariant violation: node `{node}` has duplicity {duplicity}")]
    InvalidDuplicity { node: NodeId, duplicity: usize },
    /// A duplicated-nodes entry disagrees with the node's duplicity.
    #[error(
        "Invariant violation: node `{node}` has duplicity {duplicity} but {slots} duplicate slots"
    )]
    DuplicateSlotMismatch {
        node: NodeId,
        duplicity: usize,
        slots: usize,
    },
    /// Tearing asked for a duplicate slot that was never created.
    #[error("Invariant violation: node `{node}` has no duplicate slot {slot}")]
    MissingDuplicateSlot { node: NodeId, slot: usize },
    /// After tearing, an element references a node absent from the node set.
    #[error("Invariant violation: element `{element}` references missing node `{node}`")]
    DanglingReference { element: ElementId, node: NodeId },
    /// The pipeline was invoked a second time on the same context.
    #[error("Invariant violation: mesh context has already been torn")]
    AlreadyTorn,
}

impl MeshTearError {
    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            MeshTearError::DuplicateNodeId(_)
            | MeshTearError::DuplicateElementId(_)
            | MeshTearError::ConnectivityLength { .. }
            | MeshTearError::UnknownElementType(_)
            | MeshTearError::NodeIdExhausted { .. } => ErrorKind::Input,
            MeshTearError::RigidDomainRequired | MeshTearError::RigidDomainNotFound { .. } => {
                ErrorKind::Configuration
            }
            MeshTearError::UnknownNode { .. } | MeshTearError::UnknownElement { .. } => {
                ErrorKind::Lookup
            }
            MeshTearError::InvalidDuplicity { .. }
            | MeshTearError::DuplicateSlotMismatch { .. }
            | MeshTearError::MissingDuplicateSlot { .. }
            | MeshTearError::DanglingReference { .. }
            | MeshTearError::AlreadyTorn => ErrorKind::Invariant,
        }
    }
}
