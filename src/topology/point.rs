//! Strong id handles for mesh entities.
//!
//! Nodes, elements and material domains are all identified by plain integers
//! in mesh files. Wrapping each in its own newtype keeps them from being mixed
//! up while passing through the topology maps:
//! - [`NodeId`] is the stable external id of a node (original or duplicate).
//! - [`ElementId`] is the stable external id of a bulk element.
//! - [`MaterialId`] is the material/domain tag carried by each element.
//!
//! Ids are the only cross-reference mechanism between records; positions in
//! the node/element arenas are resolved through
//! [`TopologyIndex`](crate::topology::index::TopologyIndex).

use std::fmt;

/// Stable id of a mesh node.
///
/// # Memory layout
/// `repr(transparent)` over `u64`, so slices of ids have the same layout as
/// raw id arrays.
#[derive(
    Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[repr(transparent)]
#[serde(transparent)]
pub struct NodeId(u64);

impl NodeId {
    /// Wraps a raw node id.
    #[inline]
    pub const fn new(raw: u64) -> Self {
        NodeId(raw)
    }

    /// Returns the raw integer id.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Returns the id immediately following this one, or `None` past
    /// `u64::MAX`.
    #[inline]
    pub(crate) const fn checked_next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(raw) => Some(NodeId(raw)),
            None => None,
        }
    }
}

/// Stable id of a bulk element.
#[derive(
    Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[repr(transparent)]
#[serde(transparent)]
pub struct ElementId(u64);

impl ElementId {
    #[inline]
    pub const fn new(raw: u64) -> Self {
        ElementId(raw)
    }

    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Material (domain, grain) tag of an element.
///
/// Signed because mesh generators commonly reserve negative physical tags.
#[derive(
    Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[repr(transparent)]
#[serde(transparent)]
pub struct MaterialId(i32);

impl MaterialId {
    #[inline]
    pub const fn new(raw: i32) -> Self {
        MaterialId(raw)
    }

    #[inline]
    pub const fn get(self) -> i32 {
        self.0
    }
}

// -----------------------------------------------------------------------------
// Formatting traits
// -----------------------------------------------------------------------------

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NodeId").field(&self.0).finish()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ElementId").field(&self.0).finish()
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for MaterialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MaterialId").field(&self.0).finish()
    }
}

impl fmt::Display for MaterialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An unordered-by-meaning pair of node ids, stored in the orientation in
/// which it was first encountered.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct NodePair(pub NodeId, pub NodeId);

impl NodePair {
    /// The pair with its smaller id first; two pairs describe the same edge
    /// iff their canonical forms are equal.
    pub fn canonical(self) -> (NodeId, NodeId) {
        if self.0 <= self.1 {
            (self.0, self.1)
        } else {
            (self.1, self.0)
        }
    }
}

impl fmt::Display for NodePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.0, self.1)
    }
}
