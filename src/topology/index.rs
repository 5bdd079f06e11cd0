//! Topology index: id→position lookups, node support and element neighbors.
//!
//! This is the only place that maps external ids to arena positions. Every
//! later stage resolves ids through it instead of recomputing positions.
//!
//! - *Support* of a node: the element ids incident to it, in element
//!   ingestion order (first seen, not sorted). That order is the tie-break
//!   that decides which element keeps the original node id when tearing.
//! - *Neighbors* of an element: every element sharing at least one node,
//!   **including the element itself**, sorted by element id so that
//!   "first match wins" scans are reproducible.

use std::collections::{BTreeSet, HashMap};

use crate::mesh_error::{MeshTearError, Stage};
use crate::topology::mesh::Mesh;
use crate::topology::point::{ElementId, NodeId};

/// Id lookups plus support and neighbor maps for one mesh.
#[derive(Clone, Debug, Default)]
pub struct TopologyIndex {
    node_pos: HashMap<NodeId, usize>,
    element_pos: HashMap<ElementId, usize>,
    /// Indexed by node arena position; only original nodes have entries.
    support: Vec<Vec<ElementId>>,
    /// Indexed by element arena position.
    neighbors: Vec<Vec<ElementId>>,
}

impl TopologyIndex {
    /// Indexes ids, then builds support and neighbor maps.
    pub fn build(mesh: &Mesh) -> Result<Self, MeshTearError> {
        let mut index = Self::index_ids(mesh);
        index.build_support(mesh)?;
        index.build_neighbors(mesh)?;
        Ok(index)
    }

    fn index_ids(mesh: &Mesh) -> Self {
        let node_pos = mesh
            .nodes()
            .iter()
            .enumerate()
            .map(|(pos, node)| (node.id(), pos))
            .collect();
        let element_pos = mesh
            .elements()
            .iter()
            .enumerate()
            .map(|(pos, element)| (element.id(), pos))
            .collect();
        Self {
            node_pos,
            element_pos,
            support: Vec::new(),
            neighbors: Vec::new(),
        }
    }

    /// Appends each element's id to the support of every node in its
    /// connectivity, walking elements in ingestion order.
    pub fn build_support(&mut self, mesh: &Mesh) -> Result<(), MeshTearError> {
        let mut support = vec![Vec::new(); mesh.node_count()];
        for element in mesh.elements() {
            for &node in element.connectivity() {
                let pos = self.resolve_node(node, Stage::Support)?;
                support[pos].push(element.id());
            }
        }
        self.support = support;
        Ok(())
    }

    /// Unions the support lists over each element's nodes.
    ///
    /// Requires [`build_support`](Self::build_support) to have run.
    pub fn build_neighbors(&mut self, mesh: &Mesh) -> Result<(), MeshTearError> {
        let mut neighbors = Vec::with_capacity(mesh.element_count());
        for element in mesh.elements() {
            let mut set = BTreeSet::new();
            for &node in element.connectivity() {
                let pos = self.resolve_node(node, Stage::Neighbors)?;
                set.extend(self.support.get(pos).into_iter().flatten().copied());
            }
            neighbors.push(set.into_iter().collect());
        }
        self.neighbors = neighbors;
        Ok(())
    }

    /// Arena position of a node, if known.
    pub fn node_position(&self, id: NodeId) -> Option<usize> {
        self.node_pos.get(&id).copied()
    }

    /// Arena position of an element, if known.
    pub fn element_position(&self, id: ElementId) -> Option<usize> {
        self.element_pos.get(&id).copied()
    }

    /// Like [`node_position`](Self::node_position), failing with a lookup
    /// error tagged with `stage`.
    pub fn resolve_node(&self, id: NodeId, stage: Stage) -> Result<usize, MeshTearError> {
        self.node_position(id)
            .ok_or(MeshTearError::UnknownNode { node: id, stage })
    }

    pub fn resolve_element(&self, id: ElementId, stage: Stage) -> Result<usize, MeshTearError> {
        self.element_position(id)
            .ok_or(MeshTearError::UnknownElement { element: id, stage })
    }

    /// Elements incident to `node`, in ingestion order. Empty for unknown
    /// nodes and for duplicates created after the index was built.
    pub fn support(&self, node: NodeId) -> &[ElementId] {
        self.node_position(node)
            .and_then(|pos| self.support.get(pos))
            .map_or(&[][..], Vec::as_slice)
    }

    pub fn support_count(&self, node: NodeId) -> usize {
        self.support(node).len()
    }

    /// Total number of (node, incident element) pairs.
    pub fn incidence_count(&self) -> usize {
        self.support.iter().map(Vec::len).sum()
    }

    /// Elements sharing a node with `element`, itself included, by id.
    pub fn neighbors(&self, element: ElementId) -> &[ElementId] {
        self.element_position(element)
            .and_then(|pos| self.neighbors.get(pos))
            .map_or(&[][..], Vec::as_slice)
    }

    /// [`neighbors`](Self::neighbors) without `element` itself.
    pub fn strict_neighbors(&self, element: ElementId) -> impl Iterator<Item = ElementId> + '_ {
        self.neighbors(element)
            .iter()
            .copied()
            .filter(move |&e| e != element)
    }

    /// Records the arena position of a node created after indexing.
    pub(crate) fn register_node(&mut self, id: NodeId, pos: usize) {
        self.node_pos.insert(id, pos);
    }
}
