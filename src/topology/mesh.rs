//! Node and element records plus the [`Mesh`] arena that owns them.
//!
//! The mesh is the hand-off point from ingestion: a reader (Gmsh, Abaqus, a
//! generator) pushes nodes and bulk elements in file order, marks external
//! boundary nodes, and passes the `Mesh` to
//! [`MeshContext`](crate::algs::pipeline::MeshContext). Insertion order is
//! preserved everywhere because it decides which element keeps which node id
//! during tearing.

use std::collections::{BTreeSet, HashSet};

use crate::mesh_error::MeshTearError;
use crate::topology::cell_type::ElementType;
use crate::topology::point::{ElementId, MaterialId, NodeId};

/// Classification flags set on a node by the interface classifier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct NodeFlags {
    /// Touched by elements of more than one material.
    pub interface: bool,
    /// Inside the rigid domain; never split.
    pub rigid: bool,
    /// Member of the external boundary-node set.
    pub on_boundary: bool,
}

/// A mesh node.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Node {
    id: NodeId,
    coords: [f64; 3],
    duplicity: usize,
    flags: NodeFlags,
}

impl Node {
    /// New node with duplicity 1 and no flags set.
    pub fn new(id: NodeId, coords: [f64; 3]) -> Self {
        Self {
            id,
            coords,
            duplicity: 1,
            flags: NodeFlags::default(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn coords(&self) -> [f64; 3] {
        self.coords
    }

    /// Number of copies (original included) this node is split into.
    pub fn duplicity(&self) -> usize {
        self.duplicity
    }

    pub fn flags(&self) -> NodeFlags {
        self.flags
    }

    pub fn is_interface(&self) -> bool {
        self.flags.interface
    }

    pub fn is_rigid(&self) -> bool {
        self.flags.rigid
    }

    pub fn is_on_boundary(&self) -> bool {
        self.flags.on_boundary
    }

    pub(crate) fn set_duplicity(&mut self, duplicity: usize) {
        self.duplicity = duplicity;
    }

    pub(crate) fn flags_mut(&mut self) -> &mut NodeFlags {
        &mut self.flags
    }

    /// A fresh copy at the same position: new id, duplicity 1, flags unset.
    pub(crate) fn duplicate_as(&self, id: NodeId) -> Node {
        Node::new(id, self.coords)
    }
}

/// A bulk element.
///
/// Connectivity order is geometrically meaningful; tearing only ever
/// replaces individual entries in place.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Element {
    id: ElementId,
    kind: ElementType,
    material: MaterialId,
    connectivity: Vec<NodeId>,
    faces: Vec<Vec<NodeId>>,
}

impl Element {
    /// Builds an element, checking the connectivity length against the type.
    /// Three-dimensional elements get their face table built immediately.
    pub fn new(
        id: ElementId,
        kind: ElementType,
        material: MaterialId,
        connectivity: Vec<NodeId>,
    ) -> Result<Self, MeshTearError> {
        if connectivity.len() != kind.node_count() {
            return Err(MeshTearError::ConnectivityLength {
                element: id,
                expected: kind.node_count(),
                found: connectivity.len(),
            });
        }
        let mut element = Self {
            id,
            kind,
            material,
            connectivity,
            faces: Vec::new(),
        };
        element.rebuild_faces();
        Ok(element)
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn kind(&self) -> ElementType {
        self.kind
    }

    pub fn material(&self) -> MaterialId {
        self.material
    }

    pub fn connectivity(&self) -> &[NodeId] {
        &self.connectivity
    }

    /// The leading corner nodes of the connectivity.
    pub fn corner_nodes(&self) -> &[NodeId] {
        &self.connectivity[..self.kind.corner_count()]
    }

    /// Corner edges as node-id pairs, in the type's edge-table order.
    pub fn corner_edges(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        let corners = self.corner_nodes();
        self.kind
            .edges()
            .iter()
            .map(move |&[a, b]| (corners[a], corners[b]))
    }

    /// Whether both nodes appear among this element's corners.
    pub fn has_corner_edge(&self, n1: NodeId, n2: NodeId) -> bool {
        let corners = self.corner_nodes();
        corners.contains(&n1) && corners.contains(&n2)
    }

    /// Face table (corner node ids per face); empty for planar elements.
    pub fn faces(&self) -> &[Vec<NodeId>] {
        &self.faces
    }

    /// Rewrites the first connectivity entry equal to `old` to `new`.
    ///
    /// Returns `false` when `old` is not part of the connectivity.
    pub fn replace_node(&mut self, old: NodeId, new: NodeId) -> bool {
        match self.connectivity.iter_mut().find(|n| **n == old) {
            Some(slot) => {
                *slot = new;
                true
            }
            None => false,
        }
    }

    /// Recomputes the face table from the current connectivity. Idempotent.
    pub fn rebuild_faces(&mut self) {
        let corners = &self.connectivity[..self.kind.corner_count()];
        self.faces = self
            .kind
            .faces()
            .iter()
            .map(|face| face.iter().map(|&i| corners[i]).collect())
            .collect();
    }
}

/// The in-memory mesh: node arena, element arena and boundary-node set.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    nodes: Vec<Node>,
    elements: Vec<Element>,
    boundary: BTreeSet<NodeId>,
    node_ids: HashSet<NodeId>,
    element_ids: HashSet<ElementId>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a node in ingestion order.
    pub fn add_node(&mut self, id: NodeId, coords: [f64; 3]) -> Result<(), MeshTearError> {
        if !self.node_ids.insert(id) {
            return Err(MeshTearError::DuplicateNodeId(id));
        }
        self.nodes.push(Node::new(id, coords));
        Ok(())
    }

    /// Appends a bulk element in ingestion order.
    ///
    /// Connectivity ids are not resolved here; unknown ids surface as lookup
    /// errors when the topology index is built.
    pub fn add_element<I>(
        &mut self,
        id: ElementId,
        kind: ElementType,
        material: MaterialId,
        connectivity: I,
    ) -> Result<(), MeshTearError>
    where
        I: IntoIterator<Item = NodeId>,
    {
        if self.element_ids.contains(&id) {
            return Err(MeshTearError::DuplicateElementId(id));
        }
        let element = Element::new(id, kind, material, connectivity.into_iter().collect())?;
        self.element_ids.insert(id);
        self.elements.push(element);
        Ok(())
    }

    /// Adds `id` to the external boundary-node set.
    pub fn mark_boundary(&mut self, id: NodeId) {
        self.boundary.insert(id);
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn boundary_nodes(&self) -> &BTreeSet<NodeId> {
        &self.boundary
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// True when any element is three-dimensional.
    pub fn is_3d(&self) -> bool {
        self.elements.iter().any(|e| e.kind().dimension() == 3)
    }

    pub fn contains_material(&self, material: MaterialId) -> bool {
        self.elements.iter().any(|e| e.material() == material)
    }

    /// Largest node id, if any node exists.
    pub fn max_node_id(&self) -> Option<NodeId> {
        self.nodes.iter().map(Node::id).max()
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut [Node] {
        &mut self.nodes
    }

    pub(crate) fn elements_mut(&mut self) -> &mut [Element] {
        &mut self.elements
    }

    /// Appends a node created by the duplicator. Returns its arena position.
    pub(crate) fn push_duplicate(&mut self, node: Node) -> Result<usize, MeshTearError> {
        if !self.node_ids.insert(node.id()) {
            return Err(MeshTearError::DuplicateNodeId(node.id()));
        }
        self.nodes.push(node);
        Ok(self.nodes.len() - 1)
    }

    pub(crate) fn into_parts(self) -> (Vec<Node>, Vec<Element>) {
        (self.nodes, self.elements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(i: u64) -> NodeId {
        NodeId::new(i)
    }

    #[test]
    fn rejects_duplicate_ids() {
        let mut mesh = Mesh::new();
        mesh.add_node(n(1), [0.0; 3]).unwrap();
        assert_eq!(
            mesh.add_node(n(1), [1.0, 0.0, 0.0]),
            Err(MeshTearError::DuplicateNodeId(n(1)))
        );
        let tri = [n(1), n(2), n(3)];
        mesh.add_element(ElementId::new(0), ElementType::Triangle3, MaterialId::new(1), tri)
            .unwrap();
        assert_eq!(
            mesh.add_element(ElementId::new(0), ElementType::Triangle3, MaterialId::new(1), tri),
            Err(MeshTearError::DuplicateElementId(ElementId::new(0)))
        );
    }

    #[test]
    fn rejects_short_connectivity() {
        let err = Element::new(
            ElementId::new(3),
            ElementType::Quadrangle4,
            MaterialId::new(1),
            vec![n(1), n(2), n(3)],
        )
        .unwrap_err();
        assert_eq!(
            err,
            MeshTearError::ConnectivityLength {
                element: ElementId::new(3),
                expected: 4,
                found: 3
            }
        );
    }

    #[test]
    fn replace_keeps_position() {
        let mut e = Element::new(
            ElementId::new(0),
            ElementType::Quadrangle4,
            MaterialId::new(1),
            vec![n(1), n(2), n(3), n(4)],
        )
        .unwrap();
        assert!(e.replace_node(n(3), n(30)));
        assert!(!e.replace_node(n(99), n(100)));
        assert_eq!(e.connectivity(), &[n(1), n(2), n(30), n(4)]);
    }

    #[test]
    fn corner_edges_of_quadratic_triangle_skip_midside_nodes() {
        let e = Element::new(
            ElementId::new(0),
            ElementType::Triangle6,
            MaterialId::new(1),
            (1..=6).map(n).collect(),
        )
        .unwrap();
        let edges: Vec<_> = e.corner_edges().collect();
        assert_eq!(edges, vec![(n(1), n(2)), (n(2), n(3)), (n(3), n(1))]);
        assert!(e.faces().is_empty());
    }

    #[test]
    fn tetrahedron_faces_follow_connectivity() {
        let mut e = Element::new(
            ElementId::new(0),
            ElementType::Tetrahedron4,
            MaterialId::new(1),
            vec![n(1), n(2), n(3), n(4)],
        )
        .unwrap();
        assert_eq!(e.faces().len(), 4);
        assert_eq!(e.faces()[0], vec![n(1), n(3), n(2)]);

        e.replace_node(n(1), n(10));
        assert_eq!(e.faces()[0], vec![n(1), n(3), n(2)]);
        e.rebuild_faces();
        e.rebuild_faces();
        assert_eq!(e.faces()[0], vec![n(10), n(3), n(2)]);
    }

    #[test]
    fn dimension_and_materials() {
        let mut mesh = Mesh::new();
        mesh.add_element(
            ElementId::new(0),
            ElementType::Triangle3,
            MaterialId::new(2),
            [n(1), n(2), n(3)],
        )
        .unwrap();
        assert!(!mesh.is_3d());
        assert!(mesh.contains_material(MaterialId::new(2)));
        assert!(!mesh.contains_material(MaterialId::new(7)));
    }
}
