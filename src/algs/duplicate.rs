//! Node duplication.
//!
//! Materializes `duplicity - 1` copies of each node that the active policy
//! splits, and records `original -> [original, copy_1, ..]`.

use std::collections::BTreeMap;

use crate::config::{TearOptions, TearPolicy};
use crate::mesh_error::{MeshTearError, Stage};
use crate::topology::index::TopologyIndex;
use crate::topology::mesh::{Mesh, Node};
use crate::topology::point::NodeId;

/// Map from an original node to its duplicate slots.
///
/// Slot 0 is always the original id; slots `1..` are the copies in creation
/// order. The slot count equals the node's duplicity.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct DuplicatedNodes {
    slots: BTreeMap<NodeId, Vec<NodeId>>,
}

impl DuplicatedNodes {
    pub fn new() -> Self {
        Self::default()
    }

    /// All slots of `node`, if it was entered.
    pub fn get(&self, node: NodeId) -> Option<&[NodeId]> {
        self.slots.get(&node).map(Vec::as_slice)
    }

    /// Slot `slot` of `node`.
    pub fn slot(&self, node: NodeId, slot: usize) -> Option<NodeId> {
        self.slots.get(&node).and_then(|s| s.get(slot)).copied()
    }

    /// Like [`slot`](Self::slot), failing with an invariant error.
    pub fn require_slot(&self, node: NodeId, slot: usize) -> Result<NodeId, MeshTearError> {
        self.slot(node, slot)
            .ok_or(MeshTearError::MissingDuplicateSlot { node, slot })
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.slots.contains_key(&node)
    }

    /// Number of entered nodes.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Entries in ascending original-id order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &[NodeId])> {
        self.slots.iter().map(|(&k, v)| (k, v.as_slice()))
    }

    /// Total number of copies created (slot 0 excluded).
    pub fn copies(&self) -> usize {
        self.slots.values().map(|s| s.len() - 1).sum()
    }

    fn insert(&mut self, node: NodeId, slots: Vec<NodeId>) {
        self.slots.insert(node, slots);
    }
}

/// Whether the policy leaves `node` out of the duplicated-nodes map.
fn skipped_by_policy(policy: TearPolicy, node: &Node) -> bool {
    match policy {
        TearPolicy::Interface | TearPolicy::Polycrystal => !node.is_interface(),
        TearPolicy::Domain => node.is_rigid(),
        TearPolicy::Everywhere => false,
    }
}

/// Creates duplicate nodes for every original node the policy splits.
///
/// New ids start right after the largest original id and increase by one
/// per copy; running past `u64::MAX` fails with
/// [`MeshTearError::NodeIdExhausted`]. Copies are appended to the mesh and
/// registered in the index. Nodes kept whole (duplicity 1) still get their
/// one-slot entry. In converter mode nothing is created and the returned map
/// is empty.
pub fn duplicate_nodes(
    mesh: &mut Mesh,
    index: &mut TopologyIndex,
    options: &TearOptions,
) -> Result<DuplicatedNodes, MeshTearError> {
    let mut duplicated = DuplicatedNodes::new();
    if options.converter {
        log::debug!("converter mode: skipping node duplication");
        return Ok(duplicated);
    }

    log::info!("duplicating nodes");
    let mut last_id = mesh.max_node_id();
    let mut next_id = last_id.map_or(Some(NodeId::new(1)), NodeId::checked_next);
    let original_count = mesh.node_count();

    for pos in 0..original_count {
        let node = &mesh.nodes()[pos];
        if skipped_by_policy(options.policy, node) {
            continue;
        }
        let id = node.id();
        let duplicity = node.duplicity();
        if duplicity == 0 {
            return Err(MeshTearError::InvalidDuplicity { node: id, duplicity });
        }

        let mut slots = Vec::with_capacity(duplicity);
        slots.push(id);
        for _ in 1..duplicity {
            let new_id = next_id.ok_or(MeshTearError::NodeIdExhausted {
                last: last_id.unwrap_or(id),
            })?;
            let copy = mesh.nodes()[pos].duplicate_as(new_id);
            let copy_pos = mesh.push_duplicate(copy)?;
            index.register_node(new_id, copy_pos);
            slots.push(new_id);
            last_id = Some(new_id);
            next_id = new_id.checked_next();
        }
        duplicated.insert(id, slots);
    }

    log::info!("number of nodes added: {}", duplicated.copies());
    Ok(duplicated)
}

/// Checks that every entry's slot count equals its node's duplicity.
pub fn check_slot_counts(
    mesh: &Mesh,
    index: &TopologyIndex,
    duplicated: &DuplicatedNodes,
) -> Result<(), MeshTearError> {
    for (node, slots) in duplicated.iter() {
        let pos = index.resolve_node(node, Stage::Validate)?;
        let duplicity = mesh.nodes()[pos].duplicity();
        if slots.len() != duplicity {
            return Err(MeshTearError::DuplicateSlotMismatch {
                node,
                duplicity,
                slots: slots.len(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algs::classify::classify_nodes;
    use crate::topology::cell_type::ElementType;
    use crate::topology::point::{ElementId, MaterialId};

    fn n(i: u64) -> NodeId {
        NodeId::new(i)
    }

    /// Four triangles around node 5 at the centre of a unit square.
    fn pinwheel(materials: [i32; 4]) -> Mesh {
        let mut mesh = Mesh::new();
        let coords = [(0., 0.), (1., 0.), (1., 1.), (0., 1.), (0.5, 0.5)];
        for (i, (x, y)) in coords.into_iter().enumerate() {
            mesh.add_node(n(i as u64 + 1), [x, y, 0.0]).unwrap();
        }
        let rims = [(1, 2), (2, 3), (3, 4), (4, 1)];
        for (k, ((a, b), m)) in rims.into_iter().zip(materials).enumerate() {
            mesh.add_element(
                ElementId::new(k as u64),
                ElementType::Triangle3,
                MaterialId::new(m),
                [n(a), n(b), n(5)],
            )
            .unwrap();
        }
        mesh
    }

    fn run(mesh: &mut Mesh, opts: TearOptions) -> (TopologyIndex, DuplicatedNodes) {
        let mut index = TopologyIndex::build(mesh).unwrap();
        classify_nodes(mesh, &index, &opts, None).unwrap();
        let dup = duplicate_nodes(mesh, &mut index, &opts).unwrap();
        (index, dup)
    }

    #[test]
    fn everywhere_splits_every_incidence() {
        let mut mesh = pinwheel([1, 1, 1, 1]);
        let (index, dup) = run(&mut mesh, TearOptions::new(TearPolicy::Everywhere));

        // corners are visited first and take ids 6..=9
        assert_eq!(dup.get(n(1)), Some(&[n(1), n(6)][..]));
        assert_eq!(dup.get(n(4)), Some(&[n(4), n(9)][..]));
        assert_eq!(dup.get(n(5)), Some(&[n(5), n(10), n(11), n(12)][..]));
        assert_eq!(dup.len(), 5);
        assert_eq!(dup.copies(), 4 + 3);
        assert_eq!(mesh.node_count(), 5 + 7);
        assert_eq!(index.node_position(n(12)), Some(11));
        check_slot_counts(&mesh, &index, &dup).unwrap();

        let copy = &mesh.nodes()[9];
        assert_eq!(copy.coords(), [0.5, 0.5, 0.0]);
        assert_eq!(copy.duplicity(), 1);
        assert!(!copy.is_interface());
    }

    #[test]
    fn interface_policy_enters_only_interfacial_nodes() {
        let mut mesh = pinwheel([1, 2, 1, 2]);
        let (_, dup) = run(&mut mesh, TearOptions::new(TearPolicy::Interface));

        // each corner sits between one element of each material
        assert_eq!(dup.slot(n(1), 1), Some(n(6)));
        assert_eq!(dup.get(n(5)), Some(&[n(5), n(10)][..]));
        assert_eq!(
            dup.require_slot(n(1), 2),
            Err(MeshTearError::MissingDuplicateSlot { node: n(1), slot: 2 })
        );
    }

    #[test]
    fn domain_policy_skips_rigid_nodes() {
        let mut mesh = pinwheel([3, 3, 3, 3]);
        let opts = TearOptions::new(TearPolicy::Domain).with_rigid_domain(MaterialId::new(3));
        let (_, dup) = run(&mut mesh, opts);

        // corners have support 2 (rigid, skipped); nothing else to split
        assert!(!dup.contains(n(5)));
        assert!(!dup.contains(n(2)));
        assert_eq!(dup.copies(), 0);
        assert_eq!(mesh.node_count(), 5);
    }

    #[test]
    fn id_space_exhaustion_is_an_input_error() {
        let mut mesh = Mesh::new();
        let top = n(u64::MAX);
        for (id, xy) in [(n(1), [0., 0.]), (n(2), [1., 0.]), (top, [1., 1.]), (n(3), [0., 1.])] {
            mesh.add_node(id, [xy[0], xy[1], 0.0]).unwrap();
        }
        let tri = ElementType::Triangle3;
        mesh.add_element(ElementId::new(0), tri, MaterialId::new(1), [n(1), n(2), top])
            .unwrap();
        mesh.add_element(ElementId::new(1), tri, MaterialId::new(2), [n(1), top, n(3)])
            .unwrap();

        let mut index = TopologyIndex::build(&mesh).unwrap();
        let opts = TearOptions::new(TearPolicy::Interface);
        classify_nodes(&mut mesh, &index, &opts, None).unwrap();
        let err = duplicate_nodes(&mut mesh, &mut index, &opts).unwrap_err();
        assert_eq!(err, MeshTearError::NodeIdExhausted { last: top });
        assert_eq!(err.kind(), crate::mesh_error::ErrorKind::Input);
    }

    #[test]
    fn largest_id_is_fine_when_nothing_is_split() {
        let mut mesh = pinwheel([1, 1, 1, 1]);
        mesh.add_node(n(u64::MAX), [5.0, 5.0, 0.0]).unwrap();
        let (_, dup) = run(&mut mesh, TearOptions::new(TearPolicy::Interface));
        assert!(dup.is_empty());
        assert_eq!(mesh.node_count(), 6);
    }

    #[test]
    fn converter_mode_creates_nothing() {
        let mut mesh = pinwheel([1, 2, 3, 4]);
        let (_, dup) = run(&mut mesh, TearOptions::new(TearPolicy::Everywhere).converter(true));
        assert!(dup.is_empty());
        assert_eq!(mesh.node_count(), 5);
    }
}
