//! Interface node classification.
//!
//! For every node touched by at least two elements, counts the distinct
//! materials and rigid-domain elements in its support, derives the node's
//! duplicity under the active [`TearPolicy`], and sets the interface / rigid
//! flags. Under the polycrystal policy a second pass records same-grain
//! edges whose end nodes were both flagged interfacial.

use std::collections::HashSet;

use itertools::Itertools;

use crate::config::{TearOptions, TearPolicy};
use crate::geometry::segment::IgnoredSegment;
use crate::mesh_error::{MeshTearError, Stage};
use crate::topology::index::TopologyIndex;
use crate::topology::mesh::{Element, Mesh};
use crate::topology::point::{ElementId, MaterialId, NodeId, NodePair};

/// Output of [`classify_nodes`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Classification {
    /// Interfacial nodes in detection (node ingestion) order, each once.
    pub interface_nodes: Vec<NodeId>,
    /// Polycrystal only: same-grain edges between interfacial nodes.
    pub ignored_edges: Vec<NodePair>,
}

/// Material statistics over one node's support.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SupportMaterials {
    /// Number of distinct materials.
    pub distinct: usize,
    /// Number of supporting elements in the rigid domain.
    pub rigid: usize,
    /// The material of the first supporting element.
    pub first: Option<MaterialId>,
}

/// Material of every element in `support`, in support order.
pub(crate) fn support_material_list(
    mesh: &Mesh,
    index: &TopologyIndex,
    support: &[ElementId],
    stage: Stage,
) -> Result<Vec<MaterialId>, MeshTearError> {
    support
        .iter()
        .map(|&e| {
            index
                .resolve_element(e, stage)
                .map(|pos| mesh.elements()[pos].material())
        })
        .collect()
}

/// Counts distinct and rigid materials over `support`.
pub fn support_materials(
    mesh: &Mesh,
    index: &TopologyIndex,
    support: &[ElementId],
    rigid_domain: Option<MaterialId>,
) -> Result<SupportMaterials, MeshTearError> {
    let materials = support_material_list(mesh, index, support, Stage::Classify)?;
    Ok(SupportMaterials {
        distinct: materials.iter().unique().count(),
        rigid: materials
            .iter()
            .filter(|&&m| Some(m) == rigid_domain)
            .count(),
        first: materials.first().copied(),
    })
}

/// Duplicity of a node by policy, before any override.
///
/// Under [`TearPolicy::Domain`] a single-material node is still split into
/// one copy per supporting element.
pub fn policy_duplicity(policy: TearPolicy, support_count: usize, m: SupportMaterials) -> usize {
    match policy {
        TearPolicy::Everywhere => support_count,
        TearPolicy::Interface | TearPolicy::Polycrystal => m.distinct,
        TearPolicy::Domain => {
            if m.distinct != 1 {
                support_count - m.rigid + 1
            } else {
                support_count
            }
        }
    }
}

/// Sets duplicity and flags on every node and collects interfacial nodes.
///
/// Nodes with fewer than two supporting elements keep duplicity 1 and are
/// never interfacial. The boundary flag is set for every member of the
/// mesh's boundary-node set.
pub fn classify_nodes(
    mesh: &mut Mesh,
    index: &TopologyIndex,
    options: &TearOptions,
    ignored: Option<&dyn IgnoredSegment>,
) -> Result<Classification, MeshTearError> {
    log::info!("detecting interface nodes ({} policy)", options.policy);

    let rigid_domain = options.effective_rigid_domain();
    let mut classification = Classification::default();

    for pos in 0..mesh.node_count() {
        let node = &mesh.nodes()[pos];
        let id = node.id();
        let [x, y, _] = node.coords();
        let on_boundary = mesh.boundary_nodes().contains(&id);

        if index.support_count(id) < 2 {
            mesh.nodes_mut()[pos].flags_mut().on_boundary = on_boundary;
            continue;
        }

        let support = index.support(id);

        let materials = support_materials(mesh, index, support, rigid_domain)?;
        let mut duplicity = policy_duplicity(options.policy, support.len(), materials);
        let mut interface = false;
        let mut rigid = false;

        if materials.distinct != 1 {
            if ignored.is_some_and(|p| p.contains(x, y)) {
                log::debug!("node {id} lies on the ignored segment; not split");
                duplicity = 1;
            } else {
                interface = true;
                classification.interface_nodes.push(id);
            }
        } else if options.policy == TearPolicy::Domain
            && rigid_domain.is_some()
            && materials.first == rigid_domain
        {
            rigid = true;
            duplicity = 1;
        }

        if duplicity == 0 {
            return Err(MeshTearError::InvalidDuplicity { node: id, duplicity });
        }

        let node = &mut mesh.nodes_mut()[pos];
        node.set_duplicity(duplicity);
        let flags = node.flags_mut();
        flags.interface = interface;
        flags.rigid = rigid;
        flags.on_boundary = on_boundary;
    }

    if options.policy == TearPolicy::Polycrystal {
        classification.ignored_edges = detect_ignored_edges(mesh, index)?;
    }

    log::info!(
        "number of interface nodes: {}",
        classification.interface_nodes.len()
    );
    Ok(classification)
}

/// Whether every node of `element` is flagged interfacial.
fn is_fully_interfacial(
    mesh: &Mesh,
    index: &TopologyIndex,
    element: &Element,
) -> Result<bool, MeshTearError> {
    for &node in element.connectivity() {
        let pos = index.resolve_node(node, Stage::Classify)?;
        if !mesh.nodes()[pos].is_interface() {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Finds corner edges of fully interfacial elements that are shared with a
/// neighbor of the same material.
///
/// Neighbors are scanned in id order and the first shared-edge neighbor of
/// the same material wins. An edge seen from both of its elements is
/// recorded once, in the orientation met first.
pub fn detect_ignored_edges(
    mesh: &Mesh,
    index: &TopologyIndex,
) -> Result<Vec<NodePair>, MeshTearError> {
    let mut edges = Vec::new();
    let mut seen = HashSet::new();

    for element in mesh.elements() {
        if !is_fully_interfacial(mesh, index, element)? {
            continue;
        }
        for (n1, n2) in element.corner_edges() {
            for neighbor in index.strict_neighbors(element.id()) {
                let other = &mesh.elements()[index.resolve_element(neighbor, Stage::Classify)?];
                if !other.has_corner_edge(n1, n2) || other.material() != element.material() {
                    continue;
                }
                let pair = NodePair(n1, n2);
                if seen.insert(pair.canonical()) {
                    log::debug!("ignored polycrystal edge {pair}");
                    edges.push(pair);
                }
                break;
            }
        }
    }
    Ok(edges)
}
