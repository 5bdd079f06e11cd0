//! Element tearing: rewrites connectivity entries to duplicate node ids.
//!
//! Within a node's support (ingestion order) the element at index 0 is the
//! reference; the policies differ in how later elements are mapped to
//! duplicate slots. Rewiring only changes entry values, never positions.
//!
//! Rewiring one node only touches entries equal to that node's id, and the
//! replacement ids are fresh, so nodes can be processed in any order.

use crate::algs::classify::{support_material_list, Classification};
use crate::algs::duplicate::DuplicatedNodes;
use crate::config::{TearOptions, TearPolicy};
use crate::mesh_error::{MeshTearError, Stage};
use crate::topology::index::TopologyIndex;
use crate::topology::mesh::Mesh;
use crate::topology::point::{ElementId, MaterialId, NodeId};

/// Counters reported by [`tear_elements`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TearStats {
    /// Connectivity entries whose value changed.
    pub rewired: usize,
    /// Three-dimensional elements whose face table was rebuilt.
    pub faces_rebuilt: usize,
}

/// Tears elements according to `options.policy`. No-op in converter mode.
pub fn tear_elements(
    mesh: &mut Mesh,
    index: &TopologyIndex,
    classification: &Classification,
    duplicated: &DuplicatedNodes,
    options: &TearOptions,
) -> Result<TearStats, MeshTearError> {
    if options.converter {
        log::debug!("converter mode: skipping element tearing");
        return Ok(TearStats::default());
    }

    log::info!("tearing elements ({} policy)", options.policy);
    let mut tearer = Tearer {
        mesh,
        index,
        duplicated,
        stats: TearStats::default(),
    };
    match options.policy {
        TearPolicy::Interface => tearer.interface(&classification.interface_nodes)?,
        TearPolicy::Domain => tearer.domain(options.rigid_domain)?,
        TearPolicy::Everywhere => tearer.everywhere()?,
        TearPolicy::Polycrystal => tearer.polycrystal(&classification.interface_nodes)?,
    }
    log::info!("rewired {} connectivity entries", tearer.stats.rewired);
    Ok(tearer.stats)
}

struct Tearer<'a> {
    mesh: &'a mut Mesh,
    index: &'a TopologyIndex,
    duplicated: &'a DuplicatedNodes,
    stats: TearStats,
}

impl Tearer<'_> {
    /// Points `element`'s entry for `node` at duplicate slot `slot`.
    fn rewire(
        &mut self,
        element: ElementId,
        node: NodeId,
        slot: usize,
    ) -> Result<(), MeshTearError> {
        let replacement = self.duplicated.require_slot(node, slot)?;
        let pos = self.index.resolve_element(element, Stage::Tear)?;
        if replacement != node && self.mesh.elements_mut()[pos].replace_node(node, replacement) {
            self.stats.rewired += 1;
        }
        Ok(())
    }

    fn materials(&self, node: NodeId) -> Result<Vec<MaterialId>, MeshTearError> {
        support_material_list(&*self.mesh, self.index, self.index.support(node), Stage::Tear)
    }

    fn duplicity(&self, node: NodeId) -> Result<usize, MeshTearError> {
        let pos = self.index.resolve_node(node, Stage::Tear)?;
        Ok(self.mesh.nodes()[pos].duplicity())
    }

    /// Every supporting element whose material differs from the first
    /// element's is sent to slot 1, however many materials meet at the node.
    fn two_sided(&mut self, node: NodeId) -> Result<(), MeshTearError> {
        let index = self.index;
        let support = index.support(node);
        let materials = self.materials(node)?;
        let Some(&reference) = materials.first() else {
            return Ok(());
        };
        for (&element, &material) in support.iter().zip(&materials).skip(1) {
            if material != reference {
                self.rewire(element, node, 1)?;
            }
        }
        Ok(())
    }

    /// Support index `i >= 1` goes to slot `i`; index 0 keeps the original.
    fn per_incidence(&mut self, node: NodeId) -> Result<(), MeshTearError> {
        let index = self.index;
        for (i, &element) in index.support(node).iter().enumerate().skip(1) {
            self.rewire(element, node, i)?;
        }
        Ok(())
    }

    fn interface(&mut self, interface_nodes: &[NodeId]) -> Result<(), MeshTearError> {
        for &node in interface_nodes {
            self.two_sided(node)?;
        }
        Ok(())
    }

    fn domain(&mut self, rigid_domain: Option<MaterialId>) -> Result<(), MeshTearError> {
        let duplicated = self.duplicated;
        let index = self.index;
        for (node, slots) in duplicated.iter() {
            if slots.len() == 1 {
                continue;
            }
            let pos = index.resolve_node(node, Stage::Tear)?;
            let flags = self.mesh.nodes()[pos].flags();
            if flags.rigid {
                continue;
            }
            if !flags.interface {
                self.per_incidence(node)?;
                continue;
            }
            // Rigid elements keep the original; every other element,
            // the first one included, takes the next slot.
            let support = index.support(node);
            let materials = self.materials(node)?;
            let mut slot = 0;
            for (&element, &material) in support.iter().zip(&materials) {
                if Some(material) == rigid_domain {
                    continue;
                }
                slot += 1;
                self.rewire(element, node, slot)?;
            }
        }
        Ok(())
    }

    fn everywhere(&mut self) -> Result<(), MeshTearError> {
        let duplicated = self.duplicated;
        for (node, slots) in duplicated.iter() {
            if slots.len() > 1 {
                self.per_incidence(node)?;
            }
        }
        if self.mesh.is_3d() {
            log::info!("rebuilding faces of 3D elements");
            for element in self.mesh.elements_mut() {
                if element.kind().dimension() == 3 {
                    element.rebuild_faces();
                    self.stats.faces_rebuilt += 1;
                }
            }
        }
        Ok(())
    }

    fn polycrystal(&mut self, interface_nodes: &[NodeId]) -> Result<(), MeshTearError> {
        for &node in interface_nodes {
            if self.duplicity(node)? == 2 {
                self.two_sided(node)?;
            } else {
                self.junction(node)?;
            }
        }
        Ok(())
    }

    /// Grain junction: elements are grouped by material in discovery order
    /// and group `k` is sent to slot `k`. Group 0 keeps the original id.
    fn junction(&mut self, node: NodeId) -> Result<(), MeshTearError> {
        let index = self.index;
        let support = index.support(node);
        let materials = self.materials(node)?;
        let mut grouped = vec![false; support.len()];
        let mut slot = 0;
        for i in 0..support.len() {
            if grouped[i] {
                continue;
            }
            for j in i..support.len() {
                if materials[j] == materials[i] {
                    self.rewire(support[j], node, slot)?;
                    grouped[j] = true;
                }
            }
            slot += 1;
        }
        Ok(())
    }
}
