//! The tearing pipeline and the context object it runs on.
//!
//! [`MeshContext`] owns the mesh and every map derived from it. `run`
//! executes the four stages in order:
//!
//! 1. [`TopologyIndex::build`]: id lookups, node support, element neighbors.
//! 2. [`classify_nodes`]: duplicity and interface / rigid / boundary flags.
//! 3. [`duplicate_nodes`]: new node records and the duplicated-nodes map,
//!    snapshotted as the baseline.
//! 4. [`tear_elements`]: connectivity rewiring.
//!
//! The transform is not idempotent: a context can be run once. A second call
//! fails with [`MeshTearError::AlreadyTorn`].

use crate::algs::classify::{classify_nodes, Classification};
use crate::algs::duplicate::{check_slot_counts, duplicate_nodes, DuplicatedNodes};
use crate::algs::tear::{tear_elements, TearStats};
use crate::config::{TearOptions, TearPolicy};
use crate::debug_invariants::DebugInvariants;
use crate::geometry::segment::IgnoredSegment;
use crate::mesh_error::{MeshTearError, Stage};
use crate::topology::index::TopologyIndex;
use crate::topology::mesh::{Element, Mesh, Node};
use crate::topology::point::{NodeId, NodePair};

/// Counts reported after a successful run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TearSummary {
    pub policy: TearPolicy,
    pub original_nodes: usize,
    pub nodes_added: usize,
    pub interface_nodes: usize,
    pub ignored_edges: usize,
    pub rewired: usize,
    pub faces_rebuilt: usize,
}

/// Everything the interface-element builder consumes.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TearOutput {
    /// Original nodes followed by the duplicates, with flags and duplicity.
    pub nodes: Vec<Node>,
    /// Elements with rewired connectivity.
    pub elements: Vec<Element>,
    /// Snapshot of the duplicated-nodes map taken right after duplication.
    pub duplicated_nodes: DuplicatedNodes,
    pub interface_nodes: Vec<NodeId>,
    /// Polycrystal diagnostics; empty under other policies.
    pub ignored_edges: Vec<NodePair>,
}

/// Mesh plus all topology maps for a single tearing run.
pub struct MeshContext<'p> {
    mesh: Mesh,
    options: TearOptions,
    ignored: Option<Box<dyn IgnoredSegment + 'p>>,
    index: TopologyIndex,
    classification: Classification,
    duplicated: DuplicatedNodes,
    baseline: DuplicatedNodes,
    original_nodes: usize,
    torn: bool,
}

impl<'p> MeshContext<'p> {
    /// Wraps `mesh` after checking `options` against it.
    pub fn new(mesh: Mesh, options: TearOptions) -> Result<Self, MeshTearError> {
        options.validate(&mesh)?;
        let original_nodes = mesh.node_count();
        Ok(Self {
            mesh,
            options,
            ignored: None,
            index: TopologyIndex::default(),
            classification: Classification::default(),
            duplicated: DuplicatedNodes::default(),
            baseline: DuplicatedNodes::default(),
            original_nodes,
            torn: false,
        })
    }

    /// Attaches the ignored-segment predicate consulted for interfacial nodes.
    pub fn with_ignored_segment<S>(mut self, segment: S) -> Self
    where
        S: IgnoredSegment + 'p,
    {
        self.ignored = Some(Box::new(segment));
        self
    }

    /// Runs all four stages. May be called once per context.
    pub fn run(&mut self) -> Result<TearSummary, MeshTearError> {
        if self.torn {
            return Err(MeshTearError::AlreadyTorn);
        }
        // set up front: a failed run leaves the mesh partially rewritten
        self.torn = true;

        log::info!("building nodal support and element neighbors");
        self.index = TopologyIndex::build(&self.mesh)?;

        self.classification = classify_nodes(
            &mut self.mesh,
            &self.index,
            &self.options,
            self.ignored.as_deref(),
        )?;

        self.duplicated = duplicate_nodes(&mut self.mesh, &mut self.index, &self.options)?;
        self.baseline = self.duplicated.clone();

        let stats: TearStats = tear_elements(
            &mut self.mesh,
            &self.index,
            &self.classification,
            &self.duplicated,
            &self.options,
        )?;

        self.validate_invariants()?;

        Ok(TearSummary {
            policy: self.options.policy,
            original_nodes: self.original_nodes,
            nodes_added: self.mesh.node_count() - self.original_nodes,
            interface_nodes: self.classification.interface_nodes.len(),
            ignored_edges: self.classification.ignored_edges.len(),
            rewired: stats.rewired,
            faces_rebuilt: stats.faces_rebuilt,
        })
    }

    pub fn is_torn(&self) -> bool {
        self.torn
    }

    pub fn options(&self) -> &TearOptions {
        &self.options
    }

    /// The mesh: augmented node set and (after `run`) rewired elements.
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn index(&self) -> &TopologyIndex {
        &self.index
    }

    /// Node by id, duplicates included.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.index.node_position(id).map(|pos| &self.mesh.nodes()[pos])
    }

    /// The duplicated-nodes map as produced by the duplicator.
    pub fn duplicated_nodes(&self) -> &DuplicatedNodes {
        &self.duplicated
    }

    /// Snapshot of the duplicated-nodes map; never mutated after duplication.
    pub fn baseline(&self) -> &DuplicatedNodes {
        &self.baseline
    }

    pub fn interface_nodes(&self) -> &[NodeId] {
        &self.classification.interface_nodes
    }

    pub fn ignored_edges(&self) -> &[NodePair] {
        &self.classification.ignored_edges
    }

    /// Hands the results to the downstream consumer.
    pub fn into_output(self) -> TearOutput {
        let (nodes, elements) = self.mesh.into_parts();
        TearOutput {
            nodes,
            elements,
            duplicated_nodes: self.baseline,
            interface_nodes: self.classification.interface_nodes,
            ignored_edges: self.classification.ignored_edges,
        }
    }
}

impl DebugInvariants for MeshContext<'_> {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "MeshContext");
    }

    /// Checks, once the context has run: every duplicity is at least one,
    /// baseline slot counts equal duplicities, and every connectivity entry
    /// resolves to a node in the augmented node set.
    fn validate_invariants(&self) -> Result<(), MeshTearError> {
        if !self.torn {
            return Ok(());
        }
        for node in self.mesh.nodes() {
            if node.duplicity() == 0 {
                return Err(MeshTearError::InvalidDuplicity {
                    node: node.id(),
                    duplicity: 0,
                });
            }
        }
        check_slot_counts(&self.mesh, &self.index, &self.baseline)?;
        for element in self.mesh.elements() {
            for &node in element.connectivity() {
                if self.index.resolve_node(node, Stage::Validate).is_err() {
                    return Err(MeshTearError::DanglingReference {
                        element: element.id(),
                        node,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Runs the whole pipeline on `mesh` and returns the downstream output.
pub fn tear_mesh(mesh: Mesh, options: TearOptions) -> Result<TearOutput, MeshTearError> {
    let mut ctx = MeshContext::new(mesh, options)?;
    ctx.run()?;
    Ok(ctx.into_output())
}
