mod util;
use std::collections::HashMap;

use mesh_tear::prelude::*;
use proptest::prelude::*;
use util::*;

const POLICIES: [TearPolicy; 4] = [
    TearPolicy::Interface,
    TearPolicy::Domain,
    TearPolicy::Everywhere,
    TearPolicy::Polycrystal,
];

fn grid(nx: u64, ny: u64, tags: &[i32]) -> Mesh {
    quad_grid(nx, ny, |col, row| tags[((row * nx + col) as usize) % tags.len()])
}

fn options_for(policy: TearPolicy, tags: &[i32]) -> TearOptions {
    let opts = TearOptions::new(policy);
    if policy == TearPolicy::Domain {
        opts.with_rigid_domain(mat(tags[0]))
    } else {
        opts
    }
}

/// Some node is referenced by two elements of different materials.
fn shared_across_materials(out: &TearOutput) -> Option<NodeId> {
    let mut owner: HashMap<NodeId, MaterialId> = HashMap::new();
    for element in &out.elements {
        for &node in element.connectivity() {
            let m = *owner.entry(node).or_insert(element.material());
            if m != element.material() {
                return Some(node);
            }
        }
    }
    None
}

proptest! {
    #[test]
    fn every_policy_keeps_references_resolved(
        nx in 1u64..5,
        ny in 1u64..5,
        tags in prop::collection::vec(1i32..=3, 1..16),
        policy in 0usize..4,
    ) {
        let policy = POLICIES[policy];
        let mesh = grid(nx, ny, &tags);
        let original = mesh.node_count();
        let max_id = mesh.max_node_id().unwrap().get();

        let out = tear_mesh(mesh, options_for(policy, &tags)).unwrap();
        assert_no_dangling(&out);
        assert_slots_match_duplicity(&out);

        // copies are numbered consecutively after the largest original id
        for (k, node) in out.nodes[original..].iter().enumerate() {
            prop_assert_eq!(node.id().get(), max_id + 1 + k as u64);
            prop_assert_eq!(node.duplicity(), 1);
        }
        prop_assert_eq!(out.nodes.len() - original, out.duplicated_nodes.copies());
    }

    #[test]
    fn runs_are_deterministic(
        nx in 1u64..4,
        ny in 1u64..4,
        tags in prop::collection::vec(1i32..=4, 1..9),
        policy in 0usize..4,
    ) {
        let policy = POLICIES[policy];
        let first = tear_mesh(grid(nx, ny, &tags), options_for(policy, &tags)).unwrap();
        let second = tear_mesh(grid(nx, ny, &tags), options_for(policy, &tags)).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn everywhere_leaves_no_shared_node(
        nx in 1u64..5,
        ny in 1u64..5,
        tags in prop::collection::vec(1i32..=3, 1..16),
    ) {
        let mesh = grid(nx, ny, &tags);
        let incidences = (4 * nx * ny) as usize;
        let out = tear_mesh(mesh, TearOptions::new(TearPolicy::Everywhere)).unwrap();

        prop_assert_eq!(out.nodes.len(), incidences);
        let mut seen = std::collections::HashSet::new();
        for element in &out.elements {
            for &node in element.connectivity() {
                prop_assert!(seen.insert(node), "node {} shared", node);
            }
        }
    }

    #[test]
    fn two_materials_separate_under_interface_policy(
        nx in 1u64..5,
        ny in 1u64..5,
        tags in prop::collection::vec(1i32..=2, 1..16),
    ) {
        let out = tear_mesh(grid(nx, ny, &tags), TearOptions::new(TearPolicy::Interface)).unwrap();
        prop_assert_eq!(shared_across_materials(&out), None);
    }

    #[test]
    fn grains_separate_under_polycrystal_policy(
        nx in 1u64..5,
        ny in 1u64..5,
        tags in prop::collection::vec(1i32..=4, 1..16),
    ) {
        let out = tear_mesh(grid(nx, ny, &tags), TearOptions::new(TearPolicy::Polycrystal)).unwrap();
        prop_assert_eq!(shared_across_materials(&out), None);
        for pair in &out.ignored_edges {
            prop_assert!(out.interface_nodes.contains(&pair.0));
            prop_assert!(out.interface_nodes.contains(&pair.1));
        }
    }
}
