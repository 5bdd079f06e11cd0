#![allow(dead_code)]
use std::collections::HashSet;

use mesh_tear::prelude::*;

pub fn nid(u: u64) -> NodeId {
    NodeId::new(u)
}

pub fn eid(u: u64) -> ElementId {
    ElementId::new(u)
}

pub fn mat(m: i32) -> MaterialId {
    MaterialId::new(m)
}

/// Structured `nx` x `ny` quad grid. Node ids are row-major from 1, element
/// ids row-major from 0, and `material(col, row)` tags each quad.
pub fn quad_grid(nx: u64, ny: u64, material: impl Fn(u64, u64) -> i32) -> Mesh {
    let mut mesh = Mesh::new();
    let node = |col: u64, row: u64| nid(row * (nx + 1) + col + 1);
    for row in 0..=ny {
        for col in 0..=nx {
            mesh.add_node(node(col, row), [col as f64, row as f64, 0.0])
                .unwrap();
            if row == 0 || row == ny || col == 0 || col == nx {
                mesh.mark_boundary(node(col, row));
            }
        }
    }
    for row in 0..ny {
        for col in 0..nx {
            mesh.add_element(
                eid(row * nx + col),
                ElementType::Quadrangle4,
                mat(material(col, row)),
                [
                    node(col, row),
                    node(col + 1, row),
                    node(col + 1, row + 1),
                    node(col, row + 1),
                ],
            )
            .unwrap();
        }
    }
    mesh
}

/// `materials.len()` triangles meeting only at one hub node. Each triangle
/// has its own two rim nodes, so the hub is the only shared node. Rim nodes
/// take ids `1..=2k`; the hub takes `2k + 1`, the largest id.
pub fn hub(materials: &[i32]) -> (Mesh, NodeId) {
    let k = materials.len() as u64;
    let hub = nid(2 * k + 1);
    let mut mesh = Mesh::new();
    for i in 0..k {
        let angle = i as f64 * std::f64::consts::TAU / k as f64;
        let (c, s) = (angle.cos(), angle.sin());
        mesh.add_node(nid(2 * i + 1), [c, s, 0.0]).unwrap();
        mesh.add_node(nid(2 * i + 2), [0.9 * c - 0.1 * s, 0.9 * s + 0.1 * c, 0.0])
            .unwrap();
    }
    mesh.add_node(hub, [0.0, 0.0, 0.0]).unwrap();
    for (i, &m) in materials.iter().enumerate() {
        let i = i as u64;
        mesh.add_element(
            eid(i),
            ElementType::Triangle3,
            mat(m),
            [nid(2 * i + 1), nid(2 * i + 2), hub],
        )
        .unwrap();
    }
    (mesh, hub)
}

/// Connectivity of element `id` in the torn output.
pub fn connectivity(out: &TearOutput, id: ElementId) -> Vec<NodeId> {
    out.elements
        .iter()
        .find(|e| e.id() == id)
        .map(|e| e.connectivity().to_vec())
        .unwrap()
}

/// Every connectivity entry names a node in the output node set.
pub fn assert_no_dangling(out: &TearOutput) {
    let ids: HashSet<NodeId> = out.nodes.iter().map(Node::id).collect();
    for element in &out.elements {
        for node in element.connectivity() {
            assert!(ids.contains(node), "element {} references {}", element.id(), node);
        }
    }
}

/// Baseline slot count equals duplicity for every entered node.
pub fn assert_slots_match_duplicity(out: &TearOutput) {
    for (node, slots) in out.duplicated_nodes.iter() {
        let record = out.nodes.iter().find(|n| n.id() == node).unwrap();
        assert_eq!(slots.len(), record.duplicity(), "node {node}");
        assert_eq!(slots[0], node);
    }
}
