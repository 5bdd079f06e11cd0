//! Bulk element types and their local topology tables.
//!
//! Types are keyed by their Gmsh element code. Local node numbering follows
//! the Gmsh convention: corner nodes first, then mid-side nodes for the
//! quadratic variants. Edge and face tables refer to local corner indices.

use crate::mesh_error::MeshTearError;

/// Solid element types understood by the tearing pipeline.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum ElementType {
    /// 3-node triangle.
    Triangle3,
    /// 4-node quadrangle.
    Quadrangle4,
    /// 4-node tetrahedron.
    Tetrahedron4,
    /// 8-node hexahedron.
    Hexahedron8,
    /// 6-node prism.
    Prism6,
    /// 6-node quadratic triangle.
    Triangle6,
    /// 10-node quadratic tetrahedron.
    Tetrahedron10,
    /// 8-node serendipity quadrangle.
    Quadrangle8,
    /// 20-node serendipity hexahedron.
    Hexahedron20,
}

const TRIANGLE_EDGES: &[[usize; 2]] = &[[0, 1], [1, 2], [2, 0]];
const QUADRANGLE_EDGES: &[[usize; 2]] = &[[0, 1], [1, 2], [2, 3], [3, 0]];
const TETRAHEDRON_EDGES: &[[usize; 2]] = &[[0, 1], [1, 2], [2, 0], [3, 0], [3, 2], [3, 1]];
const HEXAHEDRON_EDGES: &[[usize; 2]] = &[
    [0, 1],
    [0, 3],
    [0, 4],
    [1, 2],
    [1, 5],
    [2, 3],
    [2, 6],
    [3, 7],
    [4, 5],
    [4, 7],
    [5, 6],
    [6, 7],
];
const PRISM_EDGES: &[[usize; 2]] = &[
    [0, 1],
    [0, 2],
    [0, 3],
    [1, 2],
    [1, 4],
    [2, 5],
    [3, 4],
    [3, 5],
    [4, 5],
];

const TETRAHEDRON_FACES: &[&[usize]] = &[&[0, 2, 1], &[0, 1, 3], &[0, 3, 2], &[3, 1, 2]];
const HEXAHEDRON_FACES: &[&[usize]] = &[
    &[0, 3, 2, 1],
    &[0, 1, 5, 4],
    &[0, 4, 7, 3],
    &[1, 2, 6, 5],
    &[2, 3, 7, 6],
    &[4, 5, 6, 7],
];
const PRISM_FACES: &[&[usize]] = &[
    &[0, 2, 1],
    &[3, 4, 5],
    &[0, 1, 4, 3],
    &[0, 3, 5, 2],
    &[1, 2, 5, 4],
];

impl ElementType {
    /// Maps a Gmsh element code to a solid element type.
    ///
    /// Lines (1, 8) and points (15) are boundary/marker entities, not bulk
    /// elements, and are rejected.
    pub fn from_gmsh(code: u32) -> Result<Self, MeshTearError> {
        match code {
            2 => Ok(ElementType::Triangle3),
            3 => Ok(ElementType::Quadrangle4),
            4 => Ok(ElementType::Tetrahedron4),
            5 => Ok(ElementType::Hexahedron8),
            6 => Ok(ElementType::Prism6),
            9 => Ok(ElementType::Triangle6),
            11 => Ok(ElementType::Tetrahedron10),
            16 => Ok(ElementType::Quadrangle8),
            17 => Ok(ElementType::Hexahedron20),
            other => Err(MeshTearError::UnknownElementType(other)),
        }
    }

    /// The Gmsh element code of this type.
    pub fn gmsh_code(self) -> u32 {
        match self {
            ElementType::Triangle3 => 2,
            ElementType::Quadrangle4 => 3,
            ElementType::Tetrahedron4 => 4,
            ElementType::Hexahedron8 => 5,
            ElementType::Prism6 => 6,
            ElementType::Triangle6 => 9,
            ElementType::Tetrahedron10 => 11,
            ElementType::Quadrangle8 => 16,
            ElementType::Hexahedron20 => 17,
        }
    }

    /// Total number of nodes in the connectivity.
    pub fn node_count(self) -> usize {
        match self {
            ElementType::Triangle3 => 3,
            ElementType::Quadrangle4 | ElementType::Tetrahedron4 => 4,
            ElementType::Prism6 | ElementType::Triangle6 => 6,
            ElementType::Hexahedron8 | ElementType::Quadrangle8 => 8,
            ElementType::Tetrahedron10 => 10,
            ElementType::Hexahedron20 => 20,
        }
    }

    /// Number of corner (vertex) nodes; these lead the connectivity.
    pub fn corner_count(self) -> usize {
        match self {
            ElementType::Triangle3 | ElementType::Triangle6 => 3,
            ElementType::Quadrangle4
            | ElementType::Quadrangle8
            | ElementType::Tetrahedron4
            | ElementType::Tetrahedron10 => 4,
            ElementType::Prism6 => 6,
            ElementType::Hexahedron8 | ElementType::Hexahedron20 => 8,
        }
    }

    /// Topological dimension.
    pub fn dimension(self) -> u8 {
        match self {
            ElementType::Triangle3
            | ElementType::Quadrangle4
            | ElementType::Triangle6
            | ElementType::Quadrangle8 => 2,
            _ => 3,
        }
    }

    /// Whether the type carries mid-side nodes.
    pub fn is_quadratic(self) -> bool {
        self.node_count() > self.corner_count()
    }

    /// Corner edges as pairs of local corner indices.
    ///
    /// For planar elements this is the cyclic walk around the corners.
    pub fn edges(self) -> &'static [[usize; 2]] {
        match self {
            ElementType::Triangle3 | ElementType::Triangle6 => TRIANGLE_EDGES,
            ElementType::Quadrangle4 | ElementType::Quadrangle8 => QUADRANGLE_EDGES,
            ElementType::Tetrahedron4 | ElementType::Tetrahedron10 => TETRAHEDRON_EDGES,
            ElementType::Hexahedron8 | ElementType::Hexahedron20 => HEXAHEDRON_EDGES,
            ElementType::Prism6 => PRISM_EDGES,
        }
    }

    /// Faces as lists of local corner indices, outward oriented.
    /// Empty for planar elements.
    pub fn faces(self) -> &'static [&'static [usize]] {
        match self {
            ElementType::Tetrahedron4 | ElementType::Tetrahedron10 => TETRAHEDRON_FACES,
            ElementType::Hexahedron8 | ElementType::Hexahedron20 => HEXAHEDRON_FACES,
            ElementType::Prism6 => PRISM_FACES,
            _ => &[],
        }
    }
}
