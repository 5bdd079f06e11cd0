//! Pipeline stages: classification, duplication, tearing.

pub mod classify;
pub mod duplicate;
pub mod pipeline;
pub mod tear;

pub use classify::{classify_nodes, detect_ignored_edges, Classification};
pub use duplicate::{duplicate_nodes, DuplicatedNodes};
pub use pipeline::{tear_mesh, MeshContext, TearOutput, TearSummary};
pub use tear::{tear_elements, TearStats};
