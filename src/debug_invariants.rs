//! Post-run consistency checks.
//!
//! The pipeline calls [`DebugInvariants::validate_invariants`] after tearing
//! and propagates the first violation as an invariant error. Tests and
//! drivers can call [`DebugInvariants::debug_assert_invariants`] to panic
//! instead, which compiles to nothing in release builds unless the
//! `strict-invariants` feature is enabled.

use crate::mesh_error::MeshTearError;

/// Structures whose internal consistency can be checked after mutation.
pub trait DebugInvariants {
    /// Panics on the first violation in debug builds or with
    /// `strict-invariants`; no-op otherwise.
    fn debug_assert_invariants(&self);
    /// Returns the first violation found, if any.
    fn validate_invariants(&self) -> Result<(), MeshTearError>;
}

/// Evaluates a `Result<(), MeshTearError>` check and panics with `ctx` as
/// prefix when it fails and invariant checking is compiled in.
#[macro_export]
macro_rules! debug_invariants {
    ($check:expr, $($ctx:tt)*) => {
        #[cfg(any(debug_assertions, feature = "strict-invariants"))]
        if let Err(err) = $check {
            panic!(concat!("[mesh-tear invariants] ", $($ctx)*, ": {}"), err);
        }
    };
}
