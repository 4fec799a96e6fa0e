//! Structural self-checks for kernel types.
//!
//! Refinement output is checked in debug builds (or with the
//! `check-invariants` feature) before it is handed back to the caller.

use crate::mesh_error::MeshBridgeError;

/// Types that can verify their own structural invariants.
pub trait DebugInvariants {
    /// Validate invariants and return the first violation found.
    fn validate_invariants(&self) -> Result<(), MeshBridgeError>;

    /// Panic on the first violation when invariant checking is compiled in.
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "invariant violation");
    }
}

/// Run a fallible check and panic with context on error, only when invariant
/// checking is compiled in.
#[macro_export]
macro_rules! debug_invariants {
    ($expr:expr, $($ctx:tt)*) => {
        #[cfg(any(debug_assertions, feature = "check-invariants"))]
        if let Err(e) = $expr {
            panic!(concat!("[invariants] ", $($ctx)*, ": {}"), e);
        }
    };
}
