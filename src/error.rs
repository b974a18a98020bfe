//! Error types for the branch core.
//!
//! [`Error`] is the single error type returned by every fallible operation in
//! this crate. Errors surface to the caller immediately — there is no local
//! recovery within the core, and wrappers (trace, change-detection) forward
//! them unchanged.

use thiserror::Error;

/// Element id. See [`crate::artifacts::family`] for allocation rules.
pub type Eid = i64;

/// Branch sibling id. See [`crate::artifacts::family`] for allocation rules.
pub type Bsid = i64;

/// Errors returned by branch-core operations.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum Error {
    /// A revision index fell outside `[0, rev_roots.count)`.
    #[error("no such revision: {revision} (repository has {count} revisions)")]
    NoSuchRevision {
        /// The out-of-range revision that was requested.
        revision: i64,
        /// The number of revisions the repository currently holds.
        count: usize,
    },

    /// A logical violation of branching semantics: missing source, parent
    /// equal to self, or a broken root constraint.
    #[error("branching error: {message}")]
    Branching {
        /// Human-readable description of which branching rule was violated.
        message: String,
    },

    /// Structural validation failed while setting or updating an element
    /// (see the invariants in the data model).
    #[error("invalid element {eid}: {message}")]
    InvalidElement {
        /// The element that failed validation.
        eid: Eid,
        /// Which invariant was violated.
        message: String,
    },

    /// The text serialization grammar was violated at a specific line.
    #[error("parse error at line {line}: {message}")]
    Parse {
        /// 1-based line number where parsing failed.
        line: usize,
        /// Description of the malformed input.
        message: String,
    },

    /// The caller's cancellation hook signalled before a callback ran.
    #[error("operation cancelled")]
    Cancelled,

    /// A sibling/root disagreement, an out-of-range id, or some other
    /// bookkeeping inconsistency was detected.
    #[error("consistency error: {message}")]
    Consistency {
        /// Description of the inconsistency.
        message: String,
    },
}

/// Convenience result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
