//! Data model: the types that make up one repository's branch forest.
//!
//! - [`family`]: id-space and branch-sibling ownership.
//! - [`element`]: immutable element content and payloads.
//! - [`element_map`]: EID → element content for one branch instance,
//!   with invariant validation on every mutation.
//! - [`branch`]: branch instances (materialisations of a sibling).
//! - [`revision_root`]: the flat list of branch instances at one revision.
//! - [`subtree`]: free-standing subtree handles for copy/instantiate.

pub mod branch;
pub mod element;
pub mod element_map;
pub mod family;
pub mod revision_root;
pub mod subtree;
