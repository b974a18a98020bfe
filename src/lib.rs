//! Element-addressed branch core.
//!
//! A repository is a sequence of revision roots, each a flat forest of
//! branch instances nested inside one another. Elements are addressed by a
//! stable element id (EID), not by path — paths are derived by walking the
//! parent chain, never stored. See [`artifacts`] for the data model,
//! [`areas`] for the tree operations and text serialization, and
//! [`commands`] for the validated editor façade built on top of them.

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod error;

pub use error::{Bsid, Eid, Error, Result};
