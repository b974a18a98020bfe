//! Element content: the immutable record every EID maps to.
//!
//! An element's payload is either a full value (a semantic kind plus an
//! opaque property map) or a reference into previously committed content.
//! Byte-level payload contents and the property dictionary are deliberately
//! opaque here — this crate only cares that a payload *exists* and what kind
//! it carries, never what is inside it.

use std::collections::BTreeMap;

use crate::error::Eid;

/// Relative path, either within a branch (`path`) or within a whole revision
/// root (`rrpath`). Kept as a plain `String`; `"."` is the text-format
/// stand-in for the empty (root) path, never a value stored here.
pub type RelPath = String;

/// Opaque property dictionary carried by a full payload.
pub type PropertyMap = BTreeMap<String, String>;

/// Semantic kind of a full payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    File,
    Directory,
    Symlink,
}

/// A pointer at previously committed content: `{ rev, relpath }`.
#[derive(Debug, Clone, PartialEq, Eq, derive_new::new)]
pub struct PayloadRef {
    rev: i64,
    relpath: RelPath,
}

impl PayloadRef {
    pub fn rev(&self) -> i64 {
        self.rev
    }

    pub fn relpath(&self) -> &str {
        &self.relpath
    }
}

/// Element payload: either a full value or a by-reference pointer.
///
/// A `None` payload at the [`crate::artifacts::element::ElementContent`]
/// level means "unknown / sub-branch root placeholder" — that case is
/// represented by the absence of a `Payload`, not by a variant here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// A full value with a semantic kind and property map.
    Full { kind: Kind, props: PropertyMap },
    /// A reference to previously committed content.
    Reference(PayloadRef),
}

impl Payload {
    pub fn full(kind: Kind, props: PropertyMap) -> Self {
        Payload::Full { kind, props }
    }

    pub fn reference(rev: i64, relpath: impl Into<RelPath>) -> Self {
        Payload::Reference(PayloadRef::new(rev, relpath.into()))
    }

    /// A payload is structurally valid iff a reference names a non-negative
    /// revision (full payloads are always valid — their kind is a closed
    /// enum and the property map is opaque).
    pub fn is_valid(&self) -> bool {
        match self {
            Payload::Full { .. } => true,
            Payload::Reference(r) => r.rev >= 0,
        }
    }
}

/// Immutable record: parent EID, name, optional payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementContent {
    parent_eid: Eid,
    name: String,
    payload: Option<Payload>,
}


impl ElementContent {
    pub fn new(parent_eid: Eid, name: impl Into<String>, payload: Option<Payload>) -> Self {
        ElementContent {
            parent_eid,
            name: name.into(),
            payload,
        }
    }

    /// A payload-less placeholder, used for sub-branch roots.
    pub fn subbranch_root(parent_eid: Eid, name: impl Into<String>) -> Self {
        ElementContent::new(parent_eid, name, None)
    }

    pub fn parent_eid(&self) -> Eid {
        self.parent_eid
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn payload(&self) -> Option<&Payload> {
        self.payload.as_ref()
    }
}
