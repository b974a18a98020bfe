//! Mapping from EID to element content for one branch instance.
//!
//! Every mutating call revalidates the invariants from the data model
//! against the owning branch's root EID and family before it takes effect.

use std::collections::BTreeMap;

use crate::artifacts::element::{ElementContent, Payload};
use crate::artifacts::family::Family;
use crate::error::{Eid, Error, Result};

/// EID → [`ElementContent`] for one branch instance.
#[derive(Debug, Clone, Default)]
pub struct ElementMap {
    entries: BTreeMap<Eid, ElementContent>,
}

impl ElementMap {
    pub fn new() -> Self {
        ElementMap::default()
    }

    pub fn get(&self, eid: Eid) -> Option<&ElementContent> {
        self.entries.get(&eid)
    }

    pub fn contains(&self, eid: Eid) -> bool {
        self.entries.contains_key(&eid)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Eid, &ElementContent)> {
        self.entries.iter().map(|(&eid, content)| (eid, content))
    }

    pub fn keys(&self) -> impl Iterator<Item = Eid> + '_ {
        self.entries.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove `eid` unconditionally, without revalidating invariants.
    /// Used by the orphan purge, which by definition produces maps that
    /// only satisfy the invariants once the whole sweep has converged.
    pub fn remove(&mut self, eid: Eid) -> Option<ElementContent> {
        self.entries.remove(&eid)
    }

    /// Drop every entry. Used when a branch instance's content is being
    /// replaced wholesale rather than incrementally updated.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Set (or delete, if `content` is `None`) the element at `eid`,
    /// revalidating invariants against `root_eid` and `family`.
    #[tracing::instrument(level = "trace", skip(self, content, family))]
    pub fn set(
        &mut self,
        eid: Eid,
        content: Option<ElementContent>,
        root_eid: Eid,
        family: &Family,
    ) -> Result<()> {
        match content {
            None => {
                self.entries.remove(&eid);
                Ok(())
            }
            Some(content) => {
                Self::validate(eid, &content, root_eid, family)?;
                self.entries.insert(eid, content);
                Ok(())
            }
        }
    }

    /// Replace the element at `eid` with a full update. Idempotent: calling
    /// it twice with identical arguments leaves the map unchanged the second
    /// time.
    pub fn update(
        &mut self,
        eid: Eid,
        parent_eid: Eid,
        name: impl Into<String>,
        payload: Option<Payload>,
        root_eid: Eid,
        family: &Family,
    ) -> Result<()> {
        let content = ElementContent::new(parent_eid, name, payload);
        self.set(eid, Some(content), root_eid, family)
    }

    /// Replace the element at `eid` with a payload-less sub-branch-root
    /// placeholder.
    pub fn update_as_subbranch_root(
        &mut self,
        eid: Eid,
        parent_eid: Eid,
        name: impl Into<String>,
        root_eid: Eid,
        family: &Family,
    ) -> Result<()> {
        let content = ElementContent::subbranch_root(parent_eid, name);
        self.set(eid, Some(content), root_eid, family)
    }

    fn validate(eid: Eid, content: &ElementContent, root_eid: Eid, family: &Family) -> Result<()> {
        let is_root = eid == root_eid;

        if is_root {
            if content.parent_eid() != -1 {
                return Err(Error::InvalidElement {
                    eid,
                    message: "branch root must have parent_eid == -1".to_string(),
                });
            }
            if !content.name().is_empty() {
                return Err(Error::InvalidElement {
                    eid,
                    message: "branch root must have an empty name".to_string(),
                });
            }
        } else {
            if content.parent_eid() == eid {
                return Err(Error::InvalidElement {
                    eid,
                    message: "element cannot be its own parent".to_string(),
                });
            }
            if content.parent_eid() == -1 || !family.contains_eid(content.parent_eid()) {
                return Err(Error::InvalidElement {
                    eid,
                    message: format!(
                        "parent_eid {} is not a valid EID in the family",
                        content.parent_eid()
                    ),
                });
            }
            if content.name().is_empty() {
                return Err(Error::InvalidElement {
                    eid,
                    message: "non-root elements must have a non-empty name".to_string(),
                });
            }
        }

        if let Some(payload) = content.payload() {
            if !payload.is_valid() {
                return Err(Error::InvalidElement {
                    eid,
                    message: "payload is neither a valid reference nor a full payload"
                        .to_string(),
                });
            }
        }

        Ok(())
    }
}
