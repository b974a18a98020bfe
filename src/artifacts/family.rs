//! Id-space and branch-sibling ownership.
//!
//! A [`Family`] is the single allocator for element ids (EIDs) and branch
//! sibling ids (BSIDs) within one repository, and the owner of every
//! [`BranchSibling`] ever created in it. EIDs and BSIDs are never reused:
//! `allocate_eid`/`allocate_bsid` bump monotone counters.

use crate::error::{Bsid, Eid, Error, Result};

/// Definition shared by every materialisation ("instance") of one logical
/// branch. Immutable after creation.
#[derive(Debug, Clone, PartialEq, Eq, derive_new::new)]
pub struct BranchSibling {
    /// The sibling's id, unique within its family.
    bsid: Bsid,
    /// The EID designated as this sibling's root.
    root_eid: Eid,
}

impl BranchSibling {
    /// This sibling's id.
    pub fn bsid(&self) -> Bsid {
        self.bsid
    }

    /// The EID designated as this sibling's root.
    pub fn root_eid(&self) -> Eid {
        self.root_eid
    }
}

/// Id-space owner: allocates EIDs and BSIDs and owns all siblings for one
/// repository.
#[derive(Debug, Clone)]
pub struct Family {
    first_bsid: Bsid,
    next_bsid: Bsid,
    first_eid: Eid,
    next_eid: Eid,
    siblings: Vec<BranchSibling>,
}

impl Family {
    /// Create a fresh family whose EID/BSID ranges both start at `first_eid`
    /// / `first_bsid` respectively (these need not be zero).
    pub fn new(first_bsid: Bsid, first_eid: Eid) -> Self {
        Family {
            first_bsid,
            next_bsid: first_bsid,
            first_eid,
            next_eid: first_eid,
            siblings: Vec::new(),
        }
    }

    /// Lower bound (inclusive) of this family's BSID range.
    pub fn first_bsid(&self) -> Bsid {
        self.first_bsid
    }

    /// Upper bound (exclusive) of this family's current BSID range.
    pub fn next_bsid(&self) -> Bsid {
        self.next_bsid
    }

    /// Lower bound (inclusive) of this family's EID range.
    pub fn first_eid(&self) -> Eid {
        self.first_eid
    }

    /// Upper bound (exclusive) of this family's current EID range.
    pub fn next_eid(&self) -> Eid {
        self.next_eid
    }

    /// All siblings this family has ever allocated.
    pub fn siblings(&self) -> &[BranchSibling] {
        &self.siblings
    }

    /// Allocate a fresh EID, bumping the family's monotone counter.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn allocate_eid(&mut self) -> Eid {
        let eid = self.next_eid;
        self.next_eid += 1;
        eid
    }

    /// Ensure the family's EID range extends at least to `eid` (exclusive
    /// upper bound `eid + 1`), without otherwise touching `next_eid`.
    ///
    /// Used by the editor's `alter` operation, which auto-allocates EIDs
    /// until both its arguments are in range rather than rejecting them.
    pub fn ensure_eid_allocated(&mut self, eid: Eid) {
        if eid >= self.next_eid {
            self.next_eid = eid + 1;
        }
    }

    /// Ensure the family's BSID range extends at least to `bsid` (exclusive
    /// upper bound `bsid + 1`). Used when reconstructing a family from its
    /// serialized form, where the counter may sit ahead of every sibling
    /// actually present (e.g. after a deleted branch).
    pub fn ensure_bsid_allocated(&mut self, bsid: Bsid) {
        if bsid >= self.next_bsid {
            self.next_bsid = bsid + 1;
        }
    }

    /// Allocate a new sibling with the given root EID.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn allocate_branch_sibling(&mut self, root_eid: Eid) -> BranchSibling {
        let bsid = self.next_bsid;
        self.next_bsid += 1;
        let sibling = BranchSibling::new(bsid, root_eid);
        self.siblings.push(sibling.clone());
        sibling
    }

    /// Find an existing sibling by id.
    pub fn find_sibling(&self, bsid: Bsid) -> Option<&BranchSibling> {
        self.siblings.iter().find(|s| s.bsid == bsid)
    }

    /// Return the sibling with the given id, creating one (with the given
    /// root) if none exists yet.
    ///
    /// Fails with [`Error::Consistency`] if a sibling with this id already
    /// exists but disagrees on `root_eid`.
    pub fn find_or_create_sibling(
        &mut self,
        bsid: Bsid,
        root_eid: Eid,
    ) -> Result<BranchSibling> {
        if let Some(existing) = self.find_sibling(bsid) {
            if existing.root_eid != root_eid {
                return Err(Error::Consistency {
                    message: format!(
                        "sibling {bsid} already exists with root {}, requested root {root_eid}",
                        existing.root_eid
                    ),
                });
            }
            return Ok(existing.clone());
        }

        let sibling = BranchSibling::new(bsid, root_eid);
        self.siblings.push(sibling.clone());
        if bsid >= self.next_bsid {
            self.next_bsid = bsid + 1;
        }
        Ok(sibling)
    }

    /// Whether `eid` lies within this family's currently allocated range.
    pub fn contains_eid(&self, eid: Eid) -> bool {
        eid >= self.first_eid && eid < self.next_eid
    }

    /// Whether `bsid` lies within this family's currently allocated range.
    pub fn contains_bsid(&self, bsid: Bsid) -> bool {
        bsid >= self.first_bsid && bsid < self.next_bsid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocate_eid_is_monotone() {
        let mut family = Family::new(0, 0);
        let a = family.allocate_eid();
        let b = family.allocate_eid();
        let c = family.allocate_eid();
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn allocate_bsid_is_monotone() {
        let mut family = Family::new(0, 0);
        let a = family.allocate_branch_sibling(0).bsid();
        let b = family.allocate_branch_sibling(1).bsid();
        assert!(a < b);
    }

    #[test]
    fn find_or_create_sibling_reuses_matching_root() {
        let mut family = Family::new(0, 1);
        let first = family.allocate_branch_sibling(0);
        let found = family.find_or_create_sibling(first.bsid(), 0).unwrap();
        assert_eq!(found, first);
    }

    #[test]
    fn find_or_create_sibling_rejects_root_disagreement() {
        let mut family = Family::new(0, 1);
        let first = family.allocate_branch_sibling(0);
        let err = family.find_or_create_sibling(first.bsid(), 99).unwrap_err();
        assert!(matches!(err, Error::Consistency { .. }));
    }

    #[test]
    fn ensure_bsid_allocated_only_grows_forward() {
        let mut family = Family::new(0, 0);
        family.ensure_bsid_allocated(5);
        assert_eq!(family.next_bsid(), 6);
        family.ensure_bsid_allocated(2);
        assert_eq!(family.next_bsid(), 6);
    }

    #[test]
    fn ranges_respect_custom_offsets() {
        let family = Family::new(5, 10);
        assert_eq!(family.first_bsid(), 5);
        assert_eq!(family.first_eid(), 10);
        assert_eq!(family.next_bsid(), 5);
        assert_eq!(family.next_eid(), 10);
    }
}
