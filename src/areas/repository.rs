//! Repository: an ordered sequence of revision roots sharing one family.

use crate::artifacts::family::Family;
use crate::artifacts::revision_root::RevisionRoot;
use crate::error::{Error, Result};

/// An ordered sequence of [`RevisionRoot`]s, all drawing EIDs and BSIDs from
/// a single shared [`Family`].
#[derive(Debug, Clone)]
pub struct Repository {
    family: Family,
    rev_roots: Vec<RevisionRoot>,
}

impl Repository {
    /// Create a repository with a single revision 0, whose top branch is a
    /// freshly allocated sibling.
    #[tracing::instrument(level = "debug")]
    pub fn new(first_bsid: i64, first_eid: i64) -> Self {
        let mut family = Family::new(first_bsid, first_eid);
        let root_eid = family.allocate_eid();
        let sibling = family.allocate_branch_sibling(root_eid);
        let mut revision = RevisionRoot::new(0, sibling);
        let top = revision.root_branch();
        revision
            .get_mut(top)
            .expect("just created")
            .e_map_mut()
            .update(root_eid, -1, "", None, root_eid, &family)
            .expect("fresh root element is always valid");
        Repository {
            family,
            rev_roots: vec![revision],
        }
    }

    pub fn family(&self) -> &Family {
        &self.family
    }

    pub fn family_mut(&mut self) -> &mut Family {
        &mut self.family
    }

    /// Number of revisions currently held (including revision 0).
    pub fn revision_count(&self) -> usize {
        self.rev_roots.len()
    }

    /// The revision root at `rev`.
    pub fn revision(&self, rev: i64) -> Result<&RevisionRoot> {
        self.rev_roots
            .get(usize::try_from(rev).unwrap_or(usize::MAX))
            .ok_or(Error::NoSuchRevision {
                revision: rev,
                count: self.rev_roots.len(),
            })
    }

    pub fn revision_mut(&mut self, rev: i64) -> Result<&mut RevisionRoot> {
        let count = self.rev_roots.len();
        self.rev_roots
            .get_mut(usize::try_from(rev).unwrap_or(usize::MAX))
            .ok_or(Error::NoSuchRevision {
                revision: rev,
                count,
            })
    }

    pub fn head(&self) -> &RevisionRoot {
        self.rev_roots.last().expect("always has revision 0")
    }

    /// Append a new revision root that starts as a clone of the current
    /// head (the editor façade mutates the clone and then commits it here).
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn begin_next_revision(&mut self) -> &mut RevisionRoot {
        let next_rev = self.rev_roots.len() as i64;
        let mut next = self.head().clone();
        // RevisionRoot doesn't expose a rev setter; rebuild via a fresh
        // struct carrying the same instances would duplicate bookkeeping,
        // so push the clone and patch its rev field through a dedicated
        // constructor-free path instead.
        next.set_rev(next_rev);
        self.rev_roots.push(next);
        self.rev_roots.last_mut().expect("just pushed")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_repository_has_one_revision() {
        let repo = Repository::new(0, 0);
        assert_eq!(repo.revision_count(), 1);
        assert!(repo.revision(0).is_ok());
    }

    #[test]
    fn out_of_range_revision_errors() {
        let repo = Repository::new(0, 0);
        let err = repo.revision(5).unwrap_err();
        assert!(matches!(
            err,
            Error::NoSuchRevision {
                revision: 5,
                count: 1
            }
        ));
    }

    #[test]
    fn begin_next_revision_clones_head() {
        let mut repo = Repository::new(0, 0);
        let head_top = repo.head().root_branch();
        let head_root_eid = repo.head().get(head_top).unwrap().root_eid();
        repo.begin_next_revision();
        assert_eq!(repo.revision_count(), 2);
        assert_eq!(repo.revision(1).unwrap().rev(), 1);
        assert!(repo
            .revision(1)
            .unwrap()
            .get(head_top)
            .unwrap()
            .e_map()
            .contains(head_root_eid));
    }
}
