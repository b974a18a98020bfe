//! Shared scaffolding for integration tests: build a fresh, single-element
//! revision root/family pair to exercise operations against.

use branch_core::artifacts::branch::InstanceId;
use branch_core::artifacts::family::Family;
use branch_core::artifacts::revision_root::RevisionRoot;
use branch_core::error::Eid;

/// A brand-new revision root with just its (empty, payload-less) root
/// element present.
pub fn fresh_revision() -> (Family, RevisionRoot, InstanceId, Eid) {
    let mut family = Family::new(0, 0);
    let root_eid = family.allocate_eid();
    let sibling = family.allocate_branch_sibling(root_eid);
    let mut revision = RevisionRoot::new(0, sibling);
    let branch_id = revision.root_branch();
    revision
        .get_mut(branch_id)
        .unwrap()
        .e_map_mut()
        .update(root_eid, -1, "", None, root_eid, &family)
        .unwrap();
    (family, revision, branch_id, root_eid)
}
