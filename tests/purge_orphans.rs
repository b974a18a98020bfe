mod common;

use branch_core::areas::purge::{purge_orphans, purge_r};
use branch_core::artifacts::branch::BranchInstance;
use pretty_assertions::assert_eq;

#[test]
fn fixed_point_sweep_removes_chains_of_orphans() {
    let (mut family, mut revision, branch_id, root_eid) = common::fresh_revision();
    let a = family.allocate_eid();
    let b = family.allocate_eid();
    let c = family.allocate_eid();
    {
        let map = revision.get_mut(branch_id).unwrap().e_map_mut();
        map.update(a, root_eid, "a", None, root_eid, &family).unwrap();
        map.update(b, a, "b", None, root_eid, &family).unwrap();
        map.update(c, b, "c", None, root_eid, &family).unwrap();
        // Sever the chain at `a` without going through validation, simulating
        // a partially-applied move.
        map.remove(a);
    }

    purge_orphans(revision.get_mut(branch_id).unwrap().e_map_mut(), root_eid);

    let map = revision.get(branch_id).unwrap().e_map();
    assert!(map.contains(root_eid));
    assert!(!map.contains(a));
    assert!(!map.contains(b));
    assert!(!map.contains(c));
}

#[test]
fn purge_r_deletes_a_subbranch_whose_anchor_is_gone() {
    let (mut family, mut revision, branch_id, root_eid) = common::fresh_revision();
    let dir = family.allocate_eid();
    revision
        .get_mut(branch_id)
        .unwrap()
        .e_map_mut()
        .update_as_subbranch_root(dir, root_eid, "proj", root_eid, &family)
        .unwrap();

    let inner_sibling = family.allocate_branch_sibling(dir);
    let inner_id = revision.insert_instance(BranchInstance::nested(inner_sibling, branch_id, dir));
    revision
        .get_mut(inner_id)
        .unwrap()
        .e_map_mut()
        .update(dir, -1, "", None, dir, &family)
        .unwrap();

    // Remove the anchor directly, bypassing validation, as if a concurrent
    // move had clobbered it.
    revision.get_mut(branch_id).unwrap().e_map_mut().remove(dir);

    purge_r(&mut revision, branch_id);

    assert!(revision.get(inner_id).is_none());
}

#[test]
fn purge_r_keeps_a_subbranch_whose_anchor_survives() {
    let (mut family, mut revision, branch_id, root_eid) = common::fresh_revision();
    let dir = family.allocate_eid();
    revision
        .get_mut(branch_id)
        .unwrap()
        .e_map_mut()
        .update_as_subbranch_root(dir, root_eid, "proj", root_eid, &family)
        .unwrap();

    let inner_sibling = family.allocate_branch_sibling(dir);
    let inner_id = revision.insert_instance(BranchInstance::nested(inner_sibling, branch_id, dir));
    revision
        .get_mut(inner_id)
        .unwrap()
        .e_map_mut()
        .update(dir, -1, "", None, dir, &family)
        .unwrap();

    purge_r(&mut revision, branch_id);

    assert!(revision.get(inner_id).is_some());
    assert_eq!(revision.get(branch_id).unwrap().e_map().len(), 2);
}
