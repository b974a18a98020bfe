//! Branching: grafting a subtree into a new or existing nested branch
//! instance, preserving EIDs all the way down (as opposed to [`crate::areas::copy`]'s
//! copy semantics, which assigns fresh ones).

use std::collections::BTreeSet;

use crate::areas::copy;
use crate::artifacts::branch::{BranchInstance, InstanceId};
use crate::artifacts::family::{BranchSibling, Family};
use crate::artifacts::revision_root::RevisionRoot;
use crate::error::{Eid, Error, Result};

fn sibling_for_root(family: &mut Family, root_eid: Eid) -> BranchSibling {
    family
        .siblings()
        .iter()
        .find(|s| s.root_eid() == root_eid)
        .cloned()
        .unwrap_or_else(|| family.allocate_branch_sibling(root_eid))
}

/// Branch `from_eid`'s subtree (inside `from_branch_id`) into a brand-new
/// nested branch instance anchored at `new_parent_eid`/`new_name` inside
/// `to_branch_id`. Reuses an existing sibling definition if one already has
/// `from_eid` as its root (re-branching a subtree that was branched
/// before); otherwise allocates a fresh one. The anchor placeholder planted
/// in `to_branch_id` always gets a freshly allocated outer EID — `from_eid`
/// itself is left untouched in its own branch.
///
/// Recurses into every sub-branch already nested under `from_eid` in the
/// source branch, so the whole nested structure comes along.
#[tracing::instrument(level = "debug", skip(root, family))]
pub fn branch_subtree(
    root: &mut RevisionRoot,
    family: &mut Family,
    from_branch_id: InstanceId,
    from_eid: Eid,
    to_branch_id: InstanceId,
    new_parent_eid: Eid,
    new_name: &str,
) -> Result<InstanceId> {
    let from_branch = root.get(from_branch_id).ok_or_else(|| Error::Branching {
        message: format!("no such branch instance {from_branch_id}"),
    })?;
    if !from_branch.e_map().contains(from_eid) {
        return Err(Error::Branching {
            message: format!("element {from_eid} does not exist in branch {from_branch_id}"),
        });
    }
    let subtree = copy::get_subtree(from_branch, from_eid);

    let sibling = sibling_for_root(family, from_eid);
    let new_outer_eid = family.allocate_eid();

    let to_root_eid = root
        .get(to_branch_id)
        .ok_or_else(|| Error::Branching {
            message: format!("no such branch instance {to_branch_id}"),
        })?
        .root_eid();
    let to_branch = root.get_mut(to_branch_id).expect("checked above");
    to_branch
        .e_map_mut()
        .update_as_subbranch_root(new_outer_eid, new_parent_eid, new_name, to_root_eid, family)?;

    let new_instance_id = root.insert_instance(BranchInstance::nested(sibling, to_branch_id, new_outer_eid));
    copy::instantiate_subtree(root, family, new_instance_id, -1, "", subtree)?;

    let reachable: BTreeSet<Eid> = root
        .get(new_instance_id)
        .expect("just inserted")
        .e_map()
        .keys()
        .collect();

    let subs: Vec<(InstanceId, Eid)> = root
        .immediate_subbranches(from_branch_id)
        .map(|(id, inst)| (id, inst.outer_eid()))
        .collect();

    for (sub_id, anchor_eid) in subs {
        if reachable.contains(&anchor_eid) {
            branch_subtree_r2(root, family, sub_id, new_instance_id)?;
        }
    }

    Ok(new_instance_id)
}

/// Recursion worker: `sub_id`'s own subtree (rooted at its own `root_eid`)
/// has already been copied into `to_instance_id`, preserving EIDs, by the
/// caller's `instantiate_subtree` — so the EID that anchored `sub_id` in the
/// *original* outer branch (`sub_id`'s own `outer_eid`) now names the same
/// placeholder cell inside `to_instance_id`. This materialises that
/// placeholder into a real nested branch instance, reusing `sub_id`'s own
/// sibling definition, and recurses further.
fn branch_subtree_r2(
    root: &mut RevisionRoot,
    family: &mut Family,
    sub_id: InstanceId,
    to_instance_id: InstanceId,
) -> Result<()> {
    let sub_branch = root.get(sub_id).ok_or_else(|| Error::Branching {
        message: format!("no such branch instance {sub_id}"),
    })?;
    let root_eid = sub_branch.root_eid();
    let anchor_eid = sub_branch.outer_eid();
    let subtree = copy::get_subtree(sub_branch, root_eid);
    let sibling = sub_branch.sibling().clone();

    let new_nested_id = root.insert_instance(BranchInstance::nested(sibling, to_instance_id, anchor_eid));
    copy::instantiate_subtree(root, family, new_nested_id, -1, "", subtree)?;

    let reachable: BTreeSet<Eid> = root
        .get(new_nested_id)
        .expect("just inserted")
        .e_map()
        .keys()
        .collect();

    let grandsubs: Vec<(InstanceId, Eid)> = root
        .immediate_subbranches(sub_id)
        .map(|(id, inst)| (id, inst.outer_eid()))
        .collect();

    for (grandsub_id, anchor) in grandsubs {
        if reachable.contains(&anchor) {
            branch_subtree_r2(root, family, grandsub_id, new_nested_id)?;
        }
    }

    Ok(())
}

/// Re-point an *existing* branch instance at a fresh source subtree,
/// replacing its content wholesale (preserving EIDs) without creating a
/// new instance or touching its outer anchor. Sub-branch recursion is
/// identical to [`branch_subtree`]'s.
#[tracing::instrument(level = "debug", skip(root, family))]
pub fn branch_into(
    root: &mut RevisionRoot,
    family: &mut Family,
    from_branch_id: InstanceId,
    from_eid: Eid,
    to_instance_id: InstanceId,
) -> Result<()> {
    let from_branch = root.get(from_branch_id).ok_or_else(|| Error::Branching {
        message: format!("no such branch instance {from_branch_id}"),
    })?;
    if !from_branch.e_map().contains(from_eid) {
        return Err(Error::Branching {
            message: format!("element {from_eid} does not exist in branch {from_branch_id}"),
        });
    }
    let subtree = copy::get_subtree(from_branch, from_eid);

    // Wholesale re-point: `to_instance_id`'s prior content is discarded
    // rather than merged with the new subtree.
    root.get_mut(to_instance_id)
        .ok_or_else(|| Error::Branching {
            message: format!("no such branch instance {to_instance_id}"),
        })?
        .e_map_mut()
        .clear();
    copy::instantiate_subtree(root, family, to_instance_id, -1, "", subtree)?;

    let reachable: BTreeSet<Eid> = root
        .get(to_instance_id)
        .expect("checked above")
        .e_map()
        .keys()
        .collect();

    let subs: Vec<(InstanceId, Eid)> = root
        .immediate_subbranches(from_branch_id)
        .map(|(id, inst)| (id, inst.outer_eid()))
        .collect();

    for (sub_id, anchor_eid) in subs {
        if reachable.contains(&anchor_eid) {
            branch_subtree_r2(root, family, sub_id, to_instance_id)?;
        }
    }

    Ok(())
}

/// Copy `from_eid`'s subtree (assigning fresh EIDs throughout) into
/// `to_branch_id` at `new_parent_eid`/`new_name`.
///
/// Does **not** propagate nested sub-branches under `from_eid` — a
/// plain copy of a directory that happens to contain a mount point drops
/// the mount, rather than guessing whether the caller wants it branched or
/// flattened. Copying with sub-branches intact is `branch_subtree`'s job.
#[tracing::instrument(level = "debug", skip(root, family))]
pub fn copy_subtree_r(
    root: &mut RevisionRoot,
    family: &mut Family,
    from_branch_id: InstanceId,
    from_eid: Eid,
    to_branch_id: InstanceId,
    new_parent_eid: Eid,
    new_name: &str,
) -> Result<Eid> {
    let from_branch = root.get(from_branch_id).ok_or_else(|| Error::Branching {
        message: format!("no such branch instance {from_branch_id}"),
    })?;
    if !from_branch.e_map().contains(from_eid) {
        return Err(Error::Branching {
            message: format!("element {from_eid} does not exist in branch {from_branch_id}"),
        });
    }
    let subtree = copy::get_subtree(from_branch, from_eid);
    copy::add_subtree(
        root,
        family,
        to_branch_id,
        copy::ALLOCATE,
        new_parent_eid,
        new_name,
        &subtree,
    )
}
