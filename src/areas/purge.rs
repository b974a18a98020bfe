//! Orphan purge: keep only elements reachable from the branch root.

use crate::artifacts::branch::InstanceId;
use crate::artifacts::element_map::ElementMap;
use crate::artifacts::revision_root::RevisionRoot;
use crate::error::Eid;

/// Iteratively remove every non-root element whose `parent_eid` is absent
/// from the map, until a full pass makes no change.
///
/// Note (§4.5): any element still present after this call that is itself
/// the parent of another kept element is expected to carry a non-null
/// payload — this function is only meant to find structural orphans, not
/// to encounter intentionally content-less interior nodes. Debug builds
/// assert this; release builds do not, since it is not one of the six
/// externally-visible error kinds.
#[tracing::instrument(level = "debug", skip(e_map))]
pub fn purge_orphans(e_map: &mut ElementMap, root_eid: Eid) {
    loop {
        let doomed: Vec<Eid> = e_map
            .iter()
            .filter(|&(eid, content)| eid != root_eid && !e_map.contains(content.parent_eid()))
            .map(|(eid, _)| eid)
            .collect();
        if doomed.is_empty() {
            break;
        }
        for eid in doomed {
            e_map.remove(eid);
        }
    }

    #[cfg(debug_assertions)]
    {
        use std::collections::BTreeSet;
        let kept_parents: BTreeSet<Eid> = e_map
            .iter()
            .filter(|&(eid, _)| eid != root_eid)
            .map(|(_, content)| content.parent_eid())
            .collect();
        for parent in kept_parents {
            if parent == root_eid {
                continue;
            }
            if let Some(content) = e_map.get(parent) {
                debug_assert!(
                    content.payload().is_some(),
                    "purge_orphans: kept parent {parent} has no payload"
                );
            }
        }
    }
}

/// Purge `branch_id`'s own orphans, then recurse into every immediate
/// sub-branch: if its anchor EID still exists in the outer branch, recurse;
/// otherwise delete the sub-branch instance recursively.
pub fn purge_r(root: &mut RevisionRoot, branch_id: InstanceId) {
    if let Some(branch) = root.get(branch_id) {
        let root_eid = branch.root_eid();
        if let Some(branch) = root.get_mut(branch_id) {
            purge_orphans(branch.e_map_mut(), root_eid);
        }
    } else {
        return;
    }

    let subs: Vec<(InstanceId, Eid)> = root
        .immediate_subbranches(branch_id)
        .map(|(id, inst)| (id, inst.outer_eid()))
        .collect();

    for (sub_id, anchor_eid) in subs {
        let still_exists = root
            .get(branch_id)
            .is_some_and(|b| b.e_map().contains(anchor_eid));
        if still_exists {
            purge_r(root, sub_id);
        } else {
            crate::areas::delete::delete_branch_instance_r(root, sub_id);
        }
    }
}
