//! Recursive branch-instance deletion.

use crate::artifacts::branch::InstanceId;
use crate::artifacts::revision_root::RevisionRoot;

/// Recurse over all immediate sub-branches, then remove `branch_id` from
/// its revision root's instance list.
///
/// Does not modify any outer branch's element map — the caller must deal
/// with the outer EID itself.
pub fn delete_branch_instance_r(root: &mut RevisionRoot, branch_id: InstanceId) {
    let subs: Vec<InstanceId> = root
        .immediate_subbranches(branch_id)
        .map(|(id, _)| id)
        .collect();
    for sub in subs {
        delete_branch_instance_r(root, sub);
    }
    root.remove_instance(branch_id);
}
