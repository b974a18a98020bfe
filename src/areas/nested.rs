//! Nested-branch lookup: find which branch instance (root or an immediate
//! sub-branch, recursively) owns a given rrpath.

use crate::areas::path;
use crate::artifacts::branch::InstanceId;
use crate::artifacts::revision_root::RevisionRoot;
use crate::error::Eid;

/// Find the branch instance that owns `rrpath`, recursing into immediate
/// sub-branches first (the first one whose root_rrpath contains `rrpath`
/// wins — sub-branches must not overlap). Falls back to resolving within
/// `branch_id` itself. Returns `(None, -1)` if `rrpath` is not inside
/// `branch_id` at all.
pub fn find_nested_branch_element_by_rrpath(
    root: &RevisionRoot,
    branch_id: InstanceId,
    rrpath: &str,
) -> (Option<InstanceId>, Eid) {
    let branch_prefix = path::root_rrpath(root, branch_id);
    let Some(local) = path::strip_prefix_relpath(rrpath, &branch_prefix) else {
        return (None, -1);
    };

    for (sub_id, _) in root.immediate_subbranches(branch_id) {
        let (found_branch, found_eid) = find_nested_branch_element_by_rrpath(root, sub_id, rrpath);
        if found_branch.is_some() {
            return (found_branch, found_eid);
        }
    }

    let Some(branch) = root.get(branch_id) else {
        return (None, -1);
    };
    (Some(branch_id), path::eid_by_path(branch, &local))
}
