//! Path resolution: compute a relative path from an EID by walking the
//! parent chain, and the inverse (linear-scan) lookup.

use crate::artifacts::branch::{BranchInstance, InstanceId};
use crate::artifacts::element::RelPath;
use crate::artifacts::revision_root::RevisionRoot;
use crate::error::Eid;

/// Join two relative path segments with `/`, treating an empty segment as
/// absent rather than inserting a stray separator.
fn join(a: &str, b: &str) -> RelPath {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => String::new(),
        (true, false) => b.to_string(),
        (false, true) => a.to_string(),
        (false, false) => format!("{a}/{b}"),
    }
}

/// Walk parents from `eid` up to `branch.root_eid()`, joining names on the
/// way down. Returns `None` if the chain is broken (orphan) before it
/// reaches the root.
pub fn path_by_eid(branch: &BranchInstance, eid: Eid) -> Option<RelPath> {
    let mut names = Vec::new();
    let mut current = eid;
    // Bound the walk: a well-formed map has no cycles (data model
    // invariant 7), so this only ever triggers on a malformed map, in which
    // case we treat it the same as a broken chain.
    let bound = branch.e_map().len() + 1;
    for _ in 0..=bound {
        if current == branch.root_eid() {
            names.reverse();
            return Some(names.join("/"));
        }
        let content = branch.e_map().get(current)?;
        names.push(content.name().to_string());
        current = content.parent_eid();
    }
    None
}

/// The rrpath of `branch`'s own root within the whole revision root: `""`
/// at the top, otherwise the outer branch's root_rrpath joined with the
/// outer branch's path to this branch's anchor.
pub fn root_rrpath(root: &RevisionRoot, branch_id: InstanceId) -> RelPath {
    let Some(branch) = root.get(branch_id) else {
        return String::new();
    };
    match branch.outer_branch() {
        None => String::new(),
        Some(outer_id) => {
            let outer_prefix = root_rrpath(root, outer_id);
            let anchor_path = root
                .get(outer_id)
                .and_then(|outer| path_by_eid(outer, branch.outer_eid()))
                .unwrap_or_default();
            join(&outer_prefix, &anchor_path)
        }
    }
}

/// `root_rrpath(branch) + path_by_eid(branch, eid)`, or `None` if `eid`'s
/// chain is broken within `branch`.
pub fn rrpath_by_eid(root: &RevisionRoot, branch_id: InstanceId, eid: Eid) -> Option<RelPath> {
    let branch = root.get(branch_id)?;
    let local = path_by_eid(branch, eid)?;
    Some(join(&root_rrpath(root, branch_id), &local))
}

/// Linear scan over the element map, comparing computed paths; ties are
/// resolved by first-found (ascending EID order). `-1` if absent.
pub fn eid_by_path(branch: &BranchInstance, path: &str) -> Eid {
    for (eid, _) in branch.e_map().iter() {
        if path_by_eid(branch, eid).as_deref() == Some(path) {
            return eid;
        }
    }
    -1
}

/// Strip `branch`'s root rrpath prefix from `rrpath`, then delegate to
/// [`eid_by_path`]. `-1` if `rrpath` lies outside the branch.
pub fn eid_by_rrpath(root: &RevisionRoot, branch_id: InstanceId, rrpath: &str) -> Eid {
    let Some(branch) = root.get(branch_id) else {
        return -1;
    };
    let prefix = root_rrpath(root, branch_id);
    match strip_prefix_relpath(rrpath, &prefix) {
        Some(local) => eid_by_path(branch, &local),
        None => -1,
    }
}

/// Strip a relpath `prefix` from `rrpath`, respecting path-segment
/// boundaries: `"a/b"` strips `"a"` but not `"ab"`.
pub fn strip_prefix_relpath(rrpath: &str, prefix: &str) -> Option<RelPath> {
    if prefix.is_empty() {
        return Some(rrpath.to_string());
    }
    if rrpath == prefix {
        return Some(String::new());
    }
    rrpath
        .strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('/'))
        .map(str::to_string)
}
