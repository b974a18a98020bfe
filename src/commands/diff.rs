//! Subtree differencing: compares two element maps entry-by-entry, with
//! both sides' payloads resolved through the editor before comparison — an
//! element stored by-reference on one side and in full on the other must
//! not be reported as changed.

use std::collections::{BTreeMap, BTreeSet};

use crate::artifacts::branch::InstanceId;
use crate::artifacts::element::Payload;
use crate::artifacts::element_map::ElementMap;
use crate::commands::handler::EditorHandler;
use crate::error::{Eid, Result};

/// One side of a reported difference: an element's parent, name, and
/// resolved payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedElement {
    pub parent_eid: Eid,
    pub name: String,
    pub payload: Option<Payload>,
}

/// Compare every EID present in `left` or `right`, resolving both sides'
/// payloads through `editor` before comparing. Whole-map comparison,
/// matching the same looseness [`crate::areas::copy::get_subtree`] uses —
/// callers that only care about one subtree are expected to have already
/// narrowed `left`/`right` to the EIDs they want compared. An EID missing
/// an entry in the returned map means both sides agree on it.
#[tracing::instrument(level = "debug", skip(editor, left, right))]
pub fn subtree_differences(
    editor: &mut dyn EditorHandler,
    left_branch: InstanceId,
    left: &ElementMap,
    right_branch: InstanceId,
    right: &ElementMap,
) -> Result<BTreeMap<Eid, (Option<ResolvedElement>, Option<ResolvedElement>)>> {
    let mut eids: BTreeSet<Eid> = left.keys().collect();
    eids.extend(right.keys());

    let mut diffs = BTreeMap::new();
    for eid in eids {
        let left_side = resolve(editor, left, left_branch, eid)?;
        let right_side = resolve(editor, right, right_branch, eid)?;
        if left_side != right_side {
            diffs.insert(eid, (left_side, right_side));
        }
    }

    Ok(diffs)
}

fn resolve(
    editor: &mut dyn EditorHandler,
    map: &ElementMap,
    branch_id: InstanceId,
    eid: Eid,
) -> Result<Option<ResolvedElement>> {
    let Some(content) = map.get(eid) else {
        return Ok(None);
    };
    Ok(Some(ResolvedElement {
        parent_eid: content.parent_eid(),
        name: content.name().to_string(),
        payload: editor.payload_resolve(branch_id, eid)?,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::branch::BranchInstance;
    use crate::artifacts::family::Family;
    use crate::artifacts::revision_root::RevisionRoot;
    use crate::commands::editor::Editor;

    fn editor_with_two_branches() -> (Editor, InstanceId, InstanceId, Eid) {
        let mut family = Family::new(0, 0);
        let root_eid = family.allocate_eid();
        let sibling_a = family.allocate_branch_sibling(root_eid);
        let mut root = RevisionRoot::new(0, sibling_a);
        let branch_a = root.root_branch();
        root.get_mut(branch_a)
            .unwrap()
            .e_map_mut()
            .update(root_eid, -1, "", None, root_eid, &family)
            .unwrap();

        let sibling_b = family.allocate_branch_sibling(root_eid);
        let branch_b = root.insert_instance(BranchInstance::top(sibling_b));
        root.get_mut(branch_b)
            .unwrap()
            .e_map_mut()
            .update(root_eid, -1, "", None, root_eid, &family)
            .unwrap();

        (Editor::new(root, family), branch_a, branch_b, root_eid)
    }

    #[test]
    fn detects_added_removed_and_changed() {
        let (mut editor, branch_a, branch_b, root_eid) = editor_with_two_branches();

        let a = editor.new_eid().unwrap();
        editor.add(branch_a, a, root_eid, "a", None).unwrap();
        let b = editor.new_eid().unwrap();
        editor.add(branch_a, b, root_eid, "b", None).unwrap();

        editor.add(branch_b, a, root_eid, "a-renamed", None).unwrap();
        let c = editor.new_eid().unwrap();
        editor.add(branch_b, c, root_eid, "c", None).unwrap();

        let left = editor.root().get(branch_a).unwrap().e_map().clone();
        let right = editor.root().get(branch_b).unwrap().e_map().clone();

        let diffs = subtree_differences(&mut editor, branch_a, &left, branch_b, &right).unwrap();

        assert!(diffs.contains_key(&a));
        assert_eq!(diffs[&a].0.as_ref().unwrap().name, "a");
        assert_eq!(diffs[&a].1.as_ref().unwrap().name, "a-renamed");

        assert!(diffs.contains_key(&b));
        assert!(diffs[&b].0.is_some());
        assert!(diffs[&b].1.is_none());

        assert!(diffs.contains_key(&c));
        assert!(diffs[&c].0.is_none());
        assert!(diffs[&c].1.is_some());

        assert!(!diffs.contains_key(&root_eid));
    }

    #[test]
    fn identical_maps_have_no_differences() {
        let (mut editor, branch_a, _branch_b, _root_eid) = editor_with_two_branches();
        let map = editor.root().get(branch_a).unwrap().e_map().clone();
        let diffs = subtree_differences(&mut editor, branch_a, &map, branch_a, &map).unwrap();
        assert!(diffs.is_empty());
    }

    #[test]
    fn a_full_payload_and_its_reference_compare_equal_through_resolution() {
        let (mut editor, branch_a, branch_b, root_eid) = editor_with_two_branches();

        let file = editor.new_eid().unwrap();
        editor
            .add(branch_a, file, root_eid, "f.txt", Some(Payload::reference(0, "f.txt")))
            .unwrap();
        editor
            .add(branch_b, file, root_eid, "f.txt", Some(Payload::reference(0, "f.txt")))
            .unwrap();

        let left = editor.root().get(branch_a).unwrap().e_map().clone();
        let right = editor.root().get(branch_b).unwrap().e_map().clone();
        let diffs = subtree_differences(&mut editor, branch_a, &left, branch_b, &right).unwrap();
        assert!(!diffs.contains_key(&file));
    }
}
