//! Subtree extraction, copy (assign-new-EIDs) and instantiation
//! (preserve-EIDs).

use crate::areas::purge;
use crate::artifacts::branch::{BranchInstance, InstanceId};
use crate::artifacts::element::ElementContent;
use crate::artifacts::family::Family;
use crate::artifacts::revision_root::RevisionRoot;
use crate::artifacts::subtree::Subtree;
use crate::error::{Eid, Error, Result};

/// Shallow-copy the whole branch into a free-standing [`Subtree`] rooted at
/// `eid`. Deliberately includes unrelated elements (`spec.md` §4.6, §9) —
/// callers re-filter by reachability when they need to (e.g.
/// [`instantiate_subtree`] purges before copying remaining elements).
pub fn get_subtree(branch: &BranchInstance, eid: Eid) -> Subtree {
    Subtree::new(eid, branch.e_map().clone())
}

/// Sentinel meaning "allocate a fresh EID for the subtree root", matching
/// `spec.md`'s `to_eid?` parameter.
pub const ALLOCATE: Eid = -1;

/// Copy semantics: assign fresh EIDs to the subtree root and every
/// descendant reachable from it, preserving the relative tree shape.
/// Returns the EID the subtree root was placed at.
pub fn add_subtree(
    root: &mut RevisionRoot,
    family: &mut Family,
    to_branch_id: InstanceId,
    to_eid: Eid,
    new_parent_eid: Eid,
    new_name: &str,
    subtree: &Subtree,
) -> Result<Eid> {
    let to_branch_root_eid = root
        .get(to_branch_id)
        .ok_or_else(|| Error::Consistency {
            message: format!("no such branch instance {to_branch_id}"),
        })?
        .root_eid();

    let assigned_eid = if to_eid == ALLOCATE {
        family.allocate_eid()
    } else {
        to_eid
    };

    let source_content = subtree.e_map().get(subtree.root_eid()).cloned();
    place_one(
        root,
        family,
        to_branch_id,
        to_branch_root_eid,
        assigned_eid,
        new_parent_eid,
        new_name,
        source_content.as_ref(),
    )?;

    let children: Vec<(Eid, String)> = subtree
        .e_map()
        .iter()
        .filter(|&(eid, content)| eid != subtree.root_eid() && content.parent_eid() == subtree.root_eid())
        .map(|(eid, content)| (eid, content.name().to_string()))
        .collect();

    for (child_eid, child_name) in children {
        let child_subtree = Subtree::new(child_eid, subtree.e_map().clone());
        add_subtree(
            root,
            family,
            to_branch_id,
            ALLOCATE,
            assigned_eid,
            &child_name,
            &child_subtree,
        )?;
    }

    Ok(assigned_eid)
}

/// Branch semantics: place the subtree root at its *original* EID
/// (allowing sibling branches to share EIDs), purge orphans from the
/// incoming subtree, then copy every remaining non-root element unchanged.
pub fn instantiate_subtree(
    root: &mut RevisionRoot,
    family: &Family,
    to_branch_id: InstanceId,
    new_parent_eid: Eid,
    new_name: &str,
    mut subtree: Subtree,
) -> Result<()> {
    let to_branch_root_eid = root
        .get(to_branch_id)
        .ok_or_else(|| Error::Consistency {
            message: format!("no such branch instance {to_branch_id}"),
        })?
        .root_eid();

    let subtree_root_eid = subtree.root_eid();
    let source_content = subtree.e_map().get(subtree_root_eid).cloned();
    place_one(
        root,
        family,
        to_branch_id,
        to_branch_root_eid,
        subtree_root_eid,
        new_parent_eid,
        new_name,
        source_content.as_ref(),
    )?;

    purge::purge_orphans(subtree.e_map_mut(), subtree_root_eid);

    let remaining: Vec<(Eid, ElementContent)> = subtree
        .e_map()
        .iter()
        .filter(|&(eid, _)| eid != subtree_root_eid)
        .map(|(eid, content)| (eid, content.clone()))
        .collect();

    for (eid, content) in remaining {
        root.get_mut(to_branch_id)
            .expect("checked above")
            .e_map_mut()
            .set(eid, Some(content), to_branch_root_eid, family)?;
    }

    Ok(())
}

/// Place a single element at `assigned_eid` in `to_branch_id`: if the
/// source content carries a payload, `update`; if it is a payload-less
/// placeholder (or absent entirely), `update_as_subbranch_root`.
fn place_one(
    root: &mut RevisionRoot,
    family: &Family,
    to_branch_id: InstanceId,
    to_branch_root_eid: Eid,
    assigned_eid: Eid,
    new_parent_eid: Eid,
    new_name: &str,
    source_content: Option<&ElementContent>,
) -> Result<()> {
    let branch = root.get_mut(to_branch_id).expect("checked by caller");
    match source_content {
        Some(content) if content.payload().is_some() => branch.e_map_mut().update(
            assigned_eid,
            new_parent_eid,
            new_name,
            content.payload().cloned(),
            to_branch_root_eid,
            family,
        ),
        _ => branch.e_map_mut().update_as_subbranch_root(
            assigned_eid,
            new_parent_eid,
            new_name,
            to_branch_root_eid,
            family,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::element::Payload;

    fn fresh_revision() -> (Family, RevisionRoot, InstanceId) {
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
        (family, revision, branch_id)
    }

    #[test]
    fn add_subtree_assigns_fresh_eids() {
        let (mut family, mut revision, branch_id) = fresh_revision();
        let root_eid = revision.get(branch_id).unwrap().root_eid();

        let file = family.allocate_eid();
        {
            let branch = revision.get_mut(branch_id).unwrap();
            branch
                .e_map_mut()
                .update(
                    file,
                    root_eid,
                    "f.txt",
                    Some(Payload::reference(0, "f.txt")),
                    root_eid,
                    &family,
                )
                .unwrap();
        }

        let subtree = get_subtree(revision.get(branch_id).unwrap(), file);
        let new_eid = add_subtree(
            &mut revision,
            &mut family,
            branch_id,
            ALLOCATE,
            root_eid,
            "copy.txt",
            &subtree,
        )
        .unwrap();

        assert_ne!(new_eid, file);
        let branch = revision.get(branch_id).unwrap();
        assert_eq!(branch.e_map().get(new_eid).unwrap().name(), "copy.txt");
        // the original element is untouched
        assert_eq!(branch.e_map().get(file).unwrap().name(), "f.txt");
    }

    #[test]
    fn instantiate_subtree_preserves_eid() {
        let (family, mut revision, branch_id) = fresh_revision();
        let root_eid = revision.get(branch_id).unwrap().root_eid();

        let subtree = get_subtree(revision.get(branch_id).unwrap(), root_eid);
        let mut other_family = family.clone();
        let other_root = other_family.allocate_eid();
        let other_sibling = other_family.allocate_branch_sibling(other_root);
        let mut other_revision = RevisionRoot::new(1, other_sibling.clone());
        let other_top = other_revision.root_branch();
        other_revision
            .get_mut(other_top)
            .unwrap()
            .e_map_mut()
            .update(other_root, -1, "", None, other_root, &other_family)
            .unwrap();

        let dir_eid = other_family.allocate_eid();
        other_revision
            .get_mut(other_top)
            .unwrap()
            .e_map_mut()
            .update_as_subbranch_root(dir_eid, other_root, "dir", other_root, &other_family)
            .unwrap();
        let nested_sibling = other_family.allocate_branch_sibling(root_eid);
        let nested_id = other_revision.insert_instance(crate::artifacts::branch::BranchInstance::nested(
            nested_sibling,
            other_top,
            dir_eid,
        ));

        instantiate_subtree(&mut other_revision, &other_family, nested_id, -1, "", subtree).unwrap();

        assert!(other_revision.get(nested_id).unwrap().e_map().contains(root_eid));
    }
}
