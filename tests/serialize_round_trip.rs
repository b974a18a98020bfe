mod common;

use branch_core::areas::branching::branch_subtree;
use branch_core::areas::parse::parse_revision;
use branch_core::areas::serialize::serialize_revision;
use branch_core::artifacts::element::{Kind, Payload};
use pretty_assertions::assert_eq;

#[test]
fn a_tree_with_a_nested_branch_survives_a_round_trip() {
    let (mut family, mut revision, branch_id, root_eid) = common::fresh_revision();

    let dir = family.allocate_eid();
    revision
        .get_mut(branch_id)
        .unwrap()
        .e_map_mut()
        .update_as_subbranch_root(dir, root_eid, "proj", root_eid, &family)
        .unwrap();
    let file = family.allocate_eid();
    revision
        .get_mut(branch_id)
        .unwrap()
        .e_map_mut()
        .update(
            file,
            dir,
            "lib.rs",
            Some(Payload::full(Kind::File, Default::default())),
            root_eid,
            &family,
        )
        .unwrap();

    branch_subtree(&mut revision, &mut family, branch_id, dir, branch_id, root_eid, "proj-branch").unwrap();

    let text = serialize_revision(&family, &mut revision);
    let (parsed_family, mut parsed_root) = parse_revision(&text).unwrap();

    assert_eq!(parsed_family.next_eid(), family.next_eid());
    assert_eq!(parsed_root.instances().count(), revision.instances().count());

    let reserialized = serialize_revision(&parsed_family, &mut parsed_root);
    assert_eq!(text, reserialized);
}

#[test]
fn a_full_payload_is_not_serialized_and_becomes_a_reference() {
    let (mut family, mut revision, branch_id, root_eid) = common::fresh_revision();
    let file = family.allocate_eid();
    let mut props = std::collections::BTreeMap::new();
    props.insert("mode".to_string(), "644".to_string());
    revision
        .get_mut(branch_id)
        .unwrap()
        .e_map_mut()
        .update(file, root_eid, "f.txt", Some(Payload::full(Kind::File, props)), root_eid, &family)
        .unwrap();

    let text = serialize_revision(&family, &mut revision);
    assert!(!text.contains("644"));
    let (_, parsed_root) = parse_revision(&text).unwrap();

    let branch = parsed_root.get(parsed_root.root_branch()).unwrap();
    let content = branch.e_map().get(file).unwrap();
    assert_eq!(content.payload(), Some(&Payload::reference(0, "f.txt")));
}
