mod common;

use branch_core::commands::editor::Editor;
use branch_core::commands::handler::EditorHandler;
use branch_core::error::Error;
use pretty_assertions::assert_eq;

#[test]
fn abort_discards_further_operations() {
    let (family, revision, branch_id, root_eid) = common::fresh_revision();
    let mut editor = Editor::new(revision, family);

    let eid = editor.new_eid().unwrap();
    editor.add(branch_id, eid, root_eid, "a.txt", None).unwrap();
    editor.abort().unwrap();

    let err = editor.add(branch_id, 999, root_eid, "b.txt", None).unwrap_err();
    assert!(matches!(err, Error::Consistency { .. }));
    assert_eq!(editor.stats().add, 1);
}

#[test]
fn double_abort_is_rejected() {
    let (family, revision, _branch_id, _root_eid) = common::fresh_revision();
    let mut editor = Editor::new(revision, family);
    editor.abort().unwrap();
    assert!(editor.abort().is_err());
}

#[test]
fn cancellation_hook_can_be_toggled_between_calls() {
    let (family, revision, branch_id, root_eid) = common::fresh_revision();
    let mut editor = Editor::new(revision, family);

    let mut allow = false;
    editor.set_cancel_hook(move || {
        allow = !allow;
        !allow
    });

    // First call: `allow` flips to true, hook returns false, call proceeds.
    editor.new_eid().unwrap();
    // Second call: `allow` flips to false, hook returns true, call is cancelled.
    let err = editor.new_eid().unwrap_err();
    assert!(matches!(err, Error::Cancelled));

    assert_eq!(editor.stats().new_eid, 1);
    editor.complete().unwrap();
    let _ = (branch_id, root_eid);
}

#[test]
fn sequence_points_interleave_with_edits_in_stats() {
    let (family, revision, branch_id, root_eid) = common::fresh_revision();
    let mut editor = Editor::new(revision, family);

    let a = editor.new_eid().unwrap();
    editor.add(branch_id, a, root_eid, "a.txt", None).unwrap();
    editor.sequence_point().unwrap();
    let b = editor.new_eid().unwrap();
    editor.add(branch_id, b, root_eid, "b.txt", None).unwrap();
    editor.sequence_point().unwrap();
    editor.complete().unwrap();

    assert_eq!(editor.stats().sequence_point, 2);
    assert_eq!(editor.stats().add, 2);
    assert_eq!(editor.stats().new_eid, 2);
}
