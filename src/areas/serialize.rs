//! Deterministic line-oriented text serialization of a [`RevisionRoot`].
//!
//! One `r<REV>:` header line, one `family: ...` range line, then for every
//! branch instance a `b<BSID>: root-eid <EID> at <PATH>` header followed by
//! exactly `next_eid - first_eid` element lines — covering the *whole*
//! family EID range, not just the EIDs this instance actually holds, with
//! EIDs the instance doesn't have written as `(null)` holes. `"."` stands in
//! for an empty name or path wherever one is allowed, never the literal
//! string found in the data model. Element payloads are never written here;
//! [`crate::areas::parse`] reconstructs them by reference after parsing.

use std::fmt::Write as _;

use crate::areas::path;
use crate::areas::purge;
use crate::artifacts::family::Family;
use crate::artifacts::revision_root::RevisionRoot;

fn dot_or(s: &str) -> &str {
    if s.is_empty() { "." } else { s }
}

/// Serialize `root`'s text form. Purges orphans first, so the written form
/// never has to represent a structurally broken tree; the parser relies on
/// that having been done.
#[tracing::instrument(level = "debug", skip(family, root))]
pub fn serialize_revision(family: &Family, root: &mut RevisionRoot) -> String {
    purge::purge_r(root, root.root_branch());

    let mut out = String::new();
    writeln!(out, "r{}:", root.rev()).unwrap();

    let ids: Vec<_> = root.instances().map(|(id, _)| id).collect();
    writeln!(
        out,
        "family: bsids {} {} eids {} {} b-instances {}",
        family.first_bsid(),
        family.next_bsid(),
        family.first_eid(),
        family.next_eid(),
        ids.len()
    )
    .unwrap();

    for id in ids {
        let instance = root.get(id).expect("collected above");
        let bsid = instance.bsid();
        let root_eid = instance.root_eid();
        let anchor_path = path::root_rrpath(root, id);
        writeln!(out, "b{bsid}: root-eid {root_eid} at {}", dot_or(&anchor_path)).unwrap();

        for eid in family.first_eid()..family.next_eid() {
            match instance.e_map().get(eid) {
                Some(content) => {
                    let name = if eid == root_eid { "." } else { dot_or(content.name()) };
                    writeln!(out, "b{bsid}e{eid}: {} {name}", content.parent_eid()).unwrap();
                }
                None => {
                    writeln!(out, "b{bsid}e{eid}: -1 (null)").unwrap();
                }
            }
        }
    }

    out
}
