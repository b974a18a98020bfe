//! Parser for the text form written by [`crate::areas::serialize`].
//!
//! Mirrors the grammar exactly, including the full `[first_eid, next_eid)`
//! element-line range per branch instance. Branches in the input must appear
//! outer-before-inner (the order `serialize_revision` always writes them
//! in) — each `at <PATH>` clause is resolved against the partially built
//! tree so far, via
//! [`crate::areas::nested::find_nested_branch_element_by_rrpath`]. Payloads
//! are never present in the text form; once the whole tree is built, every
//! element is assigned a fresh by-reference payload pointing at its own
//! rrpath in this revision, so a parsed tree always comes out fully
//! payload-populated.

use crate::areas::nested::find_nested_branch_element_by_rrpath;
use crate::areas::path;
use crate::artifacts::branch::{BranchInstance, InstanceId};
use crate::artifacts::element::Payload;
use crate::artifacts::family::Family;
use crate::artifacts::revision_root::RevisionRoot;
use crate::error::{Bsid, Eid, Error, Result};

fn undot(s: &str) -> String {
    if s == "." { String::new() } else { s.to_string() }
}

fn parse_error(line: usize, message: impl Into<String>) -> Error {
    Error::Parse {
        line,
        message: message.into(),
    }
}

fn eof() -> Error {
    parse_error(usize::MAX, "unexpected end of input")
}

struct Lines<'a> {
    items: std::iter::Enumerate<std::str::Lines<'a>>,
}

impl<'a> Lines<'a> {
    fn new(text: &'a str) -> Self {
        Lines {
            items: text.lines().enumerate(),
        }
    }

    /// Next non-blank line, 1-based line number and content.
    fn next(&mut self) -> Option<(usize, &'a str)> {
        for (idx, line) in self.items.by_ref() {
            if !line.trim().is_empty() {
                return Some((idx + 1, line));
            }
        }
        None
    }
}

/// Parse a full `r<REV>: / family: ... / b<BSID>: ... / b<BSID>e<EID>: ...`
/// document.
#[tracing::instrument(level = "debug", skip(text))]
pub fn parse_revision(text: &str) -> Result<(Family, RevisionRoot)> {
    let mut lines = Lines::new(text);

    let (line_no, line) = lines.next().ok_or_else(|| parse_error(1, "missing revision header"))?;
    let rev_str = line
        .strip_prefix('r')
        .and_then(|s| s.strip_suffix(':'))
        .ok_or_else(|| parse_error(line_no, "expected r<REV>: header"))?;
    let rev: i64 = rev_str.parse().map_err(|_| parse_error(line_no, "bad revision number"))?;

    let (line_no, line) = lines.next().ok_or_else(eof)?;
    let words: Vec<&str> = line.split_whitespace().collect();
    let ["family:", "bsids", first_bsid, next_bsid, "eids", first_eid, next_eid, "b-instances", n_instances] =
        words[..]
    else {
        return Err(parse_error(line_no, "malformed family line"));
    };
    let first_bsid: Bsid = first_bsid.parse().map_err(|_| parse_error(line_no, "bad first_bsid"))?;
    let next_bsid: Bsid = next_bsid.parse().map_err(|_| parse_error(line_no, "bad next_bsid"))?;
    let first_eid: Eid = first_eid.parse().map_err(|_| parse_error(line_no, "bad first_eid"))?;
    let next_eid: Eid = next_eid.parse().map_err(|_| parse_error(line_no, "bad next_eid"))?;
    let n_instances: usize = n_instances
        .parse()
        .map_err(|_| parse_error(line_no, "bad b-instances count"))?;

    let mut family = Family::new(first_bsid, first_eid);
    if next_bsid > first_bsid {
        family.ensure_bsid_allocated(next_bsid - 1);
    }
    if next_eid > first_eid {
        family.ensure_eid_allocated(next_eid - 1);
    }

    let mut root: Option<RevisionRoot> = None;

    for _ in 0..n_instances {
        let (line_no, line) = lines.next().ok_or_else(eof)?;
        let (bsid, root_eid, rrpath) = parse_branch_header(line_no, line)?;

        let instance_id = match &mut root {
            None => {
                if !rrpath.is_empty() {
                    return Err(parse_error(line_no, "first branch instance must sit at the top (at \".\")"));
                }
                let sibling = family.find_or_create_sibling(bsid, root_eid)?;
                let new_root = RevisionRoot::new(rev, sibling);
                let top_id = new_root.root_branch();
                root = Some(new_root);
                top_id
            }
            Some(existing) => {
                let (outer_id, anchor_eid) =
                    find_nested_branch_element_by_rrpath(existing, existing.root_branch(), &rrpath);
                let outer_id =
                    outer_id.ok_or_else(|| parse_error(line_no, format!("path {rrpath} does not resolve")))?;
                if anchor_eid == -1 {
                    return Err(parse_error(line_no, format!("path {rrpath} has no anchor element")));
                }
                let sibling = family.find_or_create_sibling(bsid, root_eid)?;
                existing.insert_instance(BranchInstance::nested(sibling, outer_id, anchor_eid))
            }
        };

        let root_mut = root.as_mut().expect("set above");
        parse_elements(&mut lines, root_mut, instance_id, &mut family, bsid, root_eid, first_eid, next_eid)?;
    }

    let mut root = root.ok_or_else(|| parse_error(1, "revision has no branch instances"))?;
    resolve_payloads(&mut root, &family, rev)?;
    Ok((family, root))
}

fn parse_branch_header(line_no: usize, line: &str) -> Result<(Bsid, Eid, String)> {
    // b<BSID>: root-eid <EID> at <PATH or ".">
    let (head, rest) = line
        .split_once(':')
        .ok_or_else(|| parse_error(line_no, "malformed branch header"))?;
    let bsid: Bsid = head
        .strip_prefix('b')
        .ok_or_else(|| parse_error(line_no, "malformed branch header"))?
        .parse()
        .map_err(|_| parse_error(line_no, "bad bsid"))?;
    let words: Vec<&str> = rest.split_whitespace().collect();
    let ["root-eid", root_eid, "at", at_path] = words[..] else {
        return Err(parse_error(line_no, "malformed branch header"));
    };
    let root_eid: Eid = root_eid.parse().map_err(|_| parse_error(line_no, "bad root eid"))?;
    Ok((bsid, root_eid, undot(at_path)))
}

#[allow(clippy::too_many_arguments)]
fn parse_elements(
    lines: &mut Lines,
    root: &mut RevisionRoot,
    instance_id: InstanceId,
    family: &mut Family,
    bsid: Bsid,
    branch_root_eid: Eid,
    first_eid: Eid,
    next_eid: Eid,
) -> Result<()> {
    for eid in first_eid..next_eid {
        let (line_no, line) = lines.next().ok_or_else(eof)?;
        let (head, rest) = line
            .split_once(':')
            .ok_or_else(|| parse_error(line_no, "malformed element line"))?;
        let expected = format!("b{bsid}e{eid}");
        if head != expected {
            return Err(parse_error(line_no, format!("expected element line {expected}:, got {head}:")));
        }
        let words: Vec<&str> = rest.split_whitespace().collect();
        let [parent_eid, name] = words[..] else {
            return Err(parse_error(line_no, "malformed element line"));
        };
        if name == "(null)" {
            continue;
        }
        let parent_eid: Eid = parent_eid.parse().map_err(|_| parse_error(line_no, "bad parent eid"))?;
        let name = undot(name);

        family.ensure_eid_allocated(eid);
        let branch = root.get_mut(instance_id).expect("just created or resolved");
        branch.e_map_mut().update(eid, parent_eid, name, None, branch_root_eid, family)?;
    }
    Ok(())
}

/// Walk every element of every parsed branch instance and assign it a
/// by-reference payload pointing at its own rrpath, since the text form
/// never carries payloads itself.
fn resolve_payloads(root: &mut RevisionRoot, family: &Family, rev: i64) -> Result<()> {
    let ids: Vec<InstanceId> = root.instances().map(|(id, _)| id).collect();
    let mut updates: Vec<(InstanceId, Eid, Eid, String, String)> = Vec::new();
    for id in &ids {
        let instance = root.get(*id).expect("collected above");
        for (eid, content) in instance.e_map().iter() {
            let rrpath = path::rrpath_by_eid(root, *id, eid).unwrap_or_default();
            updates.push((*id, eid, content.parent_eid(), content.name().to_string(), rrpath));
        }
    }
    for (id, eid, parent_eid, name, rrpath) in updates {
        let root_eid = root.get(id).expect("exists").root_eid();
        let branch = root.get_mut(id).expect("exists");
        branch
            .e_map_mut()
            .update(eid, parent_eid, name, Some(Payload::reference(rev, rrpath)), root_eid, family)?;
    }
    Ok(())
}
