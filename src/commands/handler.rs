//! The callback interface every editor (and every wrapper around one)
//! implements.

use crate::artifacts::branch::InstanceId;
use crate::artifacts::element::Payload;
use crate::error::{Eid, Result};

/// Validated operation log for a single in-progress edit.
///
/// Implementations (the base [`crate::commands::editor::Editor`], and the
/// [`crate::commands::trace::TraceWrapper`] /
/// [`crate::commands::change_detection::ChangeDetectionWrapper`] decorators
/// around it) must reject calls once [`EditorHandler::complete`] or
/// [`EditorHandler::abort`] has been called.
pub trait EditorHandler {
    /// Allocate a fresh EID for use in a subsequent `add`/`copy_tree` call.
    fn new_eid(&mut self) -> Result<Eid>;

    /// Add a brand-new element at `eid` (normally obtained from
    /// [`EditorHandler::new_eid`]).
    fn add(
        &mut self,
        branch_id: InstanceId,
        eid: Eid,
        parent_eid: Eid,
        name: &str,
        payload: Option<Payload>,
    ) -> Result<()>;

    /// Copy a single element (not its descendants) from one location to
    /// another, assigning it `eid`. `from_rev` addresses the source
    /// revision; implementations that can only see one live revision (the
    /// base [`crate::commands::editor::Editor`] included) reject any value
    /// other than their own. `payload`, when given, overrides the source
    /// element's payload instead of copying it verbatim.
    fn copy_one(
        &mut self,
        from_branch_id: InstanceId,
        from_eid: Eid,
        from_rev: i64,
        to_branch_id: InstanceId,
        eid: Eid,
        parent_eid: Eid,
        name: &str,
        payload: Option<Payload>,
    ) -> Result<Eid>;

    /// Copy a whole subtree, assigning fresh EIDs throughout.
    fn copy_tree(
        &mut self,
        from_branch_id: InstanceId,
        from_eid: Eid,
        to_branch_id: InstanceId,
        parent_eid: Eid,
        name: &str,
    ) -> Result<Eid>;

    /// Delete `eid` and everything beneath it. Rejected when `eid` is the
    /// branch's own root: a branch instance cannot delete its own anchor.
    fn delete(&mut self, branch_id: InstanceId, eid: Eid) -> Result<()>;

    /// Change an existing element's parent, name, and/or payload. EIDs not
    /// yet in the family's allocated range are auto-allocated rather than
    /// rejected.
    fn alter(
        &mut self,
        branch_id: InstanceId,
        eid: Eid,
        parent_eid: Eid,
        name: &str,
        payload: Option<Payload>,
    ) -> Result<()>;

    /// Mark a checkpoint; implementations with no batching semantics may
    /// treat this as a no-op validation point.
    fn sequence_point(&mut self) -> Result<()>;

    /// Finish the edit successfully. No further calls are valid afterward.
    fn complete(&mut self) -> Result<()>;

    /// Cancel the edit. No further calls are valid afterward.
    fn abort(&mut self) -> Result<()>;

    /// Resolve `eid`'s payload as it currently stands in `branch_id` —
    /// `None` for a sub-branch-root placeholder, `Some` otherwise. Used by
    /// [`crate::commands::diff::subtree_differences`] so that two elements
    /// which are logically identical but carry the payload differently
    /// (full vs. by-reference) compare equal.
    fn payload_resolve(&mut self, branch_id: InstanceId, eid: Eid) -> Result<Option<Payload>>;
}
