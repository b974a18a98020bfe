//! Change-detection decorator: records which EIDs were touched by the
//! wrapped handler's operations, without altering their outcome.

use std::collections::BTreeSet;

use crate::artifacts::branch::InstanceId;
use crate::artifacts::element::Payload;
use crate::commands::handler::EditorHandler;
use crate::error::{Eid, Result};

/// Wraps any [`EditorHandler`], recording the set of EIDs that `add`,
/// `copy_one`, `copy_tree`, `delete`, and `alter` touched. `new_eid` and
/// `sequence_point` are forwarded but do not, by themselves, touch an
/// element.
pub struct ChangeDetectionWrapper<H> {
    inner: H,
    touched: BTreeSet<Eid>,
}

impl<H: EditorHandler> ChangeDetectionWrapper<H> {
    pub fn new(inner: H) -> Self {
        ChangeDetectionWrapper {
            inner,
            touched: BTreeSet::new(),
        }
    }

    /// EIDs touched so far, in ascending order.
    pub fn touched(&self) -> &BTreeSet<Eid> {
        &self.touched
    }

    pub fn into_inner(self) -> H {
        self.inner
    }
}

impl<H: EditorHandler> EditorHandler for ChangeDetectionWrapper<H> {
    fn new_eid(&mut self) -> Result<Eid> {
        self.inner.new_eid()
    }

    fn add(
        &mut self,
        branch_id: InstanceId,
        eid: Eid,
        parent_eid: Eid,
        name: &str,
        payload: Option<Payload>,
    ) -> Result<()> {
        let result = self.inner.add(branch_id, eid, parent_eid, name, payload);
        if result.is_ok() {
            self.touched.insert(eid);
        }
        result
    }

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
    ) -> Result<Eid> {
        let result = self
            .inner
            .copy_one(from_branch_id, from_eid, from_rev, to_branch_id, eid, parent_eid, name, payload);
        if let Ok(eid) = result {
            self.touched.insert(eid);
        }
        result
    }

    fn copy_tree(
        &mut self,
        from_branch_id: InstanceId,
        from_eid: Eid,
        to_branch_id: InstanceId,
        parent_eid: Eid,
        name: &str,
    ) -> Result<Eid> {
        let result = self
            .inner
            .copy_tree(from_branch_id, from_eid, to_branch_id, parent_eid, name);
        if let Ok(eid) = result {
            self.touched.insert(eid);
        }
        result
    }

    fn delete(&mut self, branch_id: InstanceId, eid: Eid) -> Result<()> {
        let result = self.inner.delete(branch_id, eid);
        if result.is_ok() {
            self.touched.insert(eid);
        }
        result
    }

    fn alter(
        &mut self,
        branch_id: InstanceId,
        eid: Eid,
        parent_eid: Eid,
        name: &str,
        payload: Option<Payload>,
    ) -> Result<()> {
        let result = self.inner.alter(branch_id, eid, parent_eid, name, payload);
        if result.is_ok() {
            self.touched.insert(eid);
        }
        result
    }

    fn sequence_point(&mut self) -> Result<()> {
        self.inner.sequence_point()
    }

    fn complete(&mut self) -> Result<()> {
        self.inner.complete()
    }

    fn abort(&mut self) -> Result<()> {
        self.inner.abort()
    }

    fn payload_resolve(&mut self, branch_id: InstanceId, eid: Eid) -> Result<Option<Payload>> {
        self.inner.payload_resolve(branch_id, eid)
    }
}
