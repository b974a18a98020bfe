//! Tracing decorator: logs every dispatched operation, then forwards to
//! the wrapped handler unchanged.

use crate::artifacts::branch::InstanceId;
use crate::artifacts::element::Payload;
use crate::commands::handler::EditorHandler;
use crate::error::{Eid, Result};

/// Wraps any [`EditorHandler`], emitting a `tracing` event for each call
/// before forwarding it.
pub struct TraceWrapper<H> {
    inner: H,
}

impl<H: EditorHandler> TraceWrapper<H> {
    pub fn new(inner: H) -> Self {
        TraceWrapper { inner }
    }

    pub fn into_inner(self) -> H {
        self.inner
    }
}

impl<H: EditorHandler> EditorHandler for TraceWrapper<H> {
    fn new_eid(&mut self) -> Result<Eid> {
        let result = self.inner.new_eid();
        tracing::info!(?result, "new_eid");
        result
    }

    fn add(
        &mut self,
        branch_id: InstanceId,
        eid: Eid,
        parent_eid: Eid,
        name: &str,
        payload: Option<Payload>,
    ) -> Result<()> {
        tracing::info!(branch_id, eid, parent_eid, name, "add");
        self.inner.add(branch_id, eid, parent_eid, name, payload)
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
        tracing::info!(
            from_branch_id,
            from_eid,
            from_rev,
            to_branch_id,
            eid,
            parent_eid,
            name,
            "copy_one"
        );
        self.inner
            .copy_one(from_branch_id, from_eid, from_rev, to_branch_id, eid, parent_eid, name, payload)
    }

    fn copy_tree(
        &mut self,
        from_branch_id: InstanceId,
        from_eid: Eid,
        to_branch_id: InstanceId,
        parent_eid: Eid,
        name: &str,
    ) -> Result<Eid> {
        tracing::info!(from_branch_id, from_eid, to_branch_id, parent_eid, name, "copy_tree");
        self.inner
            .copy_tree(from_branch_id, from_eid, to_branch_id, parent_eid, name)
    }

    fn delete(&mut self, branch_id: InstanceId, eid: Eid) -> Result<()> {
        tracing::info!(branch_id, eid, "delete");
        self.inner.delete(branch_id, eid)
    }

    fn alter(
        &mut self,
        branch_id: InstanceId,
        eid: Eid,
        parent_eid: Eid,
        name: &str,
        payload: Option<Payload>,
    ) -> Result<()> {
        tracing::info!(branch_id, eid, parent_eid, name, "alter");
        self.inner.alter(branch_id, eid, parent_eid, name, payload)
    }

    fn sequence_point(&mut self) -> Result<()> {
        tracing::info!("sequence_point");
        self.inner.sequence_point()
    }

    fn complete(&mut self) -> Result<()> {
        tracing::info!("complete");
        self.inner.complete()
    }

    fn abort(&mut self) -> Result<()> {
        tracing::info!("abort");
        self.inner.abort()
    }

    fn payload_resolve(&mut self, branch_id: InstanceId, eid: Eid) -> Result<Option<Payload>> {
        let result = self.inner.payload_resolve(branch_id, eid);
        tracing::info!(branch_id, eid, ?result, "payload_resolve");
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::family::Family;
    use crate::artifacts::revision_root::RevisionRoot;
    use crate::commands::editor::Editor;

    #[test]
    fn forwards_calls_to_inner_editor() {
        let mut family = Family::new(0, 0);
        let root_eid = family.allocate_eid();
        let sibling = family.allocate_branch_sibling(root_eid);
        let mut root = RevisionRoot::new(0, sibling);
        let top = root.root_branch();
        root.get_mut(top)
            .unwrap()
            .e_map_mut()
            .update(root_eid, -1, "", None, root_eid, &family)
            .unwrap();

        let editor = Editor::new(root, family);
        let mut traced = TraceWrapper::new(editor);
        let eid = traced.new_eid().unwrap();
        traced.add(top, eid, root_eid, "f.txt", None).unwrap();
        traced.complete().unwrap();

        let editor = traced.into_inner();
        assert!(editor.root().get(top).unwrap().e_map().contains(eid));
    }
}
