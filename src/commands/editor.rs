//! The base editor façade: a validated operation log over one in-progress
//! revision, with auto-EID-allocation on `alter`, cooperative cancellation,
//! and running per-operation statistics.

use crate::areas::{branching, delete, purge};
use crate::artifacts::branch::InstanceId;
use crate::artifacts::element::Payload;
use crate::artifacts::family::Family;
use crate::artifacts::revision_root::RevisionRoot;
use crate::commands::handler::EditorHandler;
use crate::error::{Eid, Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Active,
    Completed,
    Aborted,
}

/// Running counts of how many times each operation kind has been
/// dispatched through an [`Editor`]. Available regardless of whether
/// tracing is enabled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EditorStats {
    pub new_eid: u64,
    pub add: u64,
    pub copy_one: u64,
    pub copy_tree: u64,
    pub delete: u64,
    pub alter: u64,
    pub sequence_point: u64,
}

/// Validated operation log over one [`RevisionRoot`]/[`Family`] pair.
///
/// Once [`EditorHandler::complete`] or [`EditorHandler::abort`] has run,
/// every further call fails: a `debug_assert!` trips in debug builds
/// (cfg!(debug_assertions)), and release builds return
/// [`Error::Consistency`].
pub struct Editor {
    root: RevisionRoot,
    family: Family,
    state: State,
    stats: EditorStats,
    in_call: bool,
    cancel: Option<Box<dyn FnMut() -> bool>>,
}

impl Editor {
    /// Build an editor over an existing revision root and its family (e.g.
    /// one produced by [`crate::areas::repository::Repository::begin_next_revision`]).
    pub fn new(root: RevisionRoot, family: Family) -> Self {
        Editor {
            root,
            family,
            state: State::Active,
            stats: EditorStats::default(),
            in_call: false,
            cancel: None,
        }
    }

    /// Install a cooperative cancellation hook, checked before every
    /// dispatched operation. Returning `true` aborts the in-flight call
    /// with [`Error::Cancelled`] before it touches any state.
    pub fn set_cancel_hook(&mut self, hook: impl FnMut() -> bool + 'static) {
        self.cancel = Some(Box::new(hook));
    }

    pub fn stats(&self) -> EditorStats {
        self.stats
    }

    pub fn root(&self) -> &RevisionRoot {
        &self.root
    }

    pub fn family(&self) -> &Family {
        &self.family
    }

    /// Consume the editor after a successful `complete`, handing back its
    /// revision root and family.
    pub fn into_parts(self) -> (RevisionRoot, Family) {
        (self.root, self.family)
    }

    fn check_active(&self) -> Result<()> {
        if self.state != State::Active {
            debug_assert!(
                self.state == State::Active,
                "editor operation dispatched after completion/abort"
            );
            return Err(Error::Consistency {
                message: "editor already completed or aborted".to_string(),
            });
        }
        Ok(())
    }

    fn check_not_reentrant(&self) -> Result<()> {
        debug_assert!(!self.in_call, "editor operation dispatched reentrantly");
        if self.in_call {
            return Err(Error::Consistency {
                message: "editor operation dispatched reentrantly".to_string(),
            });
        }
        Ok(())
    }

    fn check_cancelled(&mut self) -> Result<()> {
        if let Some(hook) = self.cancel.as_mut() {
            if hook() {
                return Err(Error::Cancelled);
            }
        }
        Ok(())
    }

    /// Common entry preamble for every validated operation.
    fn enter(&mut self) -> Result<()> {
        self.check_active()?;
        self.check_not_reentrant()?;
        self.check_cancelled()?;
        self.in_call = true;
        Ok(())
    }

    fn leave(&mut self) {
        self.in_call = false;
    }
}

impl EditorHandler for Editor {
    #[tracing::instrument(level = "debug", skip(self))]
    fn new_eid(&mut self) -> Result<Eid> {
        self.enter()?;
        let eid = self.family.allocate_eid();
        self.stats.new_eid += 1;
        self.leave();
        Ok(eid)
    }

    #[tracing::instrument(level = "debug", skip(self, payload))]
    fn add(
        &mut self,
        branch_id: InstanceId,
        eid: Eid,
        parent_eid: Eid,
        name: &str,
        payload: Option<Payload>,
    ) -> Result<()> {
        self.enter()?;
        let result = (|| {
            let root_eid = self
                .root
                .get(branch_id)
                .ok_or_else(|| Error::Branching {
                    message: format!("no such branch instance {branch_id}"),
                })?
                .root_eid();
            self.family.ensure_eid_allocated(eid);
            self.root
                .get_mut(branch_id)
                .expect("checked above")
                .e_map_mut()
                .update(eid, parent_eid, name, payload, root_eid, &self.family)
        })();
        if result.is_ok() {
            self.stats.add += 1;
        }
        self.leave();
        result
    }

    #[tracing::instrument(level = "debug", skip(self, payload))]
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
        self.enter()?;
        let result = (|| {
            if from_rev != self.root.rev() {
                return Err(Error::Branching {
                    message: format!(
                        "copy_one can only address this editor's own revision {}; got {from_rev}",
                        self.root.rev()
                    ),
                });
            }
            let source = self
                .root
                .get(from_branch_id)
                .ok_or_else(|| Error::Branching {
                    message: format!("no such branch instance {from_branch_id}"),
                })?
                .e_map()
                .get(from_eid)
                .cloned()
                .ok_or_else(|| Error::Branching {
                    message: format!("element {from_eid} does not exist in branch {from_branch_id}"),
                })?;
            let to_root_eid = self
                .root
                .get(to_branch_id)
                .ok_or_else(|| Error::Branching {
                    message: format!("no such branch instance {to_branch_id}"),
                })?
                .root_eid();
            self.family.ensure_eid_allocated(eid);
            let to_branch = self
                .root
                .get_mut(to_branch_id)
                .expect("checked above")
                .e_map_mut();
            match payload.or_else(|| source.payload().cloned()) {
                Some(payload) => to_branch.update(eid, parent_eid, name, Some(payload), to_root_eid, &self.family)?,
                None => to_branch.update_as_subbranch_root(eid, parent_eid, name, to_root_eid, &self.family)?,
            }
            Ok(eid)
        })();
        if result.is_ok() {
            self.stats.copy_one += 1;
        }
        self.leave();
        result
    }

    #[tracing::instrument(level = "debug", skip(self))]
    fn copy_tree(
        &mut self,
        from_branch_id: InstanceId,
        from_eid: Eid,
        to_branch_id: InstanceId,
        parent_eid: Eid,
        name: &str,
    ) -> Result<Eid> {
        self.enter()?;
        let outcome = branching::copy_subtree_r(
            &mut self.root,
            &mut self.family,
            from_branch_id,
            from_eid,
            to_branch_id,
            parent_eid,
            name,
        );
        if outcome.is_ok() {
            self.stats.copy_tree += 1;
        }
        self.leave();
        outcome
    }

    #[tracing::instrument(level = "debug", skip(self))]
    fn delete(&mut self, branch_id: InstanceId, eid: Eid) -> Result<()> {
        self.enter()?;
        let result = (|| {
            let root_eid = self
                .root
                .get(branch_id)
                .ok_or_else(|| Error::Branching {
                    message: format!("no such branch instance {branch_id}"),
                })?
                .root_eid();
            if eid == root_eid {
                return Err(Error::Branching {
                    message: format!("cannot delete branch {branch_id}'s own root element {eid}"),
                });
            }
            self.root
                .get_mut(branch_id)
                .expect("checked above")
                .e_map_mut()
                .set(eid, None, root_eid, &self.family)?;
            purge::purge_orphans(
                self.root.get_mut(branch_id).expect("checked above").e_map_mut(),
                root_eid,
            );

            let subs: Vec<InstanceId> = self
                .root
                .immediate_subbranches(branch_id)
                .filter(|(_, inst)| inst.outer_eid() == eid)
                .map(|(id, _)| id)
                .collect();
            for sub in subs {
                delete::delete_branch_instance_r(&mut self.root, sub);
            }
            Ok(())
        })();
        if result.is_ok() {
            self.stats.delete += 1;
        }
        self.leave();
        result
    }

    #[tracing::instrument(level = "debug", skip(self, payload))]
    fn alter(
        &mut self,
        branch_id: InstanceId,
        eid: Eid,
        parent_eid: Eid,
        name: &str,
        payload: Option<Payload>,
    ) -> Result<()> {
        self.enter()?;
        let result = (|| {
            let root_eid = self
                .root
                .get(branch_id)
                .ok_or_else(|| Error::Branching {
                    message: format!("no such branch instance {branch_id}"),
                })?
                .root_eid();
            self.family.ensure_eid_allocated(eid);
            if parent_eid != -1 {
                self.family.ensure_eid_allocated(parent_eid);
            }
            self.root
                .get_mut(branch_id)
                .expect("checked above")
                .e_map_mut()
                .update(eid, parent_eid, name, payload, root_eid, &self.family)
        })();
        if result.is_ok() {
            self.stats.alter += 1;
        }
        self.leave();
        result
    }

    fn sequence_point(&mut self) -> Result<()> {
        self.enter()?;
        self.stats.sequence_point += 1;
        self.leave();
        Ok(())
    }

    fn complete(&mut self) -> Result<()> {
        self.check_active()?;
        self.check_not_reentrant()?;
        self.state = State::Completed;
        Ok(())
    }

    fn abort(&mut self) -> Result<()> {
        self.check_active()?;
        self.check_not_reentrant()?;
        self.state = State::Aborted;
        Ok(())
    }

    #[tracing::instrument(level = "debug", skip(self))]
    fn payload_resolve(&mut self, branch_id: InstanceId, eid: Eid) -> Result<Option<Payload>> {
        self.enter()?;
        let result = self
            .root
            .get(branch_id)
            .ok_or_else(|| Error::Branching {
                message: format!("no such branch instance {branch_id}"),
            })
            .and_then(|branch| {
                branch.e_map().get(eid).cloned().ok_or_else(|| Error::Branching {
                    message: format!("element {eid} does not exist in branch {branch_id}"),
                })
            })
            .map(|content| content.payload().cloned());
        self.leave();
        result
    }
}
