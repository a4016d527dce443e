use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use utoipa::ToSchema;

use super::expansion::{ExpansionState, VisibleRow};
use super::model::{
    id_for_name, parent_options, position_rows, ParentOption, PositionDraft, PositionPayload,
    PositionRow,
};
use super::tree::{build_tree, count_nodes, remove_subtree, TreeNode};
use crate::cache::{ListCache, ResourceTag};
use crate::error::AdminError;
use crate::forms::{FormKind, FormSessions};
use crate::listing::{ListQuery, ListView, Page};
use crate::notice::{DeleteOutcome, MutationOutcome, Notice};
use crate::validation::validate_position;

#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct TreeSnapshot {
    pub rows: Vec<VisibleRow>,
    pub forest: Vec<TreeNode>,
    pub total: usize,
}

#[derive(Default)]
struct TreeView {
    forest: Vec<TreeNode>,
    expansion: ExpansionState,
    loaded: bool,
    /// Sequence number of the last change applied to `forest`.
    applied: u64,
}

impl TreeView {
    fn snapshot(&self) -> TreeSnapshot {
        TreeSnapshot {
            rows: self.expansion.visible_rows(&self.forest),
            forest: self.forest.clone(),
            total: count_nodes(&self.forest),
        }
    }
}

/// Keeps the position tree, the position list and the remote store in step.
///
/// Create and update refetch and rebuild the whole tree. Delete removes the
/// node and its descendants locally as soon as the store confirms, and the
/// next rebuild reconciles with whatever the store then returns.
pub struct PositionCoordinator {
    cache: ListCache,
    forms: Arc<FormSessions>,
    view: RwLock<TreeView>,
    list: Mutex<ListView>,
    sequence: AtomicU64,
}

impl PositionCoordinator {
    pub fn new(cache: ListCache, forms: Arc<FormSessions>) -> Self {
        Self {
            cache,
            forms,
            view: RwLock::new(TreeView::default()),
            list: Mutex::new(ListView::default()),
            sequence: AtomicU64::new(0),
        }
    }

    fn next_sequence(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Current tree, fetching it on first use.
    pub async fn tree(&self) -> Result<TreeSnapshot, AdminError> {
        {
            let view = self.view.read();
            if view.loaded {
                return Ok(view.snapshot());
            }
        }
        self.refresh().await
    }

    /// Rebuilds the tree from a fresh fetch. An older fetch that resolves
    /// after a newer change has been applied is discarded.
    pub async fn refresh(&self) -> Result<TreeSnapshot, AdminError> {
        let seq = self.next_sequence();
        let positions = self.cache.refresh_positions().await?;
        let forest = build_tree(&positions);

        let mut view = self.view.write();
        if seq > view.applied {
            view.forest = forest;
            view.loaded = true;
            view.applied = seq;
        } else {
            log::debug!("Dropping stale tree rebuild #{}", seq);
        }
        Ok(view.snapshot())
    }

    /// Flips a node open or closed. Returns the new state and the tree.
    pub fn toggle(&self, key: &str) -> (bool, TreeSnapshot) {
        let mut view = self.view.write();
        let expanded = view.expansion.toggle(key);
        (expanded, view.snapshot())
    }

    pub async fn list(&self, query: &ListQuery) -> Result<Page<PositionRow>, AdminError> {
        let rows = position_rows(&self.cache.positions().await?);
        let mut list = self.list.lock();
        query.apply(&mut list);
        Ok(list.render(&rows))
    }

    pub async fn parent_options(&self) -> Result<Vec<ParentOption>, AdminError> {
        Ok(parent_options(&self.cache.positions().await?))
    }

    /// Creates (`target == None`) or updates a position.
    pub async fn save(
        &self,
        draft: &PositionDraft,
        target: Option<&str>,
    ) -> Result<MutationOutcome, AdminError> {
        let known = self.cache.positions().await?;
        if let Some(id) = target {
            if !known.iter().any(|p| p.id == id) {
                return Err(AdminError::NotFound(format!("Position {}", id)));
            }
        }
        validate_position(draft, &known, target)?;

        let parent_name = draft
            .parent_position
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty());
        let payload = PositionPayload {
            position: draft.position.trim().to_string(),
            parent_position: parent_name.unwrap_or_default().to_string(),
            parent_position_id: parent_name
                .and_then(|name| id_for_name(&known, name))
                .unwrap_or_default()
                .to_string(),
        };

        if let Some(ticket) = draft.ticket {
            self.forms.begin_submit(ticket, FormKind::Position, target)?;
        }
        let store = self.cache.store();
        let result = match target {
            Some(id) => store.update_position(id, &payload).await.map(|_| id.to_string()),
            None => store.create_position(&payload).await,
        };
        let dialog_open = match draft.ticket {
            Some(ticket) => self.forms.settle(ticket, result.is_ok()),
            None => false,
        };
        let verb = if target.is_some() { "updated" } else { "registered" };

        let id = result.map_err(|e| {
            log::error!("Position {} failed for {:?}: {}", verb, payload.position, e);
            AdminError::from(e)
        })?;
        log::info!("Position {} {} ({})", payload.position, verb, id);

        self.cache.invalidate(ResourceTag::Positions).await;
        if let Err(e) = self.refresh().await {
            log::warn!("Tree rebuild after save failed, will retry on next read: {}", e);
            self.view.write().loaded = false;
        }

        Ok(MutationOutcome {
            notice: Notice::success(format!("Position {} successfully", verb)),
            record_id: id,
            dialog_open,
        })
    }

    /// Deletes a position once the operator confirmed it. On success the node
    /// and all of its descendants leave the local tree immediately.
    pub async fn delete(&self, id: &str, confirmed: bool) -> Result<DeleteOutcome, AdminError> {
        let known = self.cache.positions().await?;
        let name = known
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| id.to_string());

        if !confirmed {
            return Err(AdminError::ConfirmationRequired(format!(
                "the position \"{}\"",
                name
            )));
        }

        if let Err(e) = self.cache.store().delete_position(id).await {
            log::error!("Deleting position {} failed: {}", id, e);
            return Err(e.into());
        }

        let seq = self.next_sequence();
        let removed = {
            let mut view = self.view.write();
            view.applied = view.applied.max(seq);
            remove_subtree(&mut view.forest, id)
        };
        self.cache.invalidate(ResourceTag::Positions).await;
        log::info!(
            "Position {} ({}) deleted, {} node(s) removed from the tree",
            name,
            id,
            removed
        );

        Ok(DeleteOutcome {
            notice: Notice::success(format!("Position \"{}\" has been deleted.", name)),
            removed,
        })
    }
}
