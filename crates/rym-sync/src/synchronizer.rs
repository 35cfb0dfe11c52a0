//! Per-entity synchronization state machine.
//!
//! ```text
//! Init -> Fetching -> (Merging -> Fetching)* -> Done
//!            |           |
//!            +-----------+--> Failed
//! ```
//!
//! Every merged page is persisted before the next request, so an interrupted
//! run loses at most the page in flight.

use std::collections::HashSet;
use std::fmt;

use rym_core::{Entity, Message, MessageId};
use serde::Serialize;

use crate::checkpoint::CheckpointStore;
use crate::error::SyncError;
use crate::remote::ChatRemote;

// ---------------------------------------------------------------------------
// SyncState
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncState {
    Init,
    Fetching,
    Merging,
    Done,
    Failed,
}

impl SyncState {
    /// Whether moving from `self` to `next` is a legal step.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Init, Self::Fetching)
                | (Self::Fetching, Self::Merging | Self::Done | Self::Failed)
                | (Self::Merging, Self::Fetching | Self::Done | Self::Failed)
        )
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Fetching => "fetching",
            Self::Merging => "merging",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for SyncState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// EntityStats
// ---------------------------------------------------------------------------

/// Outcome of one successful entity synchronization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EntityStats {
    /// Pages merged and persisted.
    pub pages: usize,
    /// Messages added by this run.
    pub appended: usize,
    /// Messages in the artifact after this run.
    pub total: usize,
    /// Cursor the run started from; `None` for a fresh entity.
    pub resumed_from: Option<MessageId>,
}

// ---------------------------------------------------------------------------
// EntitySynchronizer
// ---------------------------------------------------------------------------

/// Drives one entity from its checkpoint to caught up.
pub struct EntitySynchronizer<'a, R: ?Sized> {
    remote: &'a R,
    store: &'a CheckpointStore,
    entity: &'a Entity,
    page_size: u32,
    state: SyncState,
}

impl<'a, R: ChatRemote + ?Sized> EntitySynchronizer<'a, R> {
    pub const fn new(
        remote: &'a R,
        store: &'a CheckpointStore,
        entity: &'a Entity,
        page_size: u32,
    ) -> Self {
        Self {
            remote,
            store,
            entity,
            page_size,
            state: SyncState::Init,
        }
    }

    #[must_use]
    pub const fn state(&self) -> SyncState {
        self.state
    }

    /// Run until caught up.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Fetch`] when a page cannot be fetched and
    /// [`SyncError::Persist`] when the checkpoint cannot be written. Pages
    /// merged before the failure stay on disk.
    pub async fn run(&mut self) -> Result<EntityStats, SyncError> {
        let checkpoint = self.store.load(self.entity);
        let mut messages = checkpoint.messages;
        let mut seen: HashSet<MessageId> = messages.iter().map(|m| m.id.clone()).collect();
        let mut cursor = checkpoint.cursor;
        let mut stats = EntityStats {
            resumed_from: cursor.clone(),
            ..EntityStats::default()
        };

        self.advance(SyncState::Fetching);
        loop {
            let page = match self
                .remote
                .fetch_page(self.entity, cursor.as_ref(), self.page_size)
                .await
            {
                Ok(page) => page,
                Err(source) => {
                    self.advance(SyncState::Failed);
                    return Err(SyncError::Fetch {
                        entity: self.label(),
                        source,
                    });
                }
            };

            if page.is_caught_up() {
                self.advance(SyncState::Done);
                break;
            }

            self.advance(SyncState::Merging);
            let added = merge(&mut messages, &mut seen, page.messages);
            if added == 0 {
                tracing::debug!(cursor = ?page.next_cursor, "page holds no new messages");
                self.advance(SyncState::Done);
                break;
            }

            if let Err(error) = self.store.persist(self.entity, &messages) {
                self.advance(SyncState::Failed);
                return Err(error);
            }
            stats.pages += 1;
            stats.appended += added;
            tracing::debug!(
                added,
                total = messages.len(),
                remaining = page.total_count,
                "page merged"
            );

            cursor = page.next_cursor;
            self.advance(SyncState::Fetching);
        }

        stats.total = messages.len();
        tracing::info!(
            "finished with {}: {}",
            self.entity.kind,
            self.entity.display_name
        );
        Ok(stats)
    }

    fn advance(&mut self, next: SyncState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal transition {} -> {next}",
            self.state
        );
        tracing::trace!(from = %self.state, to = %next, "state change");
        self.state = next;
    }

    fn label(&self) -> String {
        format!(
            "{} '{}' (id={})",
            self.entity.kind, self.entity.display_name, self.entity.id
        )
    }
}

/// Append the messages of `page` not already stored, in delivery order.
fn merge(messages: &mut Vec<Message>, seen: &mut HashSet<MessageId>, page: Vec<Message>) -> usize {
    let before = messages.len();
    messages.extend(page.into_iter().filter(|m| seen.insert(m.id.clone())));
    messages.len() - before
}
