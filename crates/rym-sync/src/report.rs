//! Per-run outcome summary.

use chrono::{DateTime, Utc};
use rym_core::Entity;
use serde::Serialize;

use crate::synchronizer::EntityStats;

/// What happened to one entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EntityOutcome {
    Synced(EntityStats),
    Failed { error: String },
    Skipped,
}

impl EntityOutcome {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Synced(_) => "synced",
            Self::Failed { .. } => "failed",
            Self::Skipped => "skipped",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityReport {
    pub entity: Entity,
    pub outcome: EntityOutcome,
}

/// Every entity's outcome for one run, in discovery order.
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub entities: Vec<EntityReport>,
}

impl SyncReport {
    #[must_use]
    pub fn synced(&self) -> usize {
        self.count(|o| matches!(o, EntityOutcome::Synced(_)))
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, EntityOutcome::Failed { .. }))
    }

    #[must_use]
    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, EntityOutcome::Skipped))
    }

    /// Messages appended across all entities.
    #[must_use]
    pub fn appended(&self) -> usize {
        self.entities
            .iter()
            .map(|r| match &r.outcome {
                EntityOutcome::Synced(stats) => stats.appended,
                _ => 0,
            })
            .sum()
    }

    /// Whether every entity that was not skipped synchronized.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed() == 0
    }

    /// Outcome recorded for the entity of `kind` and `id`.
    #[must_use]
    pub fn outcome_of(&self, kind: rym_core::EntityKind, id: u64) -> Option<&EntityOutcome> {
        self.entities
            .iter()
            .find(|r| r.entity.kind == kind && r.entity.id == id)
            .map(|r| &r.outcome)
    }

    fn count(&self, pred: impl Fn(&EntityOutcome) -> bool) -> usize {
        self.entities.iter().filter(|r| pred(&r.outcome)).count()
    }
}
