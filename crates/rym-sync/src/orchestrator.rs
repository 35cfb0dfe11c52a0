//! Run-level coordination.
//!
//! One run logs in once, discovers entities once, then synchronizes every
//! entity not matched by an ignore rule on its own task. Admission is bounded
//! by a semaphore; a failing or panicking entity never affects its siblings.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use rym_core::{Entity, IgnoreRules};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::Instrument;

use crate::checkpoint::CheckpointStore;
use crate::error::SyncError;
use crate::remote::ChatRemote;
use crate::report::{EntityOutcome, EntityReport, SyncReport};
use crate::synchronizer::EntitySynchronizer;

#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Copy)]
pub struct SyncOptions {
    pub page_size: u32,
    /// `0` means unbounded.
    pub max_concurrent: usize,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            page_size: 1000,
            max_concurrent: 8,
        }
    }
}

/// Receives progress while a run is underway.
pub trait SyncObserver {
    /// Called once, after filtering, with the number of entities to synchronize.
    fn planned(&mut self, _entities: usize) {}

    /// Called as each synchronized entity finishes, in completion order.
    fn finished(&mut self, _report: &EntityReport) {}
}

impl SyncObserver for () {}

pub struct Orchestrator<R> {
    remote: Arc<R>,
    store: CheckpointStore,
    ignore: IgnoreRules,
    options: SyncOptions,
}

impl<R: ChatRemote + 'static> Orchestrator<R> {
    pub fn new(
        remote: Arc<R>,
        store: CheckpointStore,
        ignore: IgnoreRules,
        options: SyncOptions,
    ) -> Self {
        Self {
            remote,
            store,
            ignore,
            options,
        }
    }

    /// Log in and list every entity, with ignore rules applied to `skip`.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Login`] or [`SyncError::Discovery`].
    pub async fn catalog(&self, credentials: &Credentials) -> Result<Vec<Entity>, SyncError> {
        self.remote
            .login(&credentials.username, &credentials.password)
            .await
            .map_err(SyncError::Login)?;

        let catalog = self.remote.discover().await.map_err(SyncError::Discovery)?;
        tracing::info!(
            entities = catalog.len(),
            ignore_rules = self.ignore.count(),
            "discovered entities"
        );

        Ok(catalog
            .into_iter()
            .map(|mut entity| {
                entity.skip = self.ignore.matches(&entity);
                entity
            })
            .collect())
    }

    /// Synchronize every entity.
    ///
    /// # Errors
    ///
    /// Only run-scoped failures ([`SyncError::Login`],
    /// [`SyncError::Discovery`]) are returned; entity failures are recorded
    /// in the report.
    pub async fn run(&self, credentials: &Credentials) -> Result<SyncReport, SyncError> {
        self.run_with(credentials, &mut ()).await
    }

    /// [`run`](Self::run), reporting progress to `observer`.
    ///
    /// # Errors
    ///
    /// See [`run`](Self::run).
    pub async fn run_with(
        &self,
        credentials: &Credentials,
        observer: &mut dyn SyncObserver,
    ) -> Result<SyncReport, SyncError> {
        let span = tracing::info_span!("sync_run", root = %self.store.root().display());
        self.run_inner(credentials, observer).instrument(span).await
    }

    async fn run_inner(
        &self,
        credentials: &Credentials,
        observer: &mut dyn SyncObserver,
    ) -> Result<SyncReport, SyncError> {
        let started_at = Utc::now();
        let entities = self.catalog(credentials).await?;

        let mut outcomes: Vec<Option<EntityOutcome>> = entities
            .iter()
            .map(|entity| {
                entity.skip.then(|| {
                    tracing::warn!(
                        "skipping {} '{}' ID={}, as requested",
                        entity.kind,
                        entity.display_name,
                        entity.id
                    );
                    EntityOutcome::Skipped
                })
            })
            .collect();
        observer.planned(outcomes.iter().filter(|o| o.is_none()).count());

        let permits = match self.options.max_concurrent {
            0 => Semaphore::MAX_PERMITS,
            n => n,
        };
        let semaphore = Arc::new(Semaphore::new(permits));
        let mut set = JoinSet::new();
        let mut task_index = HashMap::new();

        for (idx, entity) in entities.iter().enumerate() {
            if entity.skip {
                continue;
            }
            let remote = Arc::clone(&self.remote);
            let store = self.store.clone();
            let sem = Arc::clone(&semaphore);
            let entity = entity.clone();
            let page_size = self.options.page_size;
            let span = tracing::info_span!(
                "entity",
                kind = %entity.kind,
                id = entity.id,
                name = %entity.display_name
            );

            let handle = set.spawn(
                async move {
                    let Ok(_permit) = sem.acquire_owned().await else {
                        return Err(SyncError::Cancelled(entity.display_name.clone()));
                    };
                    let mut synchronizer =
                        EntitySynchronizer::new(remote.as_ref(), &store, &entity, page_size);
                    synchronizer.run().await
                }
                .instrument(span),
            );
            task_index.insert(handle.id(), idx);
        }

        while let Some(joined) = set.join_next_with_id().await {
            let (id, result) = match joined {
                Ok((id, result)) => (id, result.map_err(|e| e.to_string())),
                Err(join_error) => (join_error.id(), Err(join_error.to_string())),
            };
            let Some(&idx) = task_index.get(&id) else {
                continue;
            };

            let outcome = match result {
                Ok(stats) => EntityOutcome::Synced(stats),
                Err(error) => {
                    let entity = &entities[idx];
                    tracing::error!(
                        kind = %entity.kind,
                        id = entity.id,
                        name = %entity.display_name,
                        %error,
                        "synchronization failed"
                    );
                    EntityOutcome::Failed { error }
                }
            };
            observer.finished(&EntityReport {
                entity: entities[idx].clone(),
                outcome: outcome.clone(),
            });
            outcomes[idx] = Some(outcome);
        }

        let report = SyncReport {
            started_at,
            finished_at: Utc::now(),
            entities: entities
                .into_iter()
                .zip(outcomes)
                .map(|(entity, outcome)| EntityReport {
                    outcome: outcome.unwrap_or(EntityOutcome::Failed {
                        error: "task did not report".into(),
                    }),
                    entity,
                })
                .collect(),
        };

        tracing::info!(
            synced = report.synced(),
            failed = report.failed(),
            skipped = report.skipped(),
            appended = report.appended(),
            "sync finished"
        );
        Ok(report)
    }
}
