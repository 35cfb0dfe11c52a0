//! # rym-sync
//!
//! The synchronization engine:
//! - [`CheckpointStore`]: one JSON artifact per entity, rewritten atomically
//!   after every page
//! - [`EntitySynchronizer`]: drives one entity from its checkpoint to caught
//!   up
//! - [`Orchestrator`]: logs in once, discovers entities, and runs one
//!   synchronizer per entity concurrently under a semaphore bound
//!
//! The remote side is reached through [`ChatRemote`], implemented for
//! [`rym_client::RymClient`].

pub mod checkpoint;
pub mod orchestrator;
pub mod remote;
pub mod report;
pub mod synchronizer;

mod error;

pub use checkpoint::{Checkpoint, CheckpointStore};
pub use error::SyncError;
pub use orchestrator::{Credentials, Orchestrator, SyncObserver, SyncOptions};
pub use remote::ChatRemote;
pub use report::{EntityOutcome, EntityReport, SyncReport};
pub use synchronizer::{EntityStats, EntitySynchronizer, SyncState};
