//! Per-entity checkpoint artifacts.
//!
//! The artifact is the full ordered list of messages fetched so far for one
//! entity, stored as a single pretty-printed JSON array with sorted keys. The
//! cursor is never stored: it is the id of the last message in the list.

use std::fs;
use std::path::{Path, PathBuf};

use rym_core::{Entity, Message, MessageId};
use serde_json::{Map, Value};

use crate::error::SyncError;

/// Loaded state of one entity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Checkpoint {
    pub messages: Vec<Message>,
    /// Id of the last stored message; `None` for a fresh entity.
    pub cursor: Option<MessageId>,
}

/// Filesystem layout of the mirror: `<root>/<kind subdir>/<id>-<name>.json`.
#[derive(Debug, Clone)]
pub struct CheckpointStore {
    root: PathBuf,
}

impl CheckpointStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Artifact path of `entity`.
    #[must_use]
    pub fn path_for(&self, entity: &Entity) -> PathBuf {
        self.root
            .join(entity.kind.export_subdir())
            .join(entity.artifact_file_name())
    }

    /// Read the entity's artifact.
    ///
    /// Never fails: a missing, unreadable, or unparsable artifact yields an
    /// empty checkpoint and the entity is mirrored from the beginning.
    #[must_use]
    pub fn load(&self, entity: &Entity) -> Checkpoint {
        let path = self.path_for(entity);
        let messages = match read_messages(&path) {
            Ok(messages) => messages,
            Err(error) => {
                tracing::debug!(path = %path.display(), %error, "no usable checkpoint");
                return Checkpoint::default();
            }
        };

        let cursor = messages.last().map(|last| {
            tracing::info!(
                "restarting {} {} from {} (id={})",
                entity.kind,
                entity.display_name,
                last.when,
                last.id
            );
            last.id.clone()
        });
        Checkpoint { messages, cursor }
    }

    /// Rewrite the entity's artifact with `messages`.
    ///
    /// The document goes to a sibling `.tmp` file first and is then renamed
    /// over the artifact, so a reader only ever sees a complete document.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Persist`] if the directory, the temporary file,
    /// or the rename fails.
    pub fn persist(&self, entity: &Entity, messages: &[Message]) -> Result<PathBuf, SyncError> {
        let path = self.path_for(entity);
        let persist_err = |source| SyncError::Persist {
            path: path.clone(),
            source,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(persist_err)?;
        }

        let document = render(messages).map_err(|e| persist_err(std::io::Error::other(e)))?;
        let temp_path = temp_path_for(&path);
        fs::write(&temp_path, document).map_err(persist_err)?;
        fs::rename(&temp_path, &path).map_err(persist_err)?;

        tracing::debug!(path = %path.display(), messages = messages.len(), "checkpoint written");
        Ok(path)
    }
}

fn read_messages(path: &Path) -> Result<Vec<Message>, Box<dyn std::error::Error>> {
    let bytes = fs::read(path)?;
    Ok(serde_json::from_slice(&bytes)?)
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Pretty-print with a two-space indent and keys sorted at every level.
fn render(messages: &[Message]) -> Result<Vec<u8>, serde_json::Error> {
    let value = sort_keys(serde_json::to_value(messages)?);
    serde_json::to_vec_pretty(&value)
}

fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, sort_keys(v)))
                    .collect::<Map<String, Value>>(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}
