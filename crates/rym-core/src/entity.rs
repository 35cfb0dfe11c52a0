use serde::{Deserialize, Serialize};

use crate::enums::EntityKind;

/// One synchronization target: a user's direct messages, a team room, or a
/// forum.
///
/// Produced fresh by discovery on every run and never persisted itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entity {
    pub kind: EntityKind,
    pub id: u64,
    pub display_name: String,
    /// Set when an operator ignore rule matches this entity.
    #[serde(default)]
    pub skip: bool,
}

impl Entity {
    #[must_use]
    pub fn new(kind: EntityKind, id: u64, display_name: impl Into<String>) -> Self {
        Self {
            kind,
            id,
            display_name: display_name.into(),
            skip: false,
        }
    }

    /// File name of this entity's persisted artifact: `<id>-<clean name>.json`.
    #[must_use]
    pub fn artifact_file_name(&self) -> String {
        format!("{}-{}.json", self.id, clean_name(&self.display_name))
    }

    /// Path of the chat resource relative to the OData service root,
    /// e.g. `workrooms(7)`.
    #[must_use]
    pub fn api_path(&self) -> String {
        format!("{}({})", self.kind.api_collection(), self.id)
    }
}

/// Replace every character that is not an ASCII letter or digit with `-`.
///
/// The result is safe to use as a file name on every platform.
#[must_use]
pub fn clean_name(value: &str) -> String {
    value
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect()
}
