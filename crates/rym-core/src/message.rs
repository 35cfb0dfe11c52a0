//! Message records as delivered by the chat history API.
//!
//! Only the fields the mirror reasons about are typed. Everything else the
//! server sends is kept in `extra` so a persisted artifact holds the full
//! record, not a projection of it.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// API-assigned message identifier.
///
/// Monotonically increasing within one conversation. The server may send it
/// as a JSON string or a number; it is written back in the form it arrived.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageId {
    Int(i64),
    Text(String),
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(id) => write!(f, "{id}"),
            Self::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for MessageId {
    fn from(id: i64) -> Self {
        Self::Int(id)
    }
}

impl From<&str> for MessageId {
    fn from(id: &str) -> Self {
        Self::Text(id.to_string())
    }
}

/// One unit of conversation history.
///
/// `from` and `body` stay in `extra` exactly as they arrived (absent, null,
/// or populated) and are read through [`Message::sender_name`] and
/// [`Message::body_text`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    /// ISO-8601-like timestamp; the API sorts ascending by it.
    pub when: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Message {
    /// Build a message with a sender descriptor and a body.
    #[must_use]
    pub fn new(
        id: impl Into<MessageId>,
        when: impl Into<String>,
        from: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        let mut extra = BTreeMap::new();
        extra.insert(
            "from".to_string(),
            serde_json::json!({ "__descriptor": from.into() }),
        );
        extra.insert("body".to_string(), Value::String(body.into()));
        Self {
            id: id.into(),
            when: when.into(),
            extra,
        }
    }

    /// Timestamp truncated to second precision (`YYYY-MM-DDTHH:MM:SS`).
    #[must_use]
    pub fn when_to_seconds(&self) -> &str {
        match self.when.char_indices().nth(19) {
            Some((idx, _)) => &self.when[..idx],
            None => &self.when,
        }
    }

    /// Sender display name, empty when the server omitted it.
    #[must_use]
    pub fn sender_name(&self) -> &str {
        self.extra
            .get("from")
            .and_then(|from| from.get("__descriptor"))
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn body_text(&self) -> &str {
        self.extra
            .get("body")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }
}
