//! Entity kinds.
//!
//! The three kinds of synchronization target differ only in where the chat
//! server lists them, which field carries their display name, which OData
//! collection serves their history, and which export subdirectory holds
//! their artifacts.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// EntityKind
// ---------------------------------------------------------------------------

/// Kind of conversational entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    User,
    Team,
    Forum,
}

impl EntityKind {
    /// Every kind, in discovery order.
    pub const ALL: [Self; 3] = [Self::User, Self::Team, Self::Forum];

    /// Keyword used in ignore rules and log lines.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Team => "team",
            Self::Forum => "forum",
        }
    }

    /// Name of the list in the discovery response.
    #[must_use]
    pub const fn discovery_key(self) -> &'static str {
        match self {
            Self::User => "users",
            Self::Team => "teams",
            Self::Forum => "forums",
        }
    }

    /// Field of a discovery record holding the display name.
    #[must_use]
    pub const fn name_field(self) -> &'static str {
        match self {
            Self::User => "username",
            Self::Team | Self::Forum => "descriptor",
        }
    }

    /// OData collection serving this kind's chat history.
    #[must_use]
    pub const fn api_collection(self) -> &'static str {
        match self {
            Self::User => "users",
            Self::Team => "workrooms",
            Self::Forum => "forums",
        }
    }

    /// Subdirectory of the export root holding this kind's artifacts.
    #[must_use]
    pub const fn export_subdir(self) -> &'static str {
        match self {
            Self::User => "users",
            Self::Team => "teams",
            Self::Forum => "forums",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = CoreError;

    /// Accepts the singular keyword or the plural discovery key.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" | "users" => Ok(Self::User),
            "team" | "teams" | "workroom" | "workrooms" => Ok(Self::Team),
            "forum" | "forums" => Ok(Self::Forum),
            other => Err(CoreError::UnknownKind(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// PageCursor
// ---------------------------------------------------------------------------

/// Which message of a fetched page becomes the cursor for the next request.
///
/// The server filters the next request to ids strictly greater than the
/// cursor. `FirstOfPage` is the historical behavior; `LastOfPage` skips the
/// whole page at once on servers with strict `gt` semantics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageCursor {
    #[default]
    FirstOfPage,
    LastOfPage,
}

impl PageCursor {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FirstOfPage => "first_of_page",
            Self::LastOfPage => "last_of_page",
        }
    }
}

impl fmt::Display for PageCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
