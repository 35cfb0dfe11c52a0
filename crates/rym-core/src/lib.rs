//! # rym-core
//!
//! Core types shared across all rym crates:
//! - Entity kinds and their per-kind API/export constants
//! - Synchronization targets ([`Entity`]) and artifact naming
//! - Message records as delivered by the chat history API
//! - Operator ignore rules
//! - Cross-cutting error types

pub mod entity;
pub mod enums;
pub mod errors;
pub mod ignore;
pub mod message;

pub use entity::{Entity, clean_name};
pub use enums::{EntityKind, PageCursor};
pub use errors::CoreError;
pub use ignore::{IgnoreRule, IgnoreRules};
pub use message::{Message, MessageId};
