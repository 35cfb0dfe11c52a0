//! Seam between the engine and the chat server.

use async_trait::async_trait;
use rym_client::{ClientError, Page, RymClient};
use rym_core::{Entity, MessageId};

/// Operations the engine needs from the chat server.
///
/// Implementations must be shareable across concurrently running entity
/// synchronizers.
#[async_trait]
pub trait ChatRemote: Send + Sync {
    /// Establish the session used by every later call.
    async fn login(&self, username: &str, password: &str) -> Result<(), ClientError>;

    /// List every entity visible to the session.
    async fn discover(&self) -> Result<Vec<Entity>, ClientError>;

    /// Fetch the page of `entity`'s history strictly after `cursor`.
    async fn fetch_page(
        &self,
        entity: &Entity,
        cursor: Option<&MessageId>,
        page_size: u32,
    ) -> Result<Page, ClientError>;
}

#[async_trait]
impl ChatRemote for RymClient {
    async fn login(&self, username: &str, password: &str) -> Result<(), ClientError> {
        Self::login(self, username, password).await
    }

    async fn discover(&self) -> Result<Vec<Entity>, ClientError> {
        Self::discover(self).await
    }

    async fn fetch_page(
        &self,
        entity: &Entity,
        cursor: Option<&MessageId>,
        page_size: u32,
    ) -> Result<Page, ClientError> {
        Self::fetch_page(self, entity, cursor, page_size).await
    }
}
