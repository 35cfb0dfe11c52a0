//! Chat history pages.
//!
//! A page request always asks for ascending `when` order, an inline total
//! count, and at most `page_size` records. With a cursor it also filters to
//! ids strictly greater than the cursor.

use rym_core::{Entity, Message, MessageId, PageCursor};
use serde::{Deserialize, Deserializer, de};

use crate::{
    RymClient,
    error::ClientError,
    http::{check_response, classify_send_error, decode_slice},
    retry::with_retry,
};

#[derive(Deserialize)]
struct HistoryResponse {
    d: HistoryData,
}

#[derive(Deserialize)]
struct HistoryData {
    #[serde(rename = "__count", default, deserialize_with = "count_hint")]
    count: i64,
    #[serde(default)]
    results: Vec<Message>,
}

/// `__count` arrives as a number from some servers and as a numeric string
/// from others.
fn count_hint<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(i64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(count) => Ok(count),
        Raw::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("__count '{text}' is not an integer"))),
    }
}

/// One batch of messages, oldest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub messages: Vec<Message>,
    /// Cursor for the following request; `None` once the entity is caught up.
    pub next_cursor: Option<MessageId>,
    /// Server's total-count hint for the filtered query.
    pub total_count: i64,
}

impl Page {
    /// The "fully caught up" sentinel.
    #[must_use]
    pub fn caught_up() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn is_caught_up(&self) -> bool {
        self.next_cursor.is_none()
    }

    /// Build a page from server records.
    ///
    /// A total count of zero or less, or an empty result list, is the
    /// caught-up sentinel. Otherwise the next cursor is taken from the
    /// message `mode` selects.
    #[must_use]
    pub fn from_messages(messages: Vec<Message>, total_count: i64, mode: PageCursor) -> Self {
        if total_count <= 0 {
            return Self::caught_up();
        }

        let pick = match mode {
            PageCursor::FirstOfPage => messages.first(),
            PageCursor::LastOfPage => messages.last(),
        };
        let Some(next_cursor) = pick.map(|m| m.id.clone()) else {
            return Self {
                total_count,
                ..Self::caught_up()
            };
        };

        Self {
            messages,
            next_cursor: Some(next_cursor),
            total_count,
        }
    }

    fn from_data(data: HistoryData, mode: PageCursor) -> Self {
        Self::from_messages(data.results, data.count, mode)
    }
}

impl RymClient {
    /// URL of the history page following `cursor` for `entity`.
    #[must_use]
    pub fn history_url(
        &self,
        entity: &Entity,
        cursor: Option<&MessageId>,
        page_size: u32,
    ) -> String {
        let mut url = format!(
            "{}/{}/Chat.History()?$format=json&$top={page_size}&$orderby={}&$inlinecount=allpages",
            self.odata_root(),
            entity.api_path(),
            urlencoding::encode("when asc"),
        );
        if let Some(cursor) = cursor {
            let filter = format!("id gt '{cursor}'");
            url.push_str("&$filter=");
            url.push_str(&urlencoding::encode(&filter));
        }
        url
    }

    /// Fetch the next page of `entity`'s history strictly after `cursor`.
    ///
    /// Transport failures, including a body cut off mid-read, are retried
    /// per the client's [`RetryPolicy`](crate::RetryPolicy); an HTTP error
    /// status is returned at once.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::RetriesExhausted`] when every attempt failed to
    /// reach the server, [`ClientError::Api`] for an error status, and
    /// [`ClientError::Decode`] for an unexpected body.
    pub async fn fetch_page(
        &self,
        entity: &Entity,
        cursor: Option<&MessageId>,
        page_size: u32,
    ) -> Result<Page, ClientError> {
        let url = self.history_url(entity, cursor, page_size);
        tracing::debug!(%url, "requesting history page");

        let body = with_retry(self.retry, "history page", || async {
            let resp = self
                .http
                .get(&url)
                .send()
                .await
                .map_err(classify_send_error)?;
            check_response(resp)
                .await?
                .bytes()
                .await
                .map_err(classify_send_error)
        })
        .await?;

        let history: HistoryResponse = decode_slice(&body, "history page")?;
        Ok(Page::from_data(history.d, self.page_cursor))
    }
}
