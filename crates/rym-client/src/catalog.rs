//! Entity discovery.

use std::collections::BTreeMap;

use rym_core::{Entity, EntityKind};
use serde::Deserialize;
use serde_json::Value;

use crate::{
    RymClient,
    error::ClientError,
    http::{check_response, classify_send_error, decode_json},
};

#[derive(Deserialize)]
struct InfoResponse {
    d: BTreeMap<String, Value>,
}

#[derive(Deserialize)]
struct DirectoryRecord {
    id: u64,
    #[serde(flatten)]
    fields: BTreeMap<String, Value>,
}

impl DirectoryRecord {
    fn into_entity(self, kind: EntityKind) -> Entity {
        let name = self
            .fields
            .get(kind.name_field())
            .and_then(Value::as_str)
            .unwrap_or_default();
        Entity::new(kind, self.id, name)
    }
}

/// Entities of every kind in `info`, users first, then teams, then forums.
///
/// A kind whose list is absent or null contributes nothing.
fn entities_from_info(mut info: BTreeMap<String, Value>) -> Result<Vec<Entity>, ClientError> {
    let mut entities = Vec::new();
    for kind in EntityKind::ALL {
        let Some(list) = info.remove(kind.discovery_key()) else {
            continue;
        };
        let records: Option<Vec<DirectoryRecord>> =
            serde_json::from_value(list).map_err(|source| ClientError::Decode {
                what: "discovery response",
                source,
            })?;
        entities.extend(
            records
                .unwrap_or_default()
                .into_iter()
                .map(|record| record.into_entity(kind)),
        );
    }
    Ok(entities)
}

impl RymClient {
    /// Fetch every user, team, and forum the logged-in account can see.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails, the server returns a
    /// non-success status, or the response cannot be decoded.
    pub async fn discover(&self) -> Result<Vec<Entity>, ClientError> {
        let url = format!("{}/Ryver.Info()?$format=json", self.odata_root());
        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(classify_send_error)?;
        let resp = check_response(resp).await?;
        let info: InfoResponse = decode_json(resp, "discovery response").await?;
        entities_from_info(info.d)
    }
}
