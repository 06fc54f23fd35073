use async_trait::async_trait;
use reqwest::{header::HeaderValue, Client, RequestBuilder, Response};
use shared::{
    domain::{EntryId, KinematicEntry},
    error::RemoteError,
    protocol::{KinematicChanges, NewKinematicEntry},
};
use tracing::debug;
use url::Url;

use crate::{
    config::{non_blank, ClientSettings},
    error::{SettingsError, TableError},
};

#[async_trait]
pub trait RemoteTable: Send + Sync {
    /// Every row of the group, ordered by id ascending.
    async fn select_by_group(&self, group_id: &str) -> Result<Vec<KinematicEntry>, TableError>;
    async fn insert(&self, entry: &NewKinematicEntry) -> Result<(), TableError>;
    async fn update(&self, id: EntryId, changes: &KinematicChanges) -> Result<(), TableError>;
    async fn delete(&self, id: EntryId) -> Result<(), TableError>;
}

pub struct MissingRemoteTable;

#[async_trait]
impl RemoteTable for MissingRemoteTable {
    async fn select_by_group(&self, _group_id: &str) -> Result<Vec<KinematicEntry>, TableError> {
        Err(unavailable())
    }

    async fn insert(&self, _entry: &NewKinematicEntry) -> Result<(), TableError> {
        Err(unavailable())
    }

    async fn update(&self, _id: EntryId, _changes: &KinematicChanges) -> Result<(), TableError> {
        Err(unavailable())
    }

    async fn delete(&self, _id: EntryId) -> Result<(), TableError> {
        Err(unavailable())
    }
}

fn unavailable() -> TableError {
    TableError::Transport("remote table is not configured".into())
}

/// [`RemoteTable`] over a PostgREST endpoint such as Supabase's `/rest/v1`.
pub struct PostgrestTable {
    http: Client,
    endpoint: Url,
    anon_key: String,
    bearer: String,
}

impl PostgrestTable {
    pub fn new(http: Client, endpoint: Url, anon_key: impl Into<String>) -> Self {
        let anon_key = anon_key.into();
        Self {
            http,
            endpoint,
            bearer: anon_key.clone(),
            anon_key,
        }
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.bearer = token.into();
        self
    }

    pub fn from_settings(settings: &ClientSettings) -> Result<Self, SettingsError> {
        let endpoint = settings.table_endpoint()?;
        let anon_key = non_blank(&settings.anon_key).ok_or(SettingsError::MissingAnonKey)?;
        let http = Client::builder()
            .timeout(settings.request_timeout())
            .build()?;

        let table = Self::new(http, endpoint, anon_key);
        Ok(match non_blank(&settings.access_token) {
            Some(token) => table.with_access_token(token),
            None => table,
        })
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.anon_key)
            .header(
                reqwest::header::AUTHORIZATION,
                format!("Bearer {}", self.bearer),
            )
    }

    fn minimal_return(builder: RequestBuilder) -> RequestBuilder {
        builder.header("Prefer", HeaderValue::from_static("return=minimal"))
    }
}

#[async_trait]
impl RemoteTable for PostgrestTable {
    async fn select_by_group(&self, group_id: &str) -> Result<Vec<KinematicEntry>, TableError> {
        let response = self
            .authorized(self.http.get(self.endpoint.clone()))
            .query(&[
                ("select", "*".to_string()),
                ("group_id", format!("eq.{group_id}")),
                ("order", "id.asc".to_string()),
            ])
            .send()
            .await?;

        let rows: Vec<KinematicEntry> = check_status(response).await?.json().await?;
        debug!(group_id, rows = rows.len(), "postgrest: selected group");
        Ok(rows)
    }

    async fn insert(&self, entry: &NewKinematicEntry) -> Result<(), TableError> {
        let response = Self::minimal_return(self.authorized(self.http.post(self.endpoint.clone())))
            .json(&[entry])
            .send()
            .await?;
        check_status(response).await?;
        debug!(group_id = %entry.group_id, servo_id = entry.servo_id, "postgrest: inserted row");
        Ok(())
    }

    async fn update(&self, id: EntryId, changes: &KinematicChanges) -> Result<(), TableError> {
        let response =
            Self::minimal_return(self.authorized(self.http.patch(self.endpoint.clone())))
                .query(&[("id", format!("eq.{id}"))])
                .json(changes)
                .send()
                .await?;
        check_status(response).await?;
        debug!(entry_id = id.0, "postgrest: updated row");
        Ok(())
    }

    async fn delete(&self, id: EntryId) -> Result<(), TableError> {
        let response = self
            .authorized(self.http.delete(self.endpoint.clone()))
            .query(&[("id", format!("eq.{id}"))])
            .send()
            .await?;
        check_status(response).await?;
        debug!(entry_id = id.0, "postgrest: deleted row");
        Ok(())
    }
}

/// Turns a non-2xx response into [`TableError::Remote`], keeping the
/// server's message when the body is a PostgREST error object.
async fn check_status(response: Response) -> Result<Response, TableError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let err = serde_json::from_str::<RemoteError>(&body)
        .unwrap_or_else(|_| RemoteError::new(status.to_string()).with_code(status.as_str()));
    Err(TableError::Remote(err))
}

#[cfg(test)]
#[path = "tests/table_tests.rs"]
mod tests;
