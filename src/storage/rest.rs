//! Supabase / PostgREST sink implementation
//!
//! Upserts go to `POST {project}/rest/v1/{table}?on_conflict=url` with
//! `Prefer: resolution=merge-duplicates`, which makes PostgREST update the
//! row that already has the same `url` instead of failing on the unique
//! constraint.

use crate::storage::traits::{ArticleSink, SinkError, SinkResult};
use crate::storage::ArticleRecord;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use std::time::Duration;

/// Column the store deduplicates on
pub const CONFLICT_COLUMN: &str = "url";

/// Remote table store reached over the PostgREST API
pub struct RestSink {
    client: Client,
    endpoint: String,
    key: String,
}

impl RestSink {
    /// Creates a sink for `table` in the project at `project_url`
    ///
    /// # Arguments
    ///
    /// * `project_url` - Project base URL, e.g. `https://xyz.supabase.co`
    /// * `key` - Service key, sent as both `apikey` and bearer token
    /// * `table` - Target table name
    pub fn new(project_url: &str, key: &str, table: &str) -> SinkResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| SinkError::Connection(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: format!("{}/rest/v1/{}", project_url.trim_end_matches('/'), table),
            key: key.to_string(),
        })
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.key)
            .bearer_auth(&self.key)
    }

    async fn check_status(response: Response) -> SinkResult<()> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let detail = response.text().await.unwrap_or_default();
        Err(SinkError::Rejected {
            status: status.as_u16(),
            detail,
        })
    }
}

#[async_trait(?Send)]
impl ArticleSink for RestSink {
    async fn verify(&self) -> SinkResult<()> {
        let response = self
            .authorized(self.client.get(&self.endpoint))
            .query(&[("select", CONFLICT_COLUMN), ("limit", "1")])
            .send()
            .await
            .map_err(|e| SinkError::Connection(e.to_string()))?;

        Self::check_status(response).await
    }

    async fn upsert(&mut self, record: &ArticleRecord) -> SinkResult<()> {
        let body = serde_json::to_vec(&[record])?;

        let response = self
            .authorized(self.client.post(&self.endpoint))
            .query(&[("on_conflict", CONFLICT_COLUMN)])
            .header("Content-Type", "application/json")
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .body(body)
            .send()
            .await
            .map_err(|e| SinkError::Connection(e.to_string()))?;

        Self::check_status(response).await
    }

    fn describe(&self) -> String {
        self.endpoint.clone()
    }
}
