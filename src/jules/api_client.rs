use super::types::*;
use crate::config::LauncherConfig;
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use thiserror::Error;

pub const API_BASE_URL: &str = "https://jules.googleapis.com/v1alpha";
pub const API_KEY_HEADER: &str = "X-Goog-Api-Key";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{status_text} - {body}")]
    Status {
        status: u16,
        status_text: String,
        body: String,
    },

    #[error("Failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The Jules endpoints the launcher views depend on.
#[async_trait]
pub trait JulesApi: Send + Sync {
    async fn list_sources(&self) -> Result<SourcesResponse, ApiError>;
    async fn list_sessions(&self) -> Result<SessionsResponse, ApiError>;
    /// Fetch a single source by resource name, e.g. `sources/42`.
    async fn get_source(&self, name: &str) -> Result<Source, ApiError>;
    async fn create_session(
        &self,
        request: &CreateSessionRequest,
    ) -> Result<serde_json::Value, ApiError>;
}

pub struct JulesApiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl JulesApiClient {
    pub fn new(config: &LauncherConfig) -> Self {
        Self::with_base_url(&config.api_base_url, &config.api_key)
    }

    pub fn with_base_url(base_url: &str, api_key: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.endpoint(path);
        tracing::debug!(%url, "GET");

        let response = self
            .client
            .get(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await?;

        parse_json(response).await
    }
}

/// Turns a response into `T`, mapping non-2xx statuses to `ApiError::Status`
/// and undecodable bodies to `ApiError::Parse`.
async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(ApiError::Status {
            status: status.as_u16(),
            status_text: status
                .canonical_reason()
                .map(str::to_string)
                .unwrap_or_else(|| status.as_str().to_string()),
            body,
        });
    }

    Ok(serde_json::from_str(&body)?)
}

#[async_trait]
impl JulesApi for JulesApiClient {
    async fn list_sources(&self) -> Result<SourcesResponse, ApiError> {
        let response: SourcesResponse = self.get_json("/sources").await?;
        if let Some(token) = &response.next_page_token {
            tracing::debug!(%token, "more sources available, not following nextPageToken");
        }
        Ok(response)
    }

    async fn list_sessions(&self) -> Result<SessionsResponse, ApiError> {
        let response: SessionsResponse = self.get_json("/sessions").await?;
        if let Some(token) = &response.next_page_token {
            tracing::debug!(%token, "more sessions available, not following nextPageToken");
        }
        Ok(response)
    }

    async fn get_source(&self, name: &str) -> Result<Source, ApiError> {
        self.get_json(name).await
    }

    async fn create_session(
        &self,
        request: &CreateSessionRequest,
    ) -> Result<serde_json::Value, ApiError> {
        let url = self.endpoint("/sessions");
        tracing::debug!(%url, source = %request.source_context.source, "POST");

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(request)
            .send()
            .await?;

        parse_json(response).await
    }
}
