//! Shared HTTP plumbing for the interview backend
//!
//! Builds authorized requests and maps HTTP failures onto `DomainError`.

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use mockcall::DomainError;

use crate::config::BackendConfig;

/// reqwest client bound to one backend
pub struct BackendHttp {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl BackendHttp {
    pub fn new(config: &BackendConfig) -> Result<Self, DomainError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("mockcall/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DomainError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn get(&self, path: &str) -> RequestBuilder {
        self.authorize(self.client.get(self.url(path)))
    }

    pub fn post(&self, path: &str) -> RequestBuilder {
        self.authorize(self.client.post(self.url(path)))
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    /// Send and require a 2xx; `entity`/`id` name the resource for 404s
    pub async fn send(
        &self,
        request: RequestBuilder,
        entity: &str,
        id: &str,
    ) -> Result<Response, DomainError> {
        let response = request
            .send()
            .await
            .map_err(|e| DomainError::Network(format!("Failed to reach backend: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(status_error(status, &body, entity, id))
    }

    /// Send and parse a JSON body
    pub async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        entity: &str,
        id: &str,
    ) -> Result<T, DomainError> {
        self.send(request, entity, id)
            .await?
            .json::<T>()
            .await
            .map_err(|e| DomainError::Network(format!("Failed to parse {} response: {}", entity, e)))
    }
}

/// Path segment, percent-encoded
pub(crate) fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

fn status_error(status: StatusCode, body: &str, entity: &str, id: &str) -> DomainError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            DomainError::Auth(format!("backend rejected credentials ({})", status))
        }
        StatusCode::NOT_FOUND => DomainError::not_found(entity, id),
        _ => DomainError::Network(format!("API error ({}): {}", status, body.trim())),
    }
}
