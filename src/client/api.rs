//! HTTP client for the directory API.

use crate::error::ErrorBody;
use crate::extractors::USER_ID_HEADER;
use crate::models::{Tool, VoteOutcome};
use crate::pagination::Page;
use crate::response::{CategoryBody, EntriesBody};
use crate::view::EntriesView;
use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("invalid base url: {0}")]
    InvalidBaseUrl(String),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("status {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("could not decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Clone, Debug)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: Url,
    user: Option<Uuid>,
}

impl ApiClient {
    /// Client for the server at `base_url`, e.g. `http://127.0.0.1:3000`.
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| ClientError::InvalidBaseUrl(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl(base_url.to_string()));
        }

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static(concat!("tooldb/", env!("CARGO_PKG_VERSION"))),
        );
        let client = reqwest::Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            base_url,
            user: None,
        })
    }

    /// Act as the given logged-in user (or anonymously with `None`).
    pub fn with_user(mut self, user: Option<Uuid>) -> Self {
        self.user = user;
        self
    }

    pub fn user(&self) -> Option<Uuid> {
        self.user
    }

    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .push("api")
            .extend(segments);
        Ok(url)
    }

    async fn send<T: DeserializeOwned>(&self, method: Method, url: Url, query: &[(&str, String)]) -> Result<T> {
        let mut request = self.client.request(method, url).query(query);
        if let Some(user) = self.user {
            request = request.header(USER_ID_HEADER, user.to_string());
        }

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&bytes)
                .map(|b| b.error.message)
                .unwrap_or_else(|_| String::from_utf8_lossy(&bytes).into_owned());
            return Err(ClientError::Status { status, message });
        }

        Ok(serde_json::from_slice(&bytes)?)
    }

    /// `GET /api/querySearch/{term}?page=N`.
    pub async fn search(&self, term: &str, page: Page) -> Result<Vec<Tool>> {
        let url = self.url(&["querySearch", term])?;
        self.send(Method::GET, url, &[("page", page.number().to_string())]).await
    }

    /// `GET /api/getEntries?get=VIEW&page=N`.
    pub async fn entries(&self, view: EntriesView, page: Page) -> Result<EntriesBody> {
        let url = self.url(&["getEntries"])?;
        self.send(
            Method::GET,
            url,
            &[("get", view.as_str().to_string()), ("page", page.number().to_string())],
        )
        .await
    }

    /// `GET /api/category/{id}`.
    pub async fn category(&self, id: i64) -> Result<CategoryBody> {
        let url = self.url(&["category", &id.to_string()])?;
        self.send(Method::GET, url, &[]).await
    }

    pub async fn vote(&self, tool_id: i64) -> Result<VoteOutcome> {
        let url = self.url(&["tools", &tool_id.to_string(), "vote"])?;
        self.send(Method::POST, url, &[]).await
    }

    pub async fn unvote(&self, tool_id: i64) -> Result<VoteOutcome> {
        let url = self.url(&["tools", &tool_id.to_string(), "vote"])?;
        self.send(Method::DELETE, url, &[]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_encoded_urls() {
        let client = ApiClient::new("http://localhost:3000/").unwrap();
        let url = client.url(&["querySearch", "c++ tools/ide"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/api/querySearch/c++%20tools%2Fide");
    }

    #[test]
    fn keeps_base_path_prefix() {
        let client = ApiClient::new("http://localhost:3000/directory").unwrap();
        let url = client.url(&["category", "4"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/directory/api/category/4");
    }

    #[test]
    fn rejects_bad_base_url() {
        assert!(matches!(ApiClient::new("not a url"), Err(ClientError::InvalidBaseUrl(_))));
        assert!(matches!(ApiClient::new("mailto:me@example.com"), Err(ClientError::InvalidBaseUrl(_))));
    }
}
