//! Client for the remote posts/users JSON API.

use postsearch_common::model::{post::Post, user::User};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

pub use reqwest::StatusCode;

pub const DEFAULT_API_BASE_URL: &str = "https://jsonplaceholder.typicode.com";

pub type Result<T, E = FetchError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Response status: {0}")]
    Status(StatusCode),
    #[error("Response body was not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Clone, Debug)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_owned();

        Ok(Self { http, base_url })
    }

    pub async fn fetch_posts(&self) -> Result<Vec<Post>> {
        self.fetch_collection("posts").await
    }

    pub async fn fetch_users(&self) -> Result<Vec<User>> {
        self.fetch_collection("users").await
    }

    async fn fetch_collection<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        let url = format!("{}/{path}", self.base_url);
        debug!(%url, "Fetching collection");

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = response.bytes().await?;
        let items: Vec<T> = serde_json::from_slice(&body)?;
        debug!(%url, count = items.len(), "Fetched collection");

        Ok(items)
    }
}
