use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::errors::StatusError;
use crate::models::ObjectMetadata;
use super::gateway::ObjectStoreGateway;

/// Google Cloud Storage JSON API client for a single bucket.
pub struct GcsGateway {
    client: Client,
    base_url: Url,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListingPage {
    #[serde(default)]
    prefixes: Vec<String>,
    next_page_token: Option<String>,
}

impl GcsGateway {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, StatusError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| StatusError::Config(format!("Invalid bucket URL {}: {}", base_url, e)))?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StatusError::Internal(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client, base_url })
    }

    fn listing_url(&self) -> Result<Url, StatusError> {
        self.base_url
            .join("o")
            .map_err(|e| StatusError::Internal(format!("Bad listing URL: {}", e)))
    }

    /// `{base}o/{path}` with the whole object path encoded as one segment.
    fn object_url(&self, path: &str) -> Result<Url, StatusError> {
        let mut url = self
            .base_url
            .join("o/")
            .map_err(|e| StatusError::Internal(format!("Bad object URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| StatusError::Internal(format!("{} cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .push(path);
        Ok(url)
    }

    async fn get_object(&self, path: &str, alt: &str) -> Result<Response, StatusError> {
        let url = self.object_url(path)?;
        debug!(%url, "Fetching object");

        let resp = self
            .client
            .get(url)
            .query(&[("alt", alt)])
            .send()
            .await
            .map_err(|e| StatusError::from_reqwest(path, e))?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Err(StatusError::not_found(path));
        }
        resp.error_for_status()
            .map_err(|e| StatusError::from_reqwest(path, e))
    }
}

#[async_trait]
impl ObjectStoreGateway for GcsGateway {
    async fn list_directories(&self) -> Result<Vec<String>, StatusError> {
        let url = self.listing_url()?;
        let mut page_token: Option<String> = None;
        let mut dirs = Vec::new();

        loop {
            let mut req = self
                .client
                .get(url.clone())
                .query(&[("projection", "noAcl"), ("delimiter", "/")]);
            if let Some(token) = &page_token {
                req = req.query(&[("pageToken", token.as_str())]);
            }

            let resp = req
                .send()
                .await
                .and_then(Response::error_for_status)
                .map_err(|e| StatusError::from_reqwest("directory listing", e))?;
            let page: ListingPage = resp
                .json()
                .await
                .map_err(|e| StatusError::from_reqwest("directory listing", e))?;

            debug!(count = page.prefixes.len(), "Listing page received");
            dirs.extend(page.prefixes);

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => return Ok(dirs),
            }
        }
    }

    async fn get_object_text(&self, path: &str) -> Result<String, StatusError> {
        self.get_object(path, "media")
            .await?
            .text()
            .await
            .map_err(|e| StatusError::from_reqwest(path, e))
    }

    async fn get_object_file(&self, path: &str, destination: &Path) -> Result<(), StatusError> {
        let mut resp = self.get_object(path, "media").await?;
        let mut file = tokio::fs::File::create(destination).await?;

        while let Some(chunk) = resp
            .chunk()
            .await
            .map_err(|e| StatusError::from_reqwest(path, e))?
        {
            file.write_all(&chunk).await?;
        }
        file.flush().await?;
        Ok(())
    }

    async fn get_object_metadata(&self, path: &str) -> Result<ObjectMetadata, StatusError> {
        let body = self
            .get_object(path, "json")
            .await?
            .text()
            .await
            .map_err(|e| StatusError::from_reqwest(path, e))?;
        serde_json::from_str(&body).map_err(|e| StatusError::parse(path, e))
    }

    fn base_url(&self) -> &str {
        self.base_url.as_str()
    }
}
