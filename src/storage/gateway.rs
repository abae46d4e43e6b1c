use async_trait::async_trait;
use std::path::Path;

use crate::errors::StatusError;
use crate::models::ObjectMetadata;

/// Read-only access to the bucket a pipeline publishes its runs into.
///
/// Every method reports a missing object as [`StatusError::NotFound`] so
/// callers can tell an absent artifact apart from a transport failure.
#[async_trait]
pub trait ObjectStoreGateway: Send + Sync {
    /// All top-level directory prefixes, across every listing page.
    async fn list_directories(&self) -> Result<Vec<String>, StatusError>;

    async fn get_object_text(&self, path: &str) -> Result<String, StatusError>;

    /// Download an object into `destination`, creating or truncating it.
    async fn get_object_file(&self, path: &str, destination: &Path) -> Result<(), StatusError>;

    async fn get_object_metadata(&self, path: &str) -> Result<ObjectMetadata, StatusError>;

    /// Base URL, for logging
    fn base_url(&self) -> &str;
}
