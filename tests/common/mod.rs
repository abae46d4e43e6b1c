use async_trait::async_trait;
use crlite_status::errors::StatusError;
use crlite_status::models::ObjectMetadata;
use crlite_status::storage::ObjectStoreGateway;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

/// In-memory bucket that records every object fetch.
#[derive(Default)]
pub struct FakeGateway {
    pub listing: Vec<String>,
    objects: HashMap<String, String>,
    sizes: HashMap<String, u64>,
    failures: HashMap<String, u16>,
    fetches: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dirs(mut self, dirs: &[&str]) -> Self {
        self.listing = dirs.iter().map(|d| d.to_string()).collect();
        self
    }

    pub fn with_object(mut self, path: &str, content: &str) -> Self {
        self.objects.insert(path.to_string(), content.to_string());
        self
    }

    pub fn with_size(mut self, path: &str, size: u64) -> Self {
        self.sizes.insert(path.to_string(), size);
        self
    }

    pub fn with_failure(mut self, path: &str, status: u16) -> Self {
        self.failures.insert(path.to_string(), status);
        self
    }

    /// A run with stats carrying sizes, a timestamp, and nothing else.
    pub fn with_run(self, run_id: &str, timestamp: &str) -> Self {
        self.with_object(
            &format!("{}/mlbf/stats.json", run_id),
            r#"{"mlbf_layers": 3, "mlbf_filesize": 2048, "stash_filesize": 512, "stash_num_issuers": 4, "knownrevoked": 1000, "knownnotrevoked": 2000}"#,
        )
        .with_object(&format!("{}/timestamp", run_id), timestamp)
    }

    pub fn fetch_count(&self, path: &str) -> usize {
        self.fetches.lock().unwrap().iter().filter(|p| *p == path).count()
    }

    fn fetch(&self, path: &str) -> Result<String, StatusError> {
        self.fetches.lock().unwrap().push(path.to_string());
        if let Some(status) = self.failures.get(path) {
            return Err(StatusError::Http { path: path.to_string(), status: *status });
        }
        self.objects
            .get(path)
            .cloned()
            .ok_or_else(|| StatusError::not_found(path))
    }
}

#[async_trait]
impl ObjectStoreGateway for FakeGateway {
    async fn list_directories(&self) -> Result<Vec<String>, StatusError> {
        Ok(self.listing.clone())
    }

    async fn get_object_text(&self, path: &str) -> Result<String, StatusError> {
        self.fetch(path)
    }

    async fn get_object_file(&self, path: &str, destination: &Path) -> Result<(), StatusError> {
        let content = self.fetch(path)?;
        tokio::fs::write(destination, content).await?;
        Ok(())
    }

    async fn get_object_metadata(&self, path: &str) -> Result<ObjectMetadata, StatusError> {
        self.fetches.lock().unwrap().push(path.to_string());
        if let Some(status) = self.failures.get(path) {
            return Err(StatusError::Http { path: path.to_string(), status: *status });
        }
        match self.sizes.get(path) {
            Some(size) => Ok(ObjectMetadata { size: *size, name: Some(path.to_string()), updated: None }),
            None => Err(StatusError::not_found(path)),
        }
    }

    fn base_url(&self) -> &str {
        "memory://bucket/"
    }
}
