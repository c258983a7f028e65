//! Wake-word model sources
//!
//! A model source hands out the raw files of a model, addressed as
//! `<location>/<model>/<file>`. Two sources exist:
//! - [`DirectorySource`] - a local copy of the ESP-SR `wakenet_model` share
//! - [`HttpSource`] - the same tree served over HTTP(S)
//!
//! Fetches are never retried. A failed fetch is a [`FetchError`] that callers
//! are expected to log and skip.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Timeout for a single HTTP fetch
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Error fetching a model file
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status {0}")]
    Status(u16),
}

/// Somewhere model files can be fetched from
pub trait ModelSource {
    /// Fetch `file` of `model`
    fn fetch(
        &self,
        model: &str,
        file: &str,
    ) -> impl Future<Output = Result<Vec<u8>, FetchError>> + Send;
}

/// Model files on the local filesystem
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ModelSource for DirectorySource {
    async fn fetch(&self, model: &str, file: &str) -> Result<Vec<u8>, FetchError> {
        let path = self.root.join(model).join(file);
        tokio::fs::read(&path)
            .await
            .map_err(|source| FetchError::Io { path, source })
    }
}

/// Model files served over HTTP(S)
#[derive(Debug, Clone)]
pub struct HttpSource {
    base_url: String,
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(base_url: impl Into<String>) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder().timeout(FETCH_TIMEOUT).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of `file` of `model`
    pub fn file_url(&self, model: &str, file: &str) -> String {
        format!("{}/{}/{}", self.base_url, model, file)
    }
}

impl ModelSource for HttpSource {
    async fn fetch(&self, model: &str, file: &str) -> Result<Vec<u8>, FetchError> {
        let response = self.client.get(self.file_url(model, file)).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        Ok(response.bytes().await?.to_vec())
    }
}

/// A directory or HTTP source picked from a location string
#[derive(Debug, Clone)]
pub enum ShareSource {
    Directory(DirectorySource),
    Http(HttpSource),
}

impl ShareSource {
    /// `http://` and `https://` locations are fetched over HTTP, anything
    /// else is a directory path.
    pub fn from_location(location: &str) -> Result<Self, FetchError> {
        if location.starts_with("http://") || location.starts_with("https://") {
            Ok(ShareSource::Http(HttpSource::new(location)?))
        } else {
            Ok(ShareSource::Directory(DirectorySource::new(location)))
        }
    }
}

impl ModelSource for ShareSource {
    async fn fetch(&self, model: &str, file: &str) -> Result<Vec<u8>, FetchError> {
        match self {
            ShareSource::Directory(source) => source.fetch(model, file).await,
            ShareSource::Http(source) => source.fetch(model, file).await,
        }
    }
}
