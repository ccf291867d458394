//! Data sources for the project catalog: a single read-only fetch of the
//! JSON document, from disk or over HTTP.

use std::{
    path::PathBuf,
    time::Duration,
};

use async_trait::async_trait;
use shared::{
    error::{DecodeError, LoadFailure},
    protocol::{decode_catalog, LoadedCatalog},
};
use thiserror::Error;
use tracing::{debug, error, info, warn};
use url::Url;

pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server answered with status {status}")]
    Status { status: u16 },
    #[error("unsupported source location '{0}'")]
    InvalidLocation(String),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

#[async_trait]
pub trait ProjectSource: Send + Sync {
    /// Human-readable location, used in logs and failure messages.
    fn location(&self) -> &str;
    async fn fetch(&self) -> Result<Vec<u8>, SourceError>;
}

pub struct FileSource {
    path: PathBuf,
    display: String,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let display = path.display().to_string();
        Self { path, display }
    }
}

#[async_trait]
impl ProjectSource for FileSource {
    fn location(&self) -> &str {
        &self.display
    }

    async fn fetch(&self) -> Result<Vec<u8>, SourceError> {
        tokio::fs::read(&self.path)
            .await
            .map_err(|source| SourceError::Io {
                path: self.path.clone(),
                source,
            })
    }
}

pub struct HttpSource {
    client: reqwest::Client,
    url: Url,
}

impl HttpSource {
    pub fn new(url: Url, timeout: Duration) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, url })
    }
}

#[async_trait]
impl ProjectSource for HttpSource {
    fn location(&self) -> &str {
        self.url.as_str()
    }

    async fn fetch(&self) -> Result<Vec<u8>, SourceError> {
        let response = self.client.get(self.url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
            });
        }
        let body = response.bytes().await?;
        debug!(url = %self.url, bytes = body.len(), "fetched catalog document");
        Ok(body.to_vec())
    }
}

/// In-memory document, for embedding or tests.
pub struct MemorySource {
    label: String,
    document: Vec<u8>,
}

impl MemorySource {
    pub fn new(label: impl Into<String>, document: impl Into<Vec<u8>>) -> Self {
        Self {
            label: label.into(),
            document: document.into(),
        }
    }
}

#[async_trait]
impl ProjectSource for MemorySource {
    fn location(&self) -> &str {
        &self.label
    }

    async fn fetch(&self) -> Result<Vec<u8>, SourceError> {
        Ok(self.document.clone())
    }
}

/// Picks a source for a configured location: `http(s)://` URLs go over the
/// network, `file://` URLs and plain paths are read from disk.
pub fn source_for_location(
    location: &str,
    http_timeout: Duration,
) -> Result<Box<dyn ProjectSource>, SourceError> {
    let location = location.trim();
    if location.is_empty() {
        return Err(SourceError::InvalidLocation(location.to_string()));
    }

    if !location.contains("://") {
        return Ok(Box::new(FileSource::new(location)));
    }

    let url =
        Url::parse(location).map_err(|_| SourceError::InvalidLocation(location.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(Box::new(HttpSource::new(url, http_timeout)?)),
        "file" => {
            let path = url
                .to_file_path()
                .map_err(|_| SourceError::InvalidLocation(location.to_string()))?;
            Ok(Box::new(FileSource::new(path)))
        }
        _ => Err(SourceError::InvalidLocation(location.to_string())),
    }
}

/// Performs the one load of a session. Any failure is logged here and
/// folded into a [`LoadFailure`]; callers do not retry.
pub async fn load_catalog(source: &dyn ProjectSource) -> Result<LoadedCatalog, LoadFailure> {
    let location = source.location().to_string();
    let result = match source.fetch().await {
        Ok(bytes) => decode_catalog(&bytes).map_err(SourceError::from),
        Err(err) => Err(err),
    };

    match result {
        Ok(loaded) => {
            if loaded.rejected > 0 {
                warn!(
                    location = %location,
                    rejected = loaded.rejected,
                    "some catalog records failed validation and were skipped"
                );
            }
            info!(
                location = %location,
                entries = loaded.catalog.entry_count(),
                grouped = loaded.catalog.is_grouped(),
                "catalog loaded"
            );
            Ok(loaded)
        }
        Err(err) => {
            error!(location = %location, error = %err, "error loading projects");
            Err(LoadFailure::new(location, err.to_string()))
        }
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
