//! Catalog Client - HTTP facade over the remote box catalog
//!
//! Four wire operations against one configured base URL: existence probe,
//! multipart artifact upload, version listing, version deletion. No
//! business logic lives here; outcome classification belongs to the
//! orchestration layer. All calls are synchronous and blocking with equal
//! connect/read/write timeouts.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::time::Duration;

use reqwest::blocking::{Client, multipart};
use reqwest::{Method, StatusCode};
use serde::Deserialize;

use crate::core::error::PublishError;
use crate::core::progress::ProgressObserver;
use crate::version::BoxVersion;

use super::name::CatalogName;
use super::provider::Provider;

/// Default per-call timeout (connect, read and write alike)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Remote catalog operations
///
/// The orchestration layer only depends on this trait; the HTTP
/// implementation below is swapped for in-memory fakes in tests.
pub trait Catalog {
    /// Existence/reachability check; true only on HTTP 200
    fn probe(&self, name: &CatalogName) -> bool;

    /// Upload the artifact as the `box` field of a multipart form to
    /// `{name}/{version}/{provider}`, driving the observer with byte
    /// counts, and return the final HTTP status
    ///
    /// Fails closed: a dropped connection mid-transfer is an error, never
    /// a partial-success status.
    fn upload(
        &self,
        name: &CatalogName,
        version: &BoxVersion,
        provider: &Provider,
        artifact: &Path,
        observer: Box<dyn ProgressObserver>,
    ) -> Result<u16, PublishError>;

    /// Fetch the published version strings, in server-provided order
    fn list(&self, name: &CatalogName) -> Result<Vec<String>, PublishError>;

    /// Delete one published version
    ///
    /// Any HTTP status is acceptable; only transport failures are errors.
    /// Callers treat those as non-fatal (logged, never aborting a sweep).
    fn delete(&self, name: &CatalogName, version: &BoxVersion) -> anyhow::Result<()>;
}

/// Wire shape of the catalog's version listing
#[derive(Debug, Deserialize)]
struct VersionListing {
    versions: Vec<VersionEntry>,
}

#[derive(Debug, Deserialize)]
struct VersionEntry {
    version: String,
}

/// Read adapter that feeds transfer progress to an observer
///
/// Reports after every chunk, including the terminating zero-length read,
/// so the observer sees `bytes_sent == total_bytes` once the file is out.
struct ProgressReader<R> {
    inner: R,
    observer: Box<dyn ProgressObserver>,
    bytes_sent: u64,
    total_bytes: u64,
}

impl<R: Read> Read for ProgressReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.bytes_sent += n as u64;
        self.observer.report(self.bytes_sent, self.total_bytes);
        Ok(n)
    }
}

/// Blocking HTTP implementation of [`Catalog`]
pub struct HttpCatalogClient {
    http: Client,
}

impl HttpCatalogClient {
    /// Client with the default 10 second timeout
    pub fn new() -> anyhow::Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Client with a custom per-call timeout
    pub fn with_timeout(timeout: Duration) -> anyhow::Result<Self> {
        let http = Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()?;
        Ok(Self { http })
    }
}

impl Catalog for HttpCatalogClient {
    fn probe(&self, name: &CatalogName) -> bool {
        match self.http.request(Method::OPTIONS, name.as_str()).send() {
            Ok(response) => response.status() == StatusCode::OK,
            Err(_) => false,
        }
    }

    fn upload(
        &self,
        name: &CatalogName,
        version: &BoxVersion,
        provider: &Provider,
        artifact: &Path,
        observer: Box<dyn ProgressObserver>,
    ) -> Result<u16, PublishError> {
        let url = name.upload_url(version, provider);

        let file = File::open(artifact).map_err(|e| PublishError::UploadFailed {
            url: url.clone(),
            detail: format!("cannot open artifact {}: {}", artifact.display(), e),
        })?;
        let total_bytes = file
            .metadata()
            .map_err(|e| PublishError::UploadFailed {
                url: url.clone(),
                detail: format!("cannot stat artifact {}: {}", artifact.display(), e),
            })?
            .len();

        let reader = ProgressReader {
            inner: file,
            observer,
            bytes_sent: 0,
            total_bytes,
        };

        let file_name = artifact
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "artifact.box".to_string());
        let part = multipart::Part::reader_with_length(reader, total_bytes)
            .file_name(file_name)
            .mime_str("application/octet-stream")
            .map_err(|e| PublishError::UploadFailed {
                url: url.clone(),
                detail: e.to_string(),
            })?;
        let form = multipart::Form::new().part("box", part);

        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .map_err(|e| PublishError::UploadFailed {
                url: url.clone(),
                detail: e.to_string(),
            })?;

        Ok(response.status().as_u16())
    }

    fn list(&self, name: &CatalogName) -> Result<Vec<String>, PublishError> {
        let url = name.as_str();

        let response =
            self.http
                .get(url)
                .send()
                .map_err(|_| PublishError::CannotContactCatalogServer {
                    url: url.to_string(),
                })?;

        if response.status() != StatusCode::OK {
            return Err(PublishError::CannotContactCatalogServer {
                url: url.to_string(),
            });
        }

        let listing: VersionListing =
            response
                .json()
                .map_err(|e| PublishError::CatalogListParseFailed {
                    url: url.to_string(),
                    detail: e.to_string(),
                })?;

        Ok(listing.versions.into_iter().map(|v| v.version).collect())
    }

    fn delete(&self, name: &CatalogName, version: &BoxVersion) -> anyhow::Result<()> {
        let url = name.version_url(version);
        self.http.delete(&url).send()?;
        Ok(())
    }
}
