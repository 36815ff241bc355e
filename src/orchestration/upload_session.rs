//! Upload Session - one probe-then-upload exchange with the catalog
//!
//! Wraps the raw catalog upload with reachability checking, provider
//! normalization, throttled progress reporting and outcome
//! classification. The session never talks HTTP itself and never assumes
//! a particular display; it only needs a [`Catalog`] and a [`UiSink`].

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::catalog::{Catalog, CatalogName, Provider};
use crate::core::error::PublishError;
use crate::core::progress::{DEFAULT_THROTTLE, ProgressReporter};
use crate::core::ui::UiSink;
use crate::version::BoxVersion;

/// Result of a completed upload
///
/// There is no partial-success state: an upload either finished with HTTP
/// 200 and produced this, or it failed entirely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOutcome {
    /// Canonical provider the artifact was published under
    pub provider: Provider,
}

/// Orchestrates a single artifact upload
pub struct UploadSession<'a> {
    catalog: &'a dyn Catalog,
    ui: Arc<dyn UiSink>,
    throttle: Duration,
}

impl<'a> UploadSession<'a> {
    pub fn new(catalog: &'a dyn Catalog, ui: Arc<dyn UiSink>) -> Self {
        Self::with_throttle(catalog, ui, DEFAULT_THROTTLE)
    }

    /// Session with a custom progress throttle window
    pub fn with_throttle(catalog: &'a dyn Catalog, ui: Arc<dyn UiSink>, throttle: Duration) -> Self {
        Self {
            catalog,
            ui,
            throttle,
        }
    }

    /// Probe the catalog, stream the artifact, classify the outcome
    ///
    /// # Errors
    ///
    /// * `CannotContactCatalogServer` - probe did not return success; no
    ///   upload is attempted
    /// * `UploadFailed` - the transfer broke mid-way or finished with a
    ///   non-200 status
    pub fn upload(
        &self,
        name: &CatalogName,
        version: &BoxVersion,
        raw_provider: &str,
        artifact: &Path,
    ) -> Result<UploadOutcome, PublishError> {
        if !self.catalog.probe(name) {
            return Err(PublishError::CannotContactCatalogServer {
                url: name.to_string(),
            });
        }

        let provider = Provider::from_raw(raw_provider);
        self.ui.info(&format!(
            "📤 Uploading version {} ({}) to {}",
            version, provider, name
        ));

        let reporter = ProgressReporter::with_throttle(self.ui.clone(), self.throttle);
        let status = self
            .catalog
            .upload(name, version, &provider, artifact, Box::new(reporter))?;
        self.ui.clear_line();

        if status != 200 {
            return Err(PublishError::UploadFailed {
                url: name.upload_url(version, &provider),
                detail: format!("HTTP {}", status),
            });
        }

        self.ui.info("✅ Upload successful");
        Ok(UploadOutcome { provider })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::progress::ProgressObserver;
    use crate::core::ui::MemoryUi;
    use std::sync::Mutex;

    struct FakeCatalog {
        reachable: bool,
        upload_status: u16,
        /// Simulated (bytes_sent, total_bytes) progress during upload
        progress: Vec<(u64, u64)>,
        uploads: Mutex<Vec<String>>,
    }

    impl FakeCatalog {
        fn reachable(upload_status: u16) -> Self {
            Self {
                reachable: true,
                upload_status,
                progress: Vec::new(),
                uploads: Mutex::new(Vec::new()),
            }
        }

        fn unreachable() -> Self {
            Self {
                reachable: false,
                upload_status: 200,
                progress: Vec::new(),
                uploads: Mutex::new(Vec::new()),
            }
        }

        fn upload_count(&self) -> usize {
            self.uploads.lock().unwrap().len()
        }
    }

    impl Catalog for FakeCatalog {
        fn probe(&self, _name: &CatalogName) -> bool {
            self.reachable
        }

        fn upload(
            &self,
            name: &CatalogName,
            version: &BoxVersion,
            provider: &Provider,
            _artifact: &Path,
            mut observer: Box<dyn ProgressObserver>,
        ) -> Result<u16, PublishError> {
            self.uploads
                .lock()
                .unwrap()
                .push(name.upload_url(version, provider));
            for &(sent, total) in &self.progress {
                observer.report(sent, total);
            }
            Ok(self.upload_status)
        }

        fn list(&self, _name: &CatalogName) -> Result<Vec<String>, PublishError> {
            Ok(Vec::new())
        }

        fn delete(&self, _name: &CatalogName, _version: &BoxVersion) -> anyhow::Result<()> {
            Ok(())
        }
    }

    fn name() -> CatalogName {
        CatalogName::new(Some("https://boxes.example.com"), "ubuntu_base").unwrap()
    }

    #[test]
    fn test_probe_failure_prevents_any_upload_attempt() {
        let catalog = FakeCatalog::unreachable();
        let session = UploadSession::new(&catalog, Arc::new(MemoryUi::new()));

        let error = session
            .upload(&name(), &BoxVersion::new(1, 0, 0), "virtualbox", Path::new("a.box"))
            .unwrap_err();

        assert_eq!(error.code(), "CANNOT_CONTACT_CATALOG_SERVER");
        assert_eq!(catalog.upload_count(), 0);
    }

    #[test]
    fn test_successful_upload_carries_normalized_provider() {
        let catalog = FakeCatalog::reachable(200);
        let session = UploadSession::new(&catalog, Arc::new(MemoryUi::new()));

        let outcome = session
            .upload(
                &name(),
                &BoxVersion::new(1, 0, 1),
                "vmware_fusion",
                Path::new("a.box"),
            )
            .unwrap();

        assert_eq!(outcome.provider, Provider::VmwareDesktop);
        assert_eq!(
            catalog.uploads.lock().unwrap()[0],
            "https://boxes.example.com/ubuntu/base/1.0.1/vmware_desktop"
        );
    }

    #[test]
    fn test_non_200_status_is_upload_failed() {
        let catalog = FakeCatalog::reachable(503);
        let session = UploadSession::new(&catalog, Arc::new(MemoryUi::new()));

        let error = session
            .upload(&name(), &BoxVersion::new(1, 0, 0), "virtualbox", Path::new("a.box"))
            .unwrap_err();

        assert_eq!(error.code(), "UPLOAD_FAILED");
        assert!(error.to_string().contains("HTTP 503"));
    }

    #[test]
    fn test_progress_reaches_the_ui_sink() {
        let mut catalog = FakeCatalog::reachable(200);
        catalog.progress = vec![(512, 2048), (2048, 2048)];
        let ui = Arc::new(MemoryUi::new());
        let session = UploadSession::new(&catalog, ui.clone());

        session
            .upload(&name(), &BoxVersion::new(1, 0, 0), "virtualbox", Path::new("a.box"))
            .unwrap();

        let infos = ui.infos();
        assert!(infos.iter().any(|m| m.contains("Uploading 512 Byte")));
        assert!(infos.iter().any(|m| m.contains("finish processing")));
        assert_eq!(infos.last().unwrap(), "✅ Upload successful");
    }

    #[test]
    fn test_success_message_announces_the_upload() {
        let catalog = FakeCatalog::reachable(200);
        let ui = Arc::new(MemoryUi::new());
        let session = UploadSession::new(&catalog, ui.clone());

        session
            .upload(&name(), &BoxVersion::new(2, 0, 0), "virtualbox", Path::new("a.box"))
            .unwrap();

        assert!(
            ui.infos()
                .first()
                .unwrap()
                .contains("Uploading version 2.0.0 (virtualbox)")
        );
    }
}
