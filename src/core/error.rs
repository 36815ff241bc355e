//! Error handling for box publishing
//!
//! This module provides the error types for the publish workflow using
//! the thiserror crate for ergonomic error handling.
//!
//! Every error aborts the workflow of the target it belongs to, never the
//! whole batch. The single exception to strict propagation lives in the
//! retention sweep: per-version delete failures are logged and counted by
//! the caller instead of being raised through this type.

use thiserror::Error;

/// Main error type for box publishing operations
#[derive(Error, Debug)]
pub enum PublishError {
    // Configuration errors
    #[error("[{box_name}] no catalog server URL is configured")]
    CatalogServerNotConfigured { box_name: String },

    // Version resolution errors
    #[error(
        "[{box_name}] '{version}' is not a valid version; pass a version number like 1.2.3, or leave it out to bump the patch number"
    )]
    InvalidVersionSyntax { box_name: String, version: String },

    #[error(
        "[{box_name}] version {requested} is not greater than the currently published version {current}"
    )]
    VersionNotGreater {
        box_name: String,
        requested: String,
        current: String,
    },

    // Catalog transport errors
    #[error(
        "cannot contact the catalog server at {url}; make sure the URL is correct and the server is running"
    )]
    CannotContactCatalogServer { url: String },

    #[error("cannot upload the box file to {url}: {detail}")]
    UploadFailed { url: String, detail: String },

    #[error("unexpected version listing from {url}: {detail}")]
    CatalogListParseFailed { url: String, detail: String },

    // Target errors
    #[error("[{box_name}] target is not ready to publish: {detail}")]
    TargetNotReady { box_name: String, detail: String },
}

impl PublishError {
    /// Get error code for this error
    pub fn code(&self) -> &'static str {
        match self {
            Self::CatalogServerNotConfigured { .. } => "CATALOG_SERVER_NOT_CONFIGURED",
            Self::InvalidVersionSyntax { .. } => "INVALID_VERSION_SYNTAX",
            Self::VersionNotGreater { .. } => "VERSION_NOT_GREATER",
            Self::CannotContactCatalogServer { .. } => "CANNOT_CONTACT_CATALOG_SERVER",
            Self::UploadFailed { .. } => "UPLOAD_FAILED",
            Self::CatalogListParseFailed { .. } => "CATALOG_LIST_PARSE_FAILED",
            Self::TargetNotReady { .. } => "TARGET_NOT_READY",
        }
    }

    /// Check if re-running the workflow could succeed without a changed
    /// invocation
    ///
    /// Version and configuration errors need operator input before a retry
    /// makes sense; transport errors and an unready target may clear up on
    /// a later run. The core never retries on its own either way.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            Self::CatalogServerNotConfigured { .. }
                | Self::InvalidVersionSyntax { .. }
                | Self::VersionNotGreater { .. }
        )
    }
}
