//! box-publisher - publish versioned box artifacts to a catalog server
//!
//! Publishes exported box files to a remote HTTP catalog under strict
//! MAJOR.MINOR.PATCH versions and keeps the catalog tidy by deleting
//! versions beyond a configurable keep-count after each publish.
//!
//! The layers, bottom to top:
//!
//! - [`version`] - strict version syntax and next-version resolution
//! - [`catalog`] - catalog naming, provider normalization, the HTTP
//!   client and the retention sweep
//! - [`orchestration`] - the upload session and the publish workflow
//! - [`core`] - configuration, errors, progress reporting and UI output

pub mod catalog;
pub mod core;
pub mod orchestration;
pub mod version;

pub use crate::catalog::{Catalog, CatalogName, HttpCatalogClient, Provider, RetentionPolicy};
pub use crate::core::{PublishError, PublisherConfig, UiSink};
pub use crate::orchestration::{PublishReport, PublishTarget, PublishWorkflow};
pub use crate::version::{BoxVersion, VersionResolver};
