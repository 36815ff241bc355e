//! Remote catalog layer
//!
//! Everything that knows the catalog server exists: URL derivation,
//! provider normalization, the wire client and the retention sweep.

pub mod client;
pub mod name;
pub mod provider;
pub mod retention;

pub use client::{Catalog, HttpCatalogClient};
pub use name::CatalogName;
pub use provider::Provider;
pub use retention::{RetentionDecision, RetentionPolicy};
