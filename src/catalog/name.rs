//! Catalog Name - URL of one box's entry in the remote catalog
//!
//! A catalog name is `base_url + "/" + name`, where `name` is the local box
//! identifier with underscore runs replaced by path separators. The base
//! URL comes from configuration; its absence is a configuration error, not
//! a runtime fault.

use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;

use crate::catalog::provider::Provider;
use crate::core::error::PublishError;
use crate::version::BoxVersion;

lazy_static! {
    static ref UNDERSCORE_RUN: Regex = Regex::new(r"_+").expect("underscore pattern is valid");
}

/// Fully-resolved catalog URL for one box
///
/// # Example
///
/// ```
/// use box_publisher::catalog::CatalogName;
///
/// let name = CatalogName::new(Some("https://boxes.example.com"), "acme__ubuntu_base").unwrap();
/// assert_eq!(name.as_str(), "https://boxes.example.com/acme/ubuntu/base");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogName {
    url: String,
}

impl CatalogName {
    /// Build the catalog URL for `box_name` under the configured base URL
    ///
    /// # Errors
    ///
    /// `CatalogServerNotConfigured` when the base URL is missing or empty.
    pub fn new(base_url: Option<&str>, box_name: &str) -> Result<Self, PublishError> {
        let base = base_url.map(str::trim).unwrap_or_default();
        if base.is_empty() {
            return Err(PublishError::CatalogServerNotConfigured {
                box_name: box_name.to_string(),
            });
        }

        let name = UNDERSCORE_RUN.replace_all(box_name, "/");
        Ok(Self {
            url: format!("{}/{}", base.trim_end_matches('/'), name),
        })
    }

    /// Catalog URL for the box itself (probe and listing target)
    pub fn as_str(&self) -> &str {
        &self.url
    }

    /// URL of one published version (deletion target)
    pub fn version_url(&self, version: &BoxVersion) -> String {
        format!("{}/{}", self.url, version)
    }

    /// URL one artifact variant is uploaded to
    pub fn upload_url(&self, version: &BoxVersion, provider: &Provider) -> String {
        format!("{}/{}/{}", self.url, version, provider.as_str())
    }
}

impl fmt::Display for CatalogName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}
