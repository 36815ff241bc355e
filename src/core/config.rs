//! Configuration structures for box-publisher
//!
//! Type-safe configuration with serde support. Components never read
//! ambient state; the loaded configuration is handed to them explicitly.

use std::time::Duration;

use serde::{Deserialize, Serialize};

fn default_timeout_secs() -> u64 {
    10
}

fn default_retention_enabled() -> bool {
    true
}

fn default_keep_count() -> usize {
    2
}

/// Root configuration object
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct PublisherConfig {
    /// Remote catalog settings
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Retention/cleanup settings
    #[serde(default)]
    pub retention: RetentionConfig,
}

/// Remote catalog settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CatalogConfig {
    /// Base catalog server URL (required for any publish)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Per-call connect/read/write timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl CatalogConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Retention/cleanup settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RetentionConfig {
    /// Run a retention sweep after each successful publish
    #[serde(default = "default_retention_enabled")]
    pub enabled: bool,

    /// Number of newest versions to preserve
    #[serde(default = "default_keep_count")]
    pub keep: usize,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            enabled: default_retention_enabled(),
            keep: default_keep_count(),
        }
    }
}

impl RetentionConfig {
    /// Retention only acts when enabled with a keep-count above one
    pub fn is_active(&self) -> bool {
        self.enabled && self.keep > 1
    }
}

/// Partial configuration from one source (file, environment, CLI)
///
/// Every field is optional; [`PublisherConfig::apply`] overlays the set
/// ones onto the effective configuration, so later sources win.
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigOverlay {
    #[serde(default)]
    pub catalog: CatalogOverlay,

    #[serde(default)]
    pub retention: RetentionOverlay,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CatalogOverlay {
    pub url: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RetentionOverlay {
    pub enabled: Option<bool>,
    pub keep: Option<usize>,
}

impl PublisherConfig {
    /// Overlay one partial configuration; set fields replace current ones
    pub fn apply(&mut self, overlay: ConfigOverlay) {
        if let Some(url) = overlay.catalog.url {
            self.catalog.url = Some(url);
        }
        if let Some(timeout_secs) = overlay.catalog.timeout_secs {
            self.catalog.timeout_secs = timeout_secs;
        }
        if let Some(enabled) = overlay.retention.enabled {
            self.retention.enabled = enabled;
        }
        if let Some(keep) = overlay.retention.keep {
            self.retention.keep = keep;
        }
    }
}
