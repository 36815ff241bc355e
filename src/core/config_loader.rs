//! Configuration file loader for box-publisher
//!
//! Loads and merges configuration from every source the operator can set,
//! lowest priority first:
//!
//! 1. Built-in defaults
//! 2. Global config (`~/.box-publisher.yaml`)
//! 3. Project config (`./.box-publisher.yaml`)
//! 4. Environment variables
//! 5. CLI arguments

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;

use super::config::{CatalogOverlay, ConfigOverlay, PublisherConfig, RetentionOverlay};

/// Configuration file name, in the home and project directories
pub const CONFIG_FILENAME: &str = ".box-publisher.yaml";

/// Environment variable naming the catalog server URL
pub const ENV_SERVER_URL: &str = "BOX_SERVER_URL";
/// Environment variable overriding the per-call timeout in seconds
pub const ENV_TIMEOUT_SECS: &str = "BOX_PUBLISHER_TIMEOUT_SECS";
/// Environment variable overriding the retention keep-count
pub const ENV_KEEP: &str = "BOX_PUBLISHER_KEEP";

/// Configuration load options
#[derive(Debug, Clone, Default)]
pub struct ConfigLoadOptions {
    /// Project directory to load the project config from
    pub project_path: PathBuf,

    /// Home directory holding the global config, if any
    pub home_dir: Option<PathBuf>,

    /// Environment variables (passed in explicitly, never read ambiently)
    pub env: HashMap<String, String>,

    /// CLI arguments (highest priority)
    pub cli: ConfigOverlay,
}

/// Configuration file loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load the effective configuration from all sources
    pub fn load(options: ConfigLoadOptions) -> anyhow::Result<PublisherConfig> {
        let mut config = PublisherConfig::default();

        if let Some(home) = &options.home_dir
            && let Some(global) = Self::load_file(&home.join(CONFIG_FILENAME))?
        {
            config.apply(global);
        }

        if let Some(project) = Self::load_file(&options.project_path.join(CONFIG_FILENAME))? {
            config.apply(project);
        }

        config.apply(Self::env_overlay(&options.env)?);
        config.apply(options.cli);

        Ok(config)
    }

    /// Load one YAML overlay; a missing file is simply absent, a malformed
    /// one is an error
    fn load_file(path: &Path) -> anyhow::Result<Option<ConfigOverlay>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("cannot read config file {}", path.display()))?;
        let overlay = serde_yaml::from_str(&content)
            .with_context(|| format!("malformed config file {}", path.display()))?;

        Ok(Some(overlay))
    }

    /// Overlay built from environment variables
    fn env_overlay(env: &HashMap<String, String>) -> anyhow::Result<ConfigOverlay> {
        let timeout_secs = env
            .get(ENV_TIMEOUT_SECS)
            .map(|raw| {
                raw.parse::<u64>()
                    .with_context(|| format!("{} must be a number of seconds, got '{}'", ENV_TIMEOUT_SECS, raw))
            })
            .transpose()?;
        let keep = env
            .get(ENV_KEEP)
            .map(|raw| {
                raw.parse::<usize>()
                    .with_context(|| format!("{} must be a version count, got '{}'", ENV_KEEP, raw))
            })
            .transpose()?;

        Ok(ConfigOverlay {
            catalog: CatalogOverlay {
                url: env.get(ENV_SERVER_URL).cloned(),
                timeout_secs,
            },
            retention: RetentionOverlay {
                enabled: None,
                keep,
            },
        })
    }
}
