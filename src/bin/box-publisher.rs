//! Box Publisher CLI
//!
//! Publishes versioned box artifacts to a catalog server

use anyhow::Result;
use box_publisher::core::config::{CatalogOverlay, ConfigOverlay, RetentionOverlay};
use box_publisher::core::config_loader::{ConfigLoadOptions, ConfigLoader};
use box_publisher::core::ui::ConsoleUi;
use box_publisher::{
    Catalog, CatalogName, HttpCatalogClient, PublishTarget, PublishWorkflow, PublisherConfig,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

/// Catalog server publishing assistant for box artifacts
#[derive(Parser)]
#[command(name = "box-publisher")]
#[command(version = "0.1.0")]
#[command(about = "Publish versioned box artifacts to a catalog server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Publish a box artifact to the catalog
    Publish {
        /// Box name, underscores marking catalog path segments
        #[arg(value_name = "BOX_NAME")]
        box_name: String,

        /// Exported box file to upload
        #[arg(value_name = "ARTIFACT")]
        artifact: PathBuf,

        /// Explicit version to publish (defaults to auto-resolution)
        #[arg(short, long)]
        version: Option<String>,

        /// Provider the box was built for
        #[arg(short, long, default_value = "virtualbox")]
        provider: String,

        /// Currently published version, for auto-resolution
        #[arg(long, default_value = "0")]
        current_version: String,

        /// Catalog server base URL (overrides config and environment)
        #[arg(long)]
        box_url: Option<String>,

        /// Per-call timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Number of newest versions to keep after publishing
        #[arg(long)]
        keep: Option<usize>,

        /// Skip the retention sweep entirely
        #[arg(long)]
        no_clean: bool,

        /// Remove the artifact file once the upload has been attempted
        #[arg(long)]
        remove_artifact: bool,
    },

    /// Check whether the catalog server answers for a box
    Check {
        /// Box name, underscores marking catalog path segments
        #[arg(value_name = "BOX_NAME")]
        box_name: String,

        /// Catalog server base URL (overrides config and environment)
        #[arg(long)]
        box_url: Option<String>,
    },

    /// Write a default .box-publisher.yaml into the current directory
    Init {
        /// Overwrite an existing configuration file
        #[arg(short, long)]
        force: bool,
    },
}

fn main() {
    match run() {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            eprintln!("\n❌ Error");
            eprintln!("{:#}", e);
            process::exit(1);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Publish {
            box_name,
            artifact,
            version,
            provider,
            current_version,
            box_url,
            timeout,
            keep,
            no_clean,
            remove_artifact,
        } => {
            let config = load_config(box_url, timeout, keep, no_clean)?;
            publish_command(
                config,
                PublishTarget {
                    box_name,
                    current_version,
                    provider,
                    artifact,
                    remove_artifact,
                },
                version,
            )
        }
        Commands::Check { box_name, box_url } => {
            let config = load_config(box_url, None, None, false)?;
            check_command(config, &box_name)
        }
        Commands::Init { force } => init_command(force),
    }
}

fn load_config(
    box_url: Option<String>,
    timeout: Option<u64>,
    keep: Option<usize>,
    no_clean: bool,
) -> Result<PublisherConfig> {
    ConfigLoader::load(ConfigLoadOptions {
        project_path: PathBuf::from("."),
        home_dir: std::env::var_os("HOME").map(PathBuf::from),
        env: std::env::vars().collect(),
        cli: ConfigOverlay {
            catalog: CatalogOverlay {
                url: box_url,
                timeout_secs: timeout,
            },
            retention: RetentionOverlay {
                enabled: if no_clean { Some(false) } else { None },
                keep,
            },
        },
    })
}

fn publish_command(
    config: PublisherConfig,
    target: PublishTarget,
    version: Option<String>,
) -> Result<i32> {
    println!("\n📦 box-publisher\n");

    let catalog = HttpCatalogClient::with_timeout(config.catalog.timeout())?;
    let workflow =
        PublishWorkflow::new(&catalog, Arc::new(ConsoleUi), config).requested_version(version);

    match workflow.run(&target) {
        Ok(report) => {
            for warning in &report.warnings {
                eprintln!("⚠️  {}", warning);
            }
            println!(
                "\n✅ Published {} version {} ({})",
                report.box_name, report.version, report.provider
            );
            Ok(0)
        }
        Err(e) => {
            eprintln!("\n❌ Publishing failed: {}", e);
            Ok(1)
        }
    }
}

fn check_command(config: PublisherConfig, box_name: &str) -> Result<i32> {
    println!("\n🔍 Catalog Check\n");

    let name = CatalogName::new(config.catalog.url.as_deref(), box_name)?;
    let catalog = HttpCatalogClient::with_timeout(config.catalog.timeout())?;

    if catalog.probe(&name) {
        println!("✅ Catalog server answers for {}", name);
        Ok(0)
    } else {
        println!("❌ Catalog server does not answer for {}", name);
        Ok(1)
    }
}

fn init_command(force: bool) -> Result<i32> {
    use box_publisher::core::config_loader::CONFIG_FILENAME;

    println!("\n🎯 Initialize box-publisher\n");

    let path = PathBuf::from(CONFIG_FILENAME);
    if path.exists() && !force {
        eprintln!(
            "⚠️  {} already exists; use --force to overwrite",
            CONFIG_FILENAME
        );
        return Ok(1);
    }

    let yaml = serde_yaml::to_string(&PublisherConfig::default())?;
    std::fs::write(&path, yaml)?;
    println!("✅ Wrote {}", CONFIG_FILENAME);
    Ok(0)
}
