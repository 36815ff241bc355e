//! Publish Workflow - end-to-end publishing of one target box
//!
//! Composes version resolution, the upload session and the retention
//! policy for a single target: resolve → upload → record locally →
//! retain. A successful upload is the durability point; retention
//! trouble after it is reported as a warning, never as a failure.
//!
//! Workflows for multiple targets run strictly sequentially, one at a
//! time in caller-supplied order, so publishing version N+1 can never
//! race publishing version N for the same catalog entry.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};

use crate::catalog::{Catalog, CatalogName, RetentionPolicy};
use crate::core::config::PublisherConfig;
use crate::core::error::PublishError;
use crate::core::ui::UiSink;
use crate::version::{BoxVersion, VersionResolver};

use super::upload_session::UploadSession;

/// Workflow states, in pass-through order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    ResolvingVersion,
    Uploading,
    RecordingLocally,
    Retaining,
    Done,
    /// Terminal state of a target whose run returned an error; a success
    /// report's transitions never contain it
    Failed,
}

/// One timestamped state entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateTransition {
    pub state: WorkflowState,
    pub at: DateTime<Utc>,
}

/// One target box to publish
#[derive(Debug, Clone)]
pub struct PublishTarget {
    /// Local box identifier (underscore form)
    pub box_name: String,

    /// Currently published version string, possibly freeform
    pub current_version: String,

    /// Raw provider name as reported by the host side
    pub provider: String,

    /// Exported artifact file
    pub artifact: PathBuf,

    /// Remove the artifact after the upload attempt (set when the file
    /// was exported solely for this publish)
    pub remove_artifact: bool,
}

/// What the caller persists into its local version index after a
/// successful upload; the core stores nothing itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalIndexRecord {
    pub box_name: String,
    pub version: BoxVersion,
    pub provider: String,
    /// Canonical catalog URL the box is now served from
    pub source_url: String,
}

/// Publishing report returned for one completed target
#[derive(Debug, Clone)]
pub struct PublishReport {
    pub box_name: String,
    pub version: BoxVersion,
    pub provider: String,
    pub local_record: LocalIndexRecord,
    /// Number of delete attempts issued by the retention sweep
    pub deleted_versions: usize,
    pub warnings: Vec<String>,
    pub transitions: Vec<StateTransition>,
    pub published_at: DateTime<Utc>,
    pub duration_ms: u64,
}

/// Batch behavior for multiple targets
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    /// Keep publishing the remaining targets after one fails
    pub continue_on_error: bool,
}

/// Per-target results of a batch run, in execution order
#[derive(Debug)]
pub struct BatchOutcome {
    pub results: Vec<(String, Result<PublishReport, PublishError>)>,
}

impl BatchOutcome {
    pub fn success(&self) -> bool {
        self.results.iter().all(|(_, result)| result.is_ok())
    }

    /// Final state each executed target ended in
    pub fn final_states(&self) -> Vec<(String, WorkflowState)> {
        self.results
            .iter()
            .map(|(box_name, result)| {
                let state = match result {
                    Ok(_) => WorkflowState::Done,
                    Err(_) => WorkflowState::Failed,
                };
                (box_name.clone(), state)
            })
            .collect()
    }
}

/// Publishes targets against one catalog under one configuration
pub struct PublishWorkflow<'a> {
    catalog: &'a dyn Catalog,
    ui: Arc<dyn UiSink>,
    config: PublisherConfig,
    requested_version: Option<String>,
}

impl<'a> PublishWorkflow<'a> {
    pub fn new(catalog: &'a dyn Catalog, ui: Arc<dyn UiSink>, config: PublisherConfig) -> Self {
        Self {
            catalog,
            ui,
            config,
            requested_version: None,
        }
    }

    /// Publish under this explicit version instead of auto-resolving
    pub fn requested_version(mut self, version: Option<String>) -> Self {
        self.requested_version = version;
        self
    }

    /// Publish one target: resolve → upload → record locally → retain
    ///
    /// # Errors
    ///
    /// Any [`PublishError`] aborts this target immediately. Retention
    /// errors are the exception: the publish already happened, so they
    /// only land in the report's warnings.
    pub fn run(&self, target: &PublishTarget) -> Result<PublishReport, PublishError> {
        let started = Instant::now();
        let mut transitions = Vec::new();
        let mut enter = |state: WorkflowState| {
            transitions.push(StateTransition {
                state,
                at: Utc::now(),
            });
        };

        if !target.artifact.is_file() {
            return Err(PublishError::TargetNotReady {
                box_name: target.box_name.clone(),
                detail: format!(
                    "box file {} has not been exported",
                    target.artifact.display()
                ),
            });
        }

        enter(WorkflowState::ResolvingVersion);
        let name = CatalogName::new(self.config.catalog.url.as_deref(), &target.box_name)?;
        let resolver = VersionResolver::new(&target.box_name);
        let version = resolver.resolve(self.requested_version.as_deref(), &target.current_version)?;
        self.ui.info(&format!(
            "📦 Publishing {} as version {}",
            target.box_name, version
        ));

        enter(WorkflowState::Uploading);
        let session = UploadSession::new(self.catalog, self.ui.clone());
        let uploaded = session.upload(&name, &version, &target.provider, &target.artifact);

        // The exported file is removed on every exit path once the upload
        // has been attempted
        if target.remove_artifact
            && let Err(e) = fs::remove_file(&target.artifact)
        {
            self.ui.info(&format!(
                "⚠️  Could not remove exported box file {}: {}",
                target.artifact.display(),
                e
            ));
        }

        let outcome = uploaded?;

        enter(WorkflowState::RecordingLocally);
        let local_record = LocalIndexRecord {
            box_name: target.box_name.clone(),
            version: version.clone(),
            provider: outcome.provider.as_str().to_string(),
            source_url: name.as_str().to_string(),
        };

        enter(WorkflowState::Retaining);
        let mut warnings = Vec::new();
        let mut deleted_versions = 0;
        if self.config.retention.is_active() {
            let policy = RetentionPolicy::new(self.catalog, self.ui.clone());
            match policy.sweep(&name, self.config.retention.keep) {
                Ok(attempted) => deleted_versions = attempted,
                Err(e) => {
                    // Upload success is the durability point; a failed
                    // sweep never reverts it
                    let warning = format!("retention sweep failed: {}", e);
                    self.ui.info(&format!("⚠️  {}", warning));
                    warnings.push(warning);
                }
            }
        }

        enter(WorkflowState::Done);
        Ok(PublishReport {
            box_name: target.box_name.clone(),
            version,
            provider: local_record.provider.clone(),
            local_record,
            deleted_versions,
            warnings,
            transitions,
            published_at: Utc::now(),
            duration_ms: started.elapsed().as_millis() as u64,
        })
    }

    /// Publish several targets strictly sequentially, in the given order
    ///
    /// Failures are isolated per target; `continue_on_error` decides
    /// whether the remaining targets still run after one fails.
    pub fn run_all(&self, targets: &[PublishTarget], options: &BatchOptions) -> BatchOutcome {
        let mut results = Vec::new();

        for target in targets {
            let result = self.run(target);
            if let Err(e) = &result {
                self.ui.info(&format!("❌ {}", e));
            }
            let failed = result.is_err();
            results.push((target.box_name.clone(), result));
            if failed && !options.continue_on_error {
                break;
            }
        }

        BatchOutcome { results }
    }
}
