//! Orchestration layer for box publishing
//!
//! High-level components that drive a publish end to end: the per-upload
//! session and the full resolve/upload/retain workflow.

pub mod upload_session;
pub mod workflow;

pub use upload_session::{UploadOutcome, UploadSession};
pub use workflow::{
    BatchOptions, BatchOutcome, LocalIndexRecord, PublishReport, PublishTarget, PublishWorkflow,
    WorkflowState,
};
