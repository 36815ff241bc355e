pub mod config;
pub mod config_loader;
pub mod error;
pub mod progress;
pub mod ui;

pub use config::{CatalogConfig, ConfigOverlay, PublisherConfig, RetentionConfig};
pub use config_loader::{ConfigLoadOptions, ConfigLoader};
pub use error::PublishError;
pub use progress::{ProgressObserver, ProgressReporter, format_bytes};
pub use ui::{ConsoleUi, MemoryUi, UiSink};
