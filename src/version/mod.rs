pub mod box_version;
pub mod resolver;

pub use box_version::BoxVersion;
pub use resolver::VersionResolver;
