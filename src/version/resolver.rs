//! Version Resolver - computes the version to publish under
//!
//! Two modes, mirroring how operators invoke a publish:
//!
//! - an explicit version must use the strict `MAJOR.MINOR.PATCH` syntax and
//!   be strictly greater than the currently published version;
//! - with no explicit version, a parsable current version gets its patch
//!   component bumped, and anything else starts over at the baseline
//!   `1.0.0`.
//!
//! # Example
//!
//! ```
//! use box_publisher::version::{BoxVersion, VersionResolver};
//!
//! let resolver = VersionResolver::new("ubuntu_base");
//!
//! assert_eq!(
//!     resolver.resolve(None, "2.3.1").unwrap(),
//!     BoxVersion::new(2, 3, 2)
//! );
//! assert_eq!(
//!     resolver.resolve(None, "not-a-version").unwrap(),
//!     BoxVersion::baseline()
//! );
//! ```

use crate::core::error::PublishError;

use super::box_version::BoxVersion;

/// Resolves the version one target publishes under
pub struct VersionResolver {
    box_name: String,
}

impl VersionResolver {
    /// Create a resolver for one target box; the name only feeds error
    /// context
    pub fn new(box_name: impl Into<String>) -> Self {
        Self {
            box_name: box_name.into(),
        }
    }

    /// Resolve the version to publish
    ///
    /// # Arguments
    ///
    /// * `requested` - Explicit version from the operator, if any
    /// * `current` - Currently published version string, possibly freeform
    ///
    /// # Errors
    ///
    /// * `InvalidVersionSyntax` - explicit version outside the strict
    ///   `MAJOR.MINOR.PATCH` syntax
    /// * `VersionNotGreater` - explicit version not strictly greater than
    ///   the current one. An unparsable current version compares as
    ///   `0.0.0`, so any syntactically valid explicit version passes.
    pub fn resolve(
        &self,
        requested: Option<&str>,
        current: &str,
    ) -> Result<BoxVersion, PublishError> {
        match requested {
            Some(raw) => {
                let wanted =
                    BoxVersion::parse(raw).ok_or_else(|| PublishError::InvalidVersionSyntax {
                        box_name: self.box_name.clone(),
                        version: raw.to_string(),
                    })?;

                let published = BoxVersion::parse(current).unwrap_or_else(BoxVersion::zero);
                if wanted <= published {
                    return Err(PublishError::VersionNotGreater {
                        box_name: self.box_name.clone(),
                        requested: wanted.to_string(),
                        current: published.to_string(),
                    });
                }

                Ok(wanted)
            }
            None => Ok(match BoxVersion::parse(current) {
                Some(published) => published.bump_patch(),
                None => BoxVersion::baseline(),
            }),
        }
    }
}
