//! Box Version - strict MAJOR.MINOR.PATCH version type
//!
//! Catalog versions are plain numeric triples. Anything else (pre-release
//! suffixes, build metadata, partial versions, freeform strings) is simply
//! "not a box version", which is a distinct signal from a hard error: the
//! resolver falls back to the baseline when auto-resolving, and only an
//! explicitly requested malformed version becomes an error.
//!
//! # Example
//!
//! ```
//! use box_publisher::version::BoxVersion;
//!
//! let version = BoxVersion::parse("1.2.3").unwrap();
//! assert_eq!(version.major(), 1);
//! assert_eq!(version.bump_patch().to_string(), "1.2.4");
//!
//! assert!(BoxVersion::parse("1.2.3-alpha.1").is_none());
//! ```

use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;
use semver::Version;

lazy_static! {
    /// Strict version syntax; no pre-release or build metadata forms
    static ref STRICT_VERSION: Regex =
        Regex::new(r"^[0-9]+\.[0-9]+\.[0-9]+$").expect("strict version pattern is valid");
}

/// A published box version: a numeric `(major, minor, patch)` triple
///
/// Ordering is total and numeric, component by component, so `1.10.0`
/// sorts above `1.9.0`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BoxVersion(Version);

impl BoxVersion {
    /// Build a version from its components
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self(Version::new(major, minor, patch))
    }

    /// Parse a strict `MAJOR.MINOR.PATCH` string
    ///
    /// Returns `None` for anything outside the strict syntax; the caller
    /// decides whether that means "fall back to the baseline" or "hard
    /// error".
    pub fn parse(input: &str) -> Option<Self> {
        if !STRICT_VERSION.is_match(input) {
            return None;
        }
        // The regex admits leading zeros and component values beyond u64;
        // semver's numeric parse settles both.
        Version::parse(input).ok().map(Self)
    }

    /// The default first version when no valid current version exists
    pub fn baseline() -> Self {
        Self::new(1, 0, 0)
    }

    /// The lowest possible version, used when an unparsable current
    /// version has to take part in a comparison
    pub fn zero() -> Self {
        Self::new(0, 0, 0)
    }

    /// Next patch version, major and minor unchanged
    pub fn bump_patch(&self) -> Self {
        Self::new(self.0.major, self.0.minor, self.0.patch + 1)
    }

    pub fn major(&self) -> u64 {
        self.0.major
    }

    pub fn minor(&self) -> u64 {
        self.0.minor
    }

    pub fn patch(&self) -> u64 {
        self.0.patch
    }
}

impl fmt::Display for BoxVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.0.major, self.0.minor, self.0.patch)
    }
}
