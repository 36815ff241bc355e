//! Retention Policy - keep the newest N versions, delete the rest
//!
//! Deletion is irreversible, so ordering is the whole game here: the full
//! listing is parsed strictly, sorted newest-first, and only everything
//! past the keep-count is marked obsolete. A listing entry that does not
//! parse as a version is a hard error; guessing an ordering could delete a
//! still-valid newest version.

use std::sync::Arc;

use crate::core::error::PublishError;
use crate::core::ui::UiSink;
use crate::version::BoxVersion;

use super::client::Catalog;
use super::name::CatalogName;

/// The keep/delete partition of one catalog's version set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetentionDecision {
    /// Newest versions, descending, at most `keep_count` of them
    pub keep: Vec<BoxVersion>,
    /// Obsolete versions, descending
    pub delete: Vec<BoxVersion>,
}

impl RetentionDecision {
    /// Partition `versions`: the `keep_count` newest stay, the rest go
    pub fn compute(mut versions: Vec<BoxVersion>, keep_count: usize) -> Self {
        versions.sort_unstable_by(|a, b| b.cmp(a));
        let delete = if versions.len() > keep_count {
            versions.split_off(keep_count)
        } else {
            Vec::new()
        };
        Self {
            keep: versions,
            delete,
        }
    }
}

/// Executes retention sweeps against a catalog
pub struct RetentionPolicy<'a> {
    catalog: &'a dyn Catalog,
    ui: Arc<dyn UiSink>,
}

impl<'a> RetentionPolicy<'a> {
    pub fn new(catalog: &'a dyn Catalog, ui: Arc<dyn UiSink>) -> Self {
        Self { catalog, ui }
    }

    /// Delete every version beyond the `keep_count` newest
    ///
    /// Returns the number of attempted deletions. Individual delete
    /// failures are logged and counted, never fatal: one stuck version
    /// must not block cleanup of the others or future publishes.
    ///
    /// A keep-count of one or less disables the sweep entirely; no network
    /// call is made.
    ///
    /// # Errors
    ///
    /// Propagates listing failures, including `CatalogListParseFailed` for
    /// any entry outside the strict version syntax.
    pub fn sweep(&self, name: &CatalogName, keep_count: usize) -> Result<usize, PublishError> {
        if keep_count <= 1 {
            return Ok(0);
        }

        let raw = self.catalog.list(name)?;

        let mut versions = Vec::with_capacity(raw.len());
        for entry in &raw {
            match BoxVersion::parse(entry) {
                Some(version) => versions.push(version),
                None => {
                    return Err(PublishError::CatalogListParseFailed {
                        url: name.to_string(),
                        detail: format!(
                            "listed version '{}' is not a MAJOR.MINOR.PATCH version; refusing to choose deletions from an unordered listing",
                            entry
                        ),
                    });
                }
            }
        }

        let decision = RetentionDecision::compute(versions, keep_count);
        if decision.delete.is_empty() {
            return Ok(0);
        }

        self.ui.info(&format!(
            "🧹 Cleaning up old versions (keeping the newest {})",
            keep_count
        ));

        let mut attempted = 0;
        for version in &decision.delete {
            attempted += 1;
            if let Err(e) = self.catalog.delete(name, version) {
                self.ui
                    .info(&format!("⚠️  Could not delete version {}: {}", version, e));
            }
        }

        Ok(attempted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::provider::Provider;
    use crate::core::progress::ProgressObserver;
    use crate::core::ui::MemoryUi;
    use std::path::Path;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeCatalog {
        listing: Vec<String>,
        failing_deletes: Vec<String>,
        list_calls: Mutex<usize>,
        deletes: Mutex<Vec<String>>,
    }

    impl FakeCatalog {
        fn with_versions(versions: &[&str]) -> Self {
            Self {
                listing: versions.iter().map(|v| v.to_string()).collect(),
                ..Self::default()
            }
        }

        fn deleted(&self) -> Vec<String> {
            self.deletes.lock().unwrap().clone()
        }

        fn list_calls(&self) -> usize {
            *self.list_calls.lock().unwrap()
        }
    }

    impl Catalog for FakeCatalog {
        fn probe(&self, _name: &CatalogName) -> bool {
            true
        }

        fn upload(
            &self,
            _name: &CatalogName,
            _version: &BoxVersion,
            _provider: &Provider,
            _artifact: &Path,
            _observer: Box<dyn ProgressObserver>,
        ) -> Result<u16, PublishError> {
            Ok(200)
        }

        fn list(&self, _name: &CatalogName) -> Result<Vec<String>, PublishError> {
            *self.list_calls.lock().unwrap() += 1;
            Ok(self.listing.clone())
        }

        fn delete(&self, _name: &CatalogName, version: &BoxVersion) -> anyhow::Result<()> {
            let rendered = version.to_string();
            self.deletes.lock().unwrap().push(rendered.clone());
            if self.failing_deletes.contains(&rendered) {
                anyhow::bail!("connection reset by peer");
            }
            Ok(())
        }
    }

    fn name() -> CatalogName {
        CatalogName::new(Some("https://boxes.example.com"), "ubuntu_base").unwrap()
    }

    fn versions(raw: &[&str]) -> Vec<BoxVersion> {
        raw.iter().map(|v| BoxVersion::parse(v).unwrap()).collect()
    }

    #[test]
    fn test_decision_partitions_newest_first() {
        let decision =
            RetentionDecision::compute(versions(&["1.0.0", "1.1.0", "1.0.2", "1.0.1"]), 2);

        assert_eq!(decision.keep, versions(&["1.1.0", "1.0.2"]));
        assert_eq!(decision.delete, versions(&["1.0.1", "1.0.0"]));
    }

    #[test]
    fn test_decision_is_a_partition_of_the_input() {
        let input = versions(&["3.0.0", "1.0.0", "2.0.0"]);
        let decision = RetentionDecision::compute(input.clone(), 1);

        let mut reunited = decision.keep.clone();
        reunited.extend(decision.delete.clone());
        let mut sorted_input = input;
        sorted_input.sort_unstable_by(|a, b| b.cmp(a));
        assert_eq!(reunited, sorted_input);
    }

    #[test]
    fn test_decision_empty_delete_when_not_exceeding_keep_count() {
        let decision = RetentionDecision::compute(versions(&["1.0.0", "1.0.1"]), 2);
        assert!(decision.delete.is_empty());
        assert_eq!(decision.keep.len(), 2);

        let decision = RetentionDecision::compute(Vec::new(), 3);
        assert!(decision.keep.is_empty());
        assert!(decision.delete.is_empty());
    }

    #[test]
    fn test_sweep_deletes_exactly_the_smallest_versions() {
        let catalog = FakeCatalog::with_versions(&["1.0.0", "1.0.1", "1.0.2", "1.1.0"]);
        let policy = RetentionPolicy::new(&catalog, Arc::new(MemoryUi::new()));

        let attempted = policy.sweep(&name(), 2).unwrap();

        assert_eq!(attempted, 2);
        assert_eq!(catalog.deleted(), vec!["1.0.1", "1.0.0"]);
    }

    #[test]
    fn test_sweep_sorts_numerically_not_lexicographically() {
        let catalog = FakeCatalog::with_versions(&["1.9.0", "1.10.0", "1.2.0"]);
        let policy = RetentionPolicy::new(&catalog, Arc::new(MemoryUi::new()));

        policy.sweep(&name(), 2).unwrap();

        // 1.10.0 and 1.9.0 are the newest two; only 1.2.0 goes
        assert_eq!(catalog.deleted(), vec!["1.2.0"]);
    }

    #[test]
    fn test_sweep_no_deletes_when_under_keep_count() {
        let catalog = FakeCatalog::with_versions(&["1.0.0", "1.0.1"]);
        let policy = RetentionPolicy::new(&catalog, Arc::new(MemoryUi::new()));

        assert_eq!(policy.sweep(&name(), 3).unwrap(), 0);
        assert!(catalog.deleted().is_empty());
    }

    #[test]
    fn test_sweep_disabled_for_keep_count_of_one_or_less() {
        let catalog = FakeCatalog::with_versions(&["1.0.0", "1.0.1", "1.0.2"]);
        let policy = RetentionPolicy::new(&catalog, Arc::new(MemoryUi::new()));

        assert_eq!(policy.sweep(&name(), 1).unwrap(), 0);
        assert_eq!(policy.sweep(&name(), 0).unwrap(), 0);
        assert_eq!(catalog.list_calls(), 0);
        assert!(catalog.deleted().is_empty());
    }

    #[test]
    fn test_sweep_fails_loudly_on_unparsable_listing_entry() {
        let catalog = FakeCatalog::with_versions(&["1.0.0", "not-a-version", "1.0.2"]);
        let policy = RetentionPolicy::new(&catalog, Arc::new(MemoryUi::new()));

        let error = policy.sweep(&name(), 2).unwrap_err();
        assert_eq!(error.code(), "CATALOG_LIST_PARSE_FAILED");
        assert!(error.to_string().contains("not-a-version"));
        assert!(catalog.deleted().is_empty());
    }

    #[test]
    fn test_sweep_attempts_every_delete_despite_failures() {
        let mut catalog = FakeCatalog::with_versions(&["1.0.0", "1.0.1", "1.0.2", "1.0.3"]);
        catalog.failing_deletes = vec!["1.0.1".to_string()];
        let ui = Arc::new(MemoryUi::new());
        let policy = RetentionPolicy::new(&catalog, ui.clone());

        let attempted = policy.sweep(&name(), 2).unwrap();
        assert_eq!(attempted, 2);
        assert_eq!(catalog.deleted(), vec!["1.0.1", "1.0.0"]);
        assert!(
            ui.infos()
                .iter()
                .any(|m| m.contains("Could not delete version 1.0.1"))
        );
    }
}
