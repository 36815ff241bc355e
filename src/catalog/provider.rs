//! Provider - canonical virtualization-provider tokens
//!
//! The catalog keys artifact variants by provider, so raw provider names
//! coming from the host side have to be normalized into the canonical
//! tokens the catalog understands. The mapping is an explicit table with a
//! pass-through branch for unknown providers, not ad hoc substring checks;
//! the only family rule is that every VMware desktop flavor collapses to
//! `vmware_desktop`.

use std::fmt;

/// Canonical catalog provider identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Provider {
    VirtualBox,
    /// The whole VMware desktop family (Fusion, Workstation, Player)
    VmwareDesktop,
    HyperV,
    Libvirt,
    Parallels,
    Docker,
    /// Unrecognized provider, passed through to the catalog unchanged
    Other(String),
}

/// Exact raw-identifier aliases for the known providers
const ALIASES: &[(&str, Provider)] = &[
    ("virtualbox", Provider::VirtualBox),
    ("vmware", Provider::VmwareDesktop),
    ("vmware_desktop", Provider::VmwareDesktop),
    ("vmware_fusion", Provider::VmwareDesktop),
    ("vmware_workstation", Provider::VmwareDesktop),
    ("vmware_player", Provider::VmwareDesktop),
    ("hyperv", Provider::HyperV),
    ("libvirt", Provider::Libvirt),
    ("parallels", Provider::Parallels),
    ("docker", Provider::Docker),
];

impl Provider {
    /// Normalize an externally supplied raw provider name
    ///
    /// # Example
    ///
    /// ```
    /// use box_publisher::catalog::Provider;
    ///
    /// assert_eq!(Provider::from_raw("vmware_fusion"), Provider::VmwareDesktop);
    /// assert_eq!(Provider::from_raw("virtualbox"), Provider::VirtualBox);
    /// assert_eq!(
    ///     Provider::from_raw("qemu"),
    ///     Provider::Other("qemu".to_string())
    /// );
    /// ```
    pub fn from_raw(raw: &str) -> Self {
        let trimmed = raw.trim();
        let normalized = trimmed.to_ascii_lowercase();

        for (alias, provider) in ALIASES {
            if normalized == *alias {
                return provider.clone();
            }
        }

        // Family rule: any VMware variant not in the alias table still
        // belongs to the desktop family.
        if normalized.contains("vmware") {
            return Provider::VmwareDesktop;
        }

        Provider::Other(trimmed.to_string())
    }

    /// Canonical token used in catalog URLs
    pub fn as_str(&self) -> &str {
        match self {
            Provider::VirtualBox => "virtualbox",
            Provider::VmwareDesktop => "vmware_desktop",
            Provider::HyperV => "hyperv",
            Provider::Libvirt => "libvirt",
            Provider::Parallels => "parallels",
            Provider::Docker => "docker",
            Provider::Other(raw) => raw,
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_providers_map_to_themselves() {
        assert_eq!(Provider::from_raw("virtualbox"), Provider::VirtualBox);
        assert_eq!(Provider::from_raw("hyperv"), Provider::HyperV);
        assert_eq!(Provider::from_raw("libvirt"), Provider::Libvirt);
        assert_eq!(Provider::from_raw("parallels"), Provider::Parallels);
        assert_eq!(Provider::from_raw("docker"), Provider::Docker);
    }

    #[test]
    fn test_vmware_family_collapses_to_desktop() {
        for raw in [
            "vmware",
            "vmware_desktop",
            "vmware_fusion",
            "vmware_workstation",
            "vmware_player",
            "vmware_esxi",
        ] {
            assert_eq!(
                Provider::from_raw(raw),
                Provider::VmwareDesktop,
                "raw = {:?}",
                raw
            );
        }
        assert_eq!(Provider::from_raw("vmware_fusion").as_str(), "vmware_desktop");
    }

    #[test]
    fn test_matching_ignores_case_and_surrounding_whitespace() {
        assert_eq!(Provider::from_raw("VirtualBox"), Provider::VirtualBox);
        assert_eq!(Provider::from_raw("  VMware_Fusion "), Provider::VmwareDesktop);
    }

    #[test]
    fn test_unknown_providers_pass_through_unchanged() {
        assert_eq!(
            Provider::from_raw("qemu"),
            Provider::Other("qemu".to_string())
        );
        assert_eq!(Provider::from_raw("qemu").as_str(), "qemu");
    }

    #[test]
    fn test_display_uses_canonical_token() {
        assert_eq!(Provider::from_raw("vmware").to_string(), "vmware_desktop");
    }
}
