//! Extract changed package names from package manager update logs
//!
//! Each manager gets its own line rules. Unmatched lines are ignored, so
//! the worst case for unexpected output is an empty list.

mod apt;
mod brew;
mod dnf;
mod pacman;
mod zypper;

use std::collections::HashSet;

use crate::types::PackageManager;

/// Parse the combined output of an update run into package names
///
/// Names are deduplicated, keeping the position of their first appearance.
pub fn parse(pm: PackageManager, output: &str) -> Vec<String> {
    let names = match pm {
        PackageManager::Apt => apt::package_names(output),
        PackageManager::Zypper => zypper::package_names(output),
        PackageManager::Dnf => dnf::package_names(output),
        PackageManager::Pacman => pacman::package_names(output),
        PackageManager::Brew => brew::package_names(output),
    };

    dedup_in_order(names)
}

fn dedup_in_order(names: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    names
        .into_iter()
        .filter(|name| seen.insert(name.clone()))
        .collect()
}

const RPM_ARCHES: &[&str] = &[
    "x86_64", "i686", "i586", "noarch", "aarch64", "armv7hl", "ppc64le", "s390x",
];

/// Strip version, release and arch from an RPM style package id
///
/// `vim-enhanced-2:9.0.2120-1.fc39.x86_64` -> `vim-enhanced`
fn strip_nevra(nevra: &str) -> String {
    let without_arch = match nevra.rsplit_once('.') {
        Some((rest, arch)) if RPM_ARCHES.contains(&arch) => rest,
        _ => nevra,
    };

    // name-version-release; the name itself may contain dashes
    let mut parts = without_arch.rsplitn(3, '-');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(_release), Some(_version), Some(name)) if !name.is_empty() => name.to_string(),
        _ => without_arch.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const APT_LOG: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/apt_upgrade.log"));
    const DNF_LOG: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/dnf_upgrade.log"));
    const ZYPPER_LOG: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/zypper_update.log"));
    const PACMAN_LOG: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/pacman_upgrade.log"));
    const BREW_LOG: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/brew_upgrade.log"));

    fn golden() -> Vec<(PackageManager, &'static str, Vec<&'static str>)> {
        vec![
            (
                PackageManager::Apt,
                APT_LOG,
                vec!["git-man", "git", "libcurl4", "curl", "libc6", "tzdata"],
            ),
            (
                PackageManager::Dnf,
                DNF_LOG,
                vec!["curl", "git", "kernel-modules-extra", "libcurl", "git-core"],
            ),
            (
                PackageManager::Zypper,
                ZYPPER_LOG,
                vec!["curl", "git", "libcurl4", "kernel-default"],
            ),
            (
                PackageManager::Pacman,
                PACMAN_LOG,
                vec!["curl", "linux", "python-requests"],
            ),
            (
                PackageManager::Brew,
                BREW_LOG,
                vec!["git", "python@3.12", "wget", "gh", "libgit2"],
            ),
        ]
    }

    #[test]
    fn test_golden_logs() {
        for (pm, log, expected) in golden() {
            assert_eq!(parse(pm, log), expected, "golden log for {}", pm);
        }
    }

    #[test]
    fn test_parse_is_idempotent() {
        for (pm, log, _) in golden() {
            assert_eq!(parse(pm, log), parse(pm, log), "{}", pm);
        }
    }

    #[test]
    fn test_empty_output_yields_nothing() {
        for pm in PackageManager::all() {
            assert!(parse(pm, "").is_empty(), "{}", pm);
        }
    }

    #[test]
    fn test_unrelated_output_yields_nothing() {
        let noise = "Hit:1 http://archive.ubuntu.com/ubuntu jammy InRelease\n\
                     Reading package lists... Done\n\
                     0 upgraded, 0 newly installed, 0 to remove and 0 not upgraded.\n\
                     there is nothing to do\n\
                     Nothing to do.\n\
                     Complete!\n";
        for pm in PackageManager::all() {
            assert!(parse(pm, noise).is_empty(), "{}", pm);
        }
    }

    #[test]
    fn test_dedup_keeps_first_position() {
        let names = vec!["b", "a", "b", "c", "a"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(dedup_in_order(names), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_strip_nevra() {
        assert_eq!(strip_nevra("curl-8.2.1-3.fc39.x86_64"), "curl");
        assert_eq!(strip_nevra("vim-enhanced-2:9.0.2120-1.fc39.x86_64"), "vim-enhanced");
        assert_eq!(strip_nevra("kernel-default-6.6.1-1.1.x86_64"), "kernel-default");
        assert_eq!(strip_nevra("python3-pip-23.2.1-1.fc39.noarch"), "python3-pip");
        assert_eq!(strip_nevra("tzdata-2024a-1.1"), "tzdata");
        assert_eq!(strip_nevra("curl"), "curl");
    }
}
