use std::ffi::OsStr;

use tracing::{debug, info};

use crate::types::{DetectionResult, PackageManager};

/// Detect which package manager is available on this host
pub fn detect() -> DetectionResult {
    detect_with(|binary| which::which(binary).is_ok())
}

/// Detect using an explicit search path instead of `PATH`
pub fn detect_in<P: AsRef<OsStr>>(search_path: P) -> DetectionResult {
    let search_path = search_path.as_ref();
    let cwd = std::env::current_dir().unwrap_or_default();
    detect_with(|binary| which::which_in(binary, Some(search_path), &cwd).is_ok())
}

/// Detect with a custom probe that answers "does this binary exist?"
///
/// Candidates are probed in priority order and the first hit wins.
pub fn detect_with<F>(probe: F) -> DetectionResult
where
    F: Fn(&str) -> bool,
{
    for pm in PackageManager::all() {
        if probe(pm.binary()) {
            info!("Detected package manager: {:?}", pm);
            return DetectionResult::found(pm);
        }
        debug!("{} not found", pm.binary());
    }

    DetectionResult::none()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_none() {
        let result = detect_with(|_| false);
        assert_eq!(result, DetectionResult::none());
    }

    #[test]
    fn test_detect_single_manager() {
        for pm in PackageManager::all() {
            let result = detect_with(|binary| binary == pm.binary());
            assert_eq!(result.manager, Some(pm));
            assert_eq!(result.os, pm.os_label());
        }
    }

    #[test]
    fn test_detect_prefers_higher_priority() {
        let result = detect_with(|binary| binary == "pacman" || binary == "dnf" || binary == "brew");
        assert_eq!(result.manager, Some(PackageManager::Dnf));

        let result = detect_with(|binary| binary == "brew" || binary == "zypper");
        assert_eq!(result.manager, Some(PackageManager::Zypper));

        let result = detect_with(|_| true);
        assert_eq!(result.manager, Some(PackageManager::Apt));
    }

    #[cfg(unix)]
    mod search_path {
        use super::*;
        use std::fs;
        use std::os::unix::fs::PermissionsExt;
        use std::path::Path;

        fn fake_binary(dir: &Path, name: &str) {
            let path = dir.join(name);
            fs::write(&path, "#!/bin/sh\nexit 0\n").unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        }

        #[test]
        fn test_detect_in_empty_dir() {
            let dir = tempfile::tempdir().unwrap();
            let result = detect_in(dir.path());
            assert!(result.manager.is_none());
        }

        #[test]
        fn test_detect_in_finds_binary() {
            let dir = tempfile::tempdir().unwrap();
            fake_binary(dir.path(), "pacman");

            let result = detect_in(dir.path());
            assert_eq!(result.manager, Some(PackageManager::Pacman));
            assert_eq!(result.os, "Arch Linux");
        }

        #[test]
        fn test_detect_in_ignores_non_executable() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("zypper");
            fs::write(&path, "not a program").unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

            assert!(detect_in(dir.path()).manager.is_none());
        }

        #[test]
        fn test_detect_in_priority_across_dirs() {
            let first = tempfile::tempdir().unwrap();
            let second = tempfile::tempdir().unwrap();
            fake_binary(first.path(), "brew");
            fake_binary(second.path(), "apt-get");

            let joined = std::env::join_paths([first.path(), second.path()]).unwrap();
            let result = detect_in(&joined);
            assert_eq!(result.manager, Some(PackageManager::Apt));
        }
    }
}
