use serde::Serialize;
use std::fmt;

/// Package manager types we support
///
/// Variant order is detection priority: the first one found on PATH wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    Apt,
    Zypper,
    Dnf,
    Pacman,
    Brew,
}

/// One command in an update sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub program: &'static str,
    pub args: &'static [&'static str],
    /// Exit codes that count as success for this step
    pub ok_codes: &'static [i32],
}

impl Step {
    pub const fn new(program: &'static str, args: &'static [&'static str]) -> Self {
        Step {
            program,
            args,
            ok_codes: &[0],
        }
    }

    pub const fn accepting(mut self, ok_codes: &'static [i32]) -> Self {
        self.ok_codes = ok_codes;
        self
    }

    pub fn accepts(&self, exit_code: Option<i32>) -> bool {
        exit_code.is_some_and(|code| self.ok_codes.contains(&code))
    }

    pub fn command_line(&self) -> String {
        std::iter::once(self.program)
            .chain(self.args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

const APT_STEPS: &[Step] = &[
    Step::new("apt-get", &["update"]),
    Step::new(
        "env",
        &[
            "DEBIAN_FRONTEND=noninteractive",
            "apt-get",
            "upgrade",
            "-y",
            // keep local config files without asking
            "-o",
            "Dpkg::Options::=--force-confdef",
            "-o",
            "Dpkg::Options::=--force-confold",
        ],
    ),
];

const ZYPPER_STEPS: &[Step] = &[
    Step::new("zypper", &["refresh"]),
    Step::new("zypper", &["--non-interactive", "update"]),
];

// check-update exits 100 when updates are available
const DNF_STEPS: &[Step] = &[
    Step::new("dnf", &["check-update"]).accepting(&[0, 100]),
    Step::new("dnf", &["upgrade", "-y"]),
];

const PACMAN_STEPS: &[Step] = &[
    Step::new("pacman", &["-Sy"]),
    Step::new("pacman", &["-Su", "--noconfirm"]),
];

const BREW_STEPS: &[Step] = &[
    Step::new("brew", &["update"]),
    Step::new("brew", &["upgrade"]),
];

impl PackageManager {
    /// Get the binary name probed on PATH for this package manager
    pub fn binary(&self) -> &'static str {
        match self {
            PackageManager::Apt => "apt-get",
            PackageManager::Zypper => "zypper",
            PackageManager::Dnf => "dnf",
            PackageManager::Pacman => "pacman",
            PackageManager::Brew => "brew",
        }
    }

    /// Short lowercase name, also used as a metrics label
    pub fn name(&self) -> &'static str {
        match self {
            PackageManager::Apt => "apt",
            PackageManager::Zypper => "zypper",
            PackageManager::Dnf => "dnf",
            PackageManager::Pacman => "pacman",
            PackageManager::Brew => "brew",
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            PackageManager::Apt => "APT (Debian/Ubuntu)",
            PackageManager::Zypper => "Zypper (openSUSE)",
            PackageManager::Dnf => "DNF (Fedora/RHEL)",
            PackageManager::Pacman => "Pacman (Arch)",
            PackageManager::Brew => "Homebrew (macOS)",
        }
    }

    /// Operating system family this manager implies
    pub fn os_label(&self) -> &'static str {
        match self {
            PackageManager::Apt => "Debian/Ubuntu",
            PackageManager::Zypper => "openSUSE",
            PackageManager::Dnf => "Fedora/RHEL",
            PackageManager::Pacman => "Arch Linux",
            PackageManager::Brew => "macOS",
        }
    }

    /// Commands run, in order, to refresh metadata and upgrade packages
    pub fn steps(&self) -> &'static [Step] {
        match self {
            PackageManager::Apt => APT_STEPS,
            PackageManager::Zypper => ZYPPER_STEPS,
            PackageManager::Dnf => DNF_STEPS,
            PackageManager::Pacman => PACMAN_STEPS,
            PackageManager::Brew => BREW_STEPS,
        }
    }

    /// Whether the steps must run with elevated privilege
    pub fn requires_root(&self) -> bool {
        !matches!(self, PackageManager::Brew)
    }

    /// All supported package managers, in detection priority order
    pub fn all() -> [PackageManager; 5] {
        [
            PackageManager::Apt,
            PackageManager::Zypper,
            PackageManager::Dnf,
            PackageManager::Pacman,
            PackageManager::Brew,
        ]
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of looking for a package manager on the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetectionResult {
    pub manager: Option<PackageManager>,
    pub os: String,
}

impl DetectionResult {
    pub fn found(manager: PackageManager) -> Self {
        DetectionResult {
            manager: Some(manager),
            os: manager.os_label().to_string(),
        }
    }

    pub fn none() -> Self {
        DetectionResult {
            manager: None,
            os: "unknown".to_string(),
        }
    }
}

/// The step that ended a failed run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepFailure {
    pub command: String,
    /// None when the command never started or was killed by a signal
    pub exit_code: Option<i32>,
    pub status: String,
}

/// What an update run did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateOutcome {
    pub manager: PackageManager,
    pub success: bool,
    #[serde(skip)]
    pub raw_output: String,
    pub packages: Vec<String>,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<StepFailure>,
}

impl UpdateOutcome {
    pub fn new(
        manager: PackageManager,
        raw_output: String,
        packages: Vec<String>,
        failure: Option<StepFailure>,
    ) -> Self {
        UpdateOutcome {
            manager,
            success: failure.is_none(),
            raw_output,
            count: packages.len(),
            packages,
            failure,
        }
    }

    /// The failure as a reportable error, if the run failed
    pub fn error(&self) -> Option<common::UpdateError> {
        self.failure
            .as_ref()
            .map(|failure| common::UpdateError::CommandFailed {
                command: failure.command.clone(),
                status: failure.status.clone(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detection_priority_order() {
        assert_eq!(
            PackageManager::all(),
            [
                PackageManager::Apt,
                PackageManager::Zypper,
                PackageManager::Dnf,
                PackageManager::Pacman,
                PackageManager::Brew,
            ]
        );
    }

    #[test]
    fn test_only_brew_runs_unprivileged() {
        for pm in PackageManager::all() {
            assert_eq!(pm.requires_root(), pm != PackageManager::Brew, "{}", pm);
        }
    }

    #[test]
    fn test_every_manager_has_two_steps() {
        for pm in PackageManager::all() {
            assert_eq!(pm.steps().len(), 2, "{}", pm);
        }
    }

    #[test]
    fn test_dnf_check_update_accepts_exit_100() {
        let check = PackageManager::Dnf.steps()[0];
        assert!(check.accepts(Some(0)));
        assert!(check.accepts(Some(100)));
        assert!(!check.accepts(Some(1)));
        assert!(!check.accepts(None));

        let upgrade = PackageManager::Dnf.steps()[1];
        assert!(!upgrade.accepts(Some(100)));
    }

    #[test]
    fn test_command_line() {
        assert_eq!(
            PackageManager::Pacman.steps()[1].command_line(),
            "pacman -Su --noconfirm"
        );
    }

    #[test]
    fn test_apt_upgrade_keeps_existing_config_files() {
        let upgrade = PackageManager::Apt.steps()[1].command_line();
        assert!(upgrade.starts_with("env DEBIAN_FRONTEND=noninteractive apt-get upgrade -y"));
        assert!(upgrade.contains("-o Dpkg::Options::=--force-confdef"));
        assert!(upgrade.contains("-o Dpkg::Options::=--force-confold"));
    }

    #[test]
    fn test_outcome_count_follows_packages() {
        let outcome = UpdateOutcome::new(
            PackageManager::Apt,
            String::new(),
            vec!["git".into(), "curl".into()],
            None,
        );
        assert!(outcome.success);
        assert_eq!(outcome.count, 2);
        assert!(outcome.error().is_none());
    }

    #[test]
    fn test_failed_outcome_reports_command_failed() {
        let outcome = UpdateOutcome::new(
            PackageManager::Brew,
            String::new(),
            Vec::new(),
            Some(StepFailure {
                command: "brew upgrade".into(),
                exit_code: Some(1),
                status: "exit code 1".into(),
            }),
        );
        assert!(!outcome.success);
        assert!(matches!(
            outcome.error(),
            Some(common::UpdateError::CommandFailed { .. })
        ));
    }

    #[test]
    fn test_detection_none_label() {
        let none = DetectionResult::none();
        assert!(none.manager.is_none());
        assert_eq!(none.os, "unknown");
        assert_eq!(DetectionResult::found(PackageManager::Apt).os, "Debian/Ubuntu");
    }
}
