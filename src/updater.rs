use std::path::Path;
use std::time::Instant;

use common::error::{Result, UpdateError};
use common::metrics::{record_command_step, record_operation_duration, record_update_run};
use common::LocalExecutor;
use tracing::{debug, info, warn};

use crate::parsers;
use crate::types::{PackageManager, Step, StepFailure, UpdateOutcome};

// Messages sudo/doas print when they refuse to elevate. Only lines that
// carry the escalation program's "<prog>:" prefix are considered, so a
// package manager's own "authentication failed" never matches.
const AUTH_REJECTIONS: &[&str] = &[
    "is not in the sudoers file",
    "a password is required",
    "incorrect password attempt",
    "not allowed to execute",
    "authentication failed",
    "authentication failure",
];

/// Runs a package manager's update sequence on the local host
pub struct Updater {
    executor: LocalExecutor,
    elevate: Option<String>,
    is_root: bool,
}

impl Updater {
    /// `elevate` is the privilege escalation program (e.g. `sudo`);
    /// `None` or an empty string runs every command directly.
    pub fn new(executor: LocalExecutor, elevate: Option<String>) -> Self {
        Updater {
            executor,
            elevate: elevate.filter(|prog| !prog.trim().is_empty()),
            is_root: effective_user_is_root(),
        }
    }

    /// Override the effective-user check
    pub fn running_as_root(mut self, is_root: bool) -> Self {
        self.is_root = is_root;
        self
    }

    /// Update all packages with the given manager
    ///
    /// A failing command does not make this an `Err`: the outcome is marked
    /// failed and still carries the packages parsed so far. Only a refused
    /// privilege escalation is returned as an error.
    pub async fn run_update(&self, pm: PackageManager) -> Result<UpdateOutcome> {
        let elevate = self.elevation_for(pm)?;
        self.run_steps(pm, pm.steps(), elevate.as_deref()).await
    }

    /// Decide which escalation program, if any, prefixes this manager's commands
    pub fn elevation_for(&self, pm: PackageManager) -> Result<Option<String>> {
        if !pm.requires_root() {
            return Ok(None);
        }
        let Some(program) = &self.elevate else {
            return Ok(None);
        };
        if self.is_root {
            debug!("Already running as root; not using {}", program);
            return Ok(None);
        }
        if which::which(program).is_err() {
            return Err(UpdateError::PermissionDenied {
                message: format!(
                    "{} needs elevated privilege but `{}` was not found",
                    pm.name(),
                    program
                ),
            });
        }
        Ok(Some(program.clone()))
    }

    /// Run `steps` in order, stopping at the first one whose exit code is not accepted
    pub async fn run_steps(
        &self,
        pm: PackageManager,
        steps: &[Step],
        elevate: Option<&str>,
    ) -> Result<UpdateOutcome> {
        let started = Instant::now();
        let mut raw_output = String::new();
        let mut failure = None;

        for step in steps {
            let (program, args) = argv(step, elevate);
            let command = command_line(step, elevate);
            info!("Running: {}", command);

            match self.executor.execute_command(program, &args).await {
                Ok(result) => {
                    raw_output.push_str(&result.output);
                    let ok = step.accepts(result.exit_code);
                    record_command_step(pm.name(), step.program, ok);

                    if ok {
                        continue;
                    }

                    if let Some(program) = elevate {
                        if let Some(line) = auth_rejection(&result.output, program) {
                            return Err(UpdateError::PermissionDenied {
                                message: line.to_string(),
                            });
                        }
                    }

                    warn!("`{}` failed with {}", command, result.status_text());
                    failure = Some(StepFailure {
                        command,
                        exit_code: result.exit_code,
                        status: result.status_text(),
                    });
                    break;
                }
                Err(e) => {
                    record_command_step(pm.name(), step.program, false);
                    warn!("`{}` could not run: {}", command, e);
                    raw_output.push_str(&format!("{}\n", e));
                    failure = Some(StepFailure {
                        command,
                        exit_code: None,
                        status: e.to_string(),
                    });
                    break;
                }
            }
        }

        let packages = parsers::parse(pm, &raw_output);
        let outcome = UpdateOutcome::new(pm, raw_output, packages, failure);

        info!(
            "{} update finished: success={} packages={}",
            pm, outcome.success, outcome.count
        );
        record_update_run(pm.name(), outcome.success, outcome.count);
        record_operation_duration("offdroid", "update", started.elapsed().as_secs_f64());

        Ok(outcome)
    }
}

/// Command lines a run would execute, for `--dry-run`
pub fn plan(pm: PackageManager, elevate: Option<&str>) -> Vec<String> {
    pm.steps()
        .iter()
        .map(|step| command_line(step, elevate))
        .collect()
}

fn argv<'a>(step: &'a Step, elevate: Option<&'a str>) -> (&'a str, Vec<&'a str>) {
    match elevate {
        Some(program) => {
            let mut args = Vec::with_capacity(step.args.len() + 1);
            args.push(step.program);
            args.extend_from_slice(step.args);
            (program, args)
        }
        None => (step.program, step.args.to_vec()),
    }
}

fn command_line(step: &Step, elevate: Option<&str>) -> String {
    match elevate {
        Some(program) => format!("{} {}", program, step.command_line()),
        None => step.command_line(),
    }
}

fn auth_rejection<'a>(output: &'a str, program: &str) -> Option<&'a str> {
    let name = Path::new(program)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(program);
    let prefix = format!("{}:", name);

    output.lines().map(str::trim).find(|line| {
        if !line.starts_with(&prefix) {
            return false;
        }
        let lower = line.to_lowercase();
        AUTH_REJECTIONS.iter().any(|needle| lower.contains(needle))
    })
}

#[cfg(unix)]
fn effective_user_is_root() -> bool {
    nix::unistd::Uid::effective().is_root()
}

#[cfg(not(unix))]
fn effective_user_is_root() -> bool {
    false
}
