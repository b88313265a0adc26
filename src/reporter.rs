use common::constants::FAILURE_OUTPUT_TAIL_LINES;
use serde::Serialize;

use crate::types::{DetectionResult, PackageManager, UpdateOutcome};

const RULE: &str = "==================================================";

pub fn banner() -> &'static str {
    r#"
╔═══════════════════════════════════════════════╗
║                                               ║
║     ╔═╗╔═╗╔═╗╔╦╗╦═╗╔═╗╦╔╦╗                    ║
║     ║ ║╠╣ ╠╣  ║║╠╦╝║ ║║ ║║                    ║
║     ╚═╝╚  ╚   ╩╝╩╚═╚═╝╩═╩╝                    ║
║                                               ║
║   Cross-Platform Update Manager               ║
║                                               ║
╚═══════════════════════════════════════════════╝
"#
}

/// Greeting printed before the update starts
pub fn start_message(pm: PackageManager) -> String {
    match pm {
        PackageManager::Zypper => "Oh, an openSUSE user. Starting zypper update...".to_string(),
        PackageManager::Pacman => "Oh, an Arch user. Starting pacman update...".to_string(),
        PackageManager::Brew => "Oh, a Mac user. Starting brew update...".to_string(),
        _ => format!("Starting {} update...", pm),
    }
}

/// One-line summary, used as the notification title
pub fn summary(outcome: &UpdateOutcome) -> String {
    if outcome.success {
        format!("✅ {} update installed {} packages", outcome.manager, outcome.count)
    } else {
        format!("❌ {} update failed", outcome.manager)
    }
}

/// Render an outcome as a human readable report
pub fn render(outcome: &UpdateOutcome) -> String {
    let mut lines = Vec::new();

    if outcome.success {
        lines.push("✅ Updates were successfully installed!".to_string());
    } else {
        lines.push("❌ There was a problem installing the updates.".to_string());
        if let Some(failure) = &outcome.failure {
            lines.push(format!("   Command: {}", failure.command));
            lines.push(format!("   Status:  {}", failure.status));
        }
    }

    lines.push(String::new());
    if outcome.packages.is_empty() {
        if outcome.success {
            lines.push("ℹ️  No packages were updated (system might be already up-to-date)".to_string());
        } else {
            lines.push("ℹ️  No updated packages were recognized in the output".to_string());
        }
    } else {
        lines.push(format!("📦 Updated packages ({}):", outcome.count));
        lines.push(RULE.to_string());
        for pkg in &outcome.packages {
            lines.push(format!("  • {}", pkg));
        }
        lines.push(RULE.to_string());
    }

    if !outcome.success {
        let tail = output_tail(&outcome.raw_output, FAILURE_OUTPUT_TAIL_LINES);
        if !tail.is_empty() {
            lines.push(String::new());
            lines.push("Last output:".to_string());
            lines.extend(tail.into_iter().map(|line| format!("  | {}", line)));
        }
    }

    lines.join("\n")
}

/// Render an outcome as pretty JSON
pub fn render_json(outcome: &UpdateOutcome) -> serde_json::Result<String> {
    serde_json::to_string_pretty(outcome)
}

/// Render a detection that found nothing, for `--json`
pub fn render_detection_json(detection: &DetectionResult) -> serde_json::Result<String> {
    serde_json::to_string_pretty(detection)
}

#[derive(Serialize)]
struct DryRun<'a> {
    manager: PackageManager,
    dry_run: bool,
    commands: &'a [String],
}

/// Render a `--dry-run` plan as JSON
pub fn render_plan_json(pm: PackageManager, commands: &[String]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&DryRun {
        manager: pm,
        dry_run: true,
        commands,
    })
}

fn output_tail(output: &str, max_lines: usize) -> Vec<&str> {
    let lines: Vec<&str> = output.lines().filter(|l| !l.trim().is_empty()).collect();
    let skip = lines.len().saturating_sub(max_lines);
    lines[skip..].to_vec()
}
