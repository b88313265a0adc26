/// Metrics infrastructure for tracking update runs
///
/// Recording is a no-op until a recorder is installed, so callers can
/// record unconditionally.

use metrics::{counter, gauge, histogram};

/// Record operation execution time
pub fn record_operation_duration(service: &str, operation: &str, duration_secs: f64) {
    let labels = [
        ("service", service.to_string()),
        ("operation", operation.to_string()),
    ];

    histogram!("operation_duration_seconds", &labels).record(duration_secs);
}

/// Record the result of a single command in an update sequence
pub fn record_command_step(manager: &str, program: &str, success: bool) {
    let labels = [
        ("manager", manager.to_string()),
        ("program", program.to_string()),
        ("status", if success { "success" } else { "failure" }.to_string()),
    ];

    counter!("update_steps_total", &labels).increment(1);
}

/// Record a finished update run and how many packages it changed
pub fn record_update_run(manager: &str, success: bool, packages_changed: usize) {
    let labels = [
        ("manager", manager.to_string()),
        ("status", if success { "success" } else { "failure" }.to_string()),
    ];

    counter!("update_runs_total", &labels).increment(1);

    let pm_labels = [("manager", manager.to_string())];
    gauge!("packages_changed", &pm_labels).set(packages_changed as f64);
}

/// Record a notification send attempt
pub fn record_notification_sent(backend: &str, success: bool) {
    let labels = [
        ("backend", backend.to_string()),
        ("status", if success { "success" } else { "failure" }.to_string()),
    ];

    counter!("notifications_sent_total", &labels).increment(1);
}
