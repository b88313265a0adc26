//! Common constants used across the offdroid workspace

// Notification priorities
pub const GOTIFY_DEFAULT_PRIORITY: u8 = 5;
pub const GOTIFY_DEFAULT_URL: &str = "http://localhost:8080/message";

// Privilege escalation
pub const DEFAULT_ELEVATE_PROGRAM: &str = "sudo";

// Exit codes
pub const EXIT_COMMAND_FAILED: i32 = 1;
pub const EXIT_PERMISSION_DENIED: i32 = 2;

// How many trailing output lines to show when an update fails
pub const FAILURE_OUTPUT_TAIL_LINES: usize = 20;

// Environment variable names
pub mod env {
    // Gotify
    pub const GOTIFY_URL: &str = "GOTIFY_URL";
    pub const GOTIFY_KEY: &str = "GOTIFY_KEY";
    pub const GOTIFY_KEY_FILE: &str = "GOTIFY_KEY_FILE";

    // Update run
    pub const OFFDROID_ELEVATE: &str = "OFFDROID_ELEVATE";
    pub const OFFDROID_PATH: &str = "OFFDROID_PATH";
}
