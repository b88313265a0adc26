use std::sync::LazyLock;

use regex::Regex;

// Inst curl [7.81.0-1ubuntu1.14] (7.81.0-1ubuntu1.15 Ubuntu:22.04/jammy-updates [amd64])
// Unpacking git (1:2.34.1-1ubuntu1.11) over (1:2.34.1-1ubuntu1.10) ...
// Setting up libc6:amd64 (2.35-0ubuntu3.6) ...
static APT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:Inst|Unpacking|Upgraded|Setting up)\s+([A-Za-z0-9][A-Za-z0-9+.\-]*)")
        .expect("valid apt regex")
});

/// Package names from `apt-get upgrade` output, in order of appearance
pub fn package_names(output: &str) -> Vec<String> {
    output
        .lines()
        .filter_map(|line| APT_LINE.captures(line.trim_start()))
        .map(|caps| caps[1].to_string())
        .collect()
}
