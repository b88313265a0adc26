use std::sync::LazyLock;

use regex::Regex;

// (1/3) upgrading curl                        [######################] 100%
static UPGRADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bupgrading\s+([A-Za-z0-9@_+][A-Za-z0-9@._+\-]*)")
        .expect("valid pacman regex")
});

/// Package names from `pacman -Su` output, in order of appearance
pub fn package_names(output: &str) -> Vec<String> {
    output
        .lines()
        .filter_map(|line| UPGRADING.captures(line))
        // non-tty runs print "upgrading curl..."
        .map(|caps| caps[1].trim_end_matches('.').to_string())
        .filter(|name| !name.is_empty())
        .collect()
}
