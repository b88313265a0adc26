use std::sync::LazyLock;

use regex::Regex;

// ==> Upgrading 3 outdated packages:
// ==> Upgrading 2 dependents of upgraded formulae:
static LIST_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^==> Upgrading \d+ (?:outdated|dependents?)\b").expect("valid brew regex")
});

// ==> Upgrading git
static SINGLE_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^==> Upgrading (\S+)").expect("valid brew regex"));

// git 2.42.0 -> 2.43.0
static LIST_ENTRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\S+)\s+\S+\s+->\s+\S+").expect("valid brew regex"));

/// Package names from `brew upgrade` output, in order of appearance
pub fn package_names(output: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut in_list = false;

    for line in output.lines() {
        if LIST_HEADER.is_match(line) {
            in_list = true;
            continue;
        }

        if line.starts_with("==>") {
            in_list = false;
            if let Some(caps) = SINGLE_HEADER.captures(line) {
                let name = &caps[1];
                if !name.chars().all(|c| c.is_ascii_digit()) {
                    names.push(name.to_string());
                }
            }
            continue;
        }

        if in_list {
            // Dependents come comma separated on one line; hint lines
            // ("Disable this behaviour by ...") have no version arrow.
            names.extend(
                line.split(", ")
                    .filter_map(|entry| LIST_ENTRY.captures(entry.trim()))
                    .map(|caps| caps[1].to_string()),
            );
        }
    }

    names
}
