use std::sync::LazyLock;

use regex::Regex;

use super::strip_nevra;

// The following 3 packages are going to be upgraded:
// The following NEW package is going to be installed:
static BLOCK_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^The following (?:\d+ )?(?:NEW )?packages? (?:is|are) going to be (?:upgraded|installed|downgraded|reinstalled):",
    )
    .expect("valid zypper regex")
});

// (1/3) Installing: curl-8.5.0-1.1.x86_64 ...........................[done]
static PROGRESS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\(\s*\d+/\d+\)\s+Installing:\s+(\S+)").expect("valid zypper regex")
});

/// Package names from `zypper update` output, in order of appearance
pub fn package_names(output: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut in_block = false;

    for line in output.lines() {
        if BLOCK_HEADER.is_match(line) {
            in_block = true;
            continue;
        }

        if let Some(caps) = PROGRESS.captures(line) {
            names.push(strip_nevra(caps[1].trim_end_matches('.')));
            continue;
        }

        if line.trim().is_empty() || !line.starts_with(char::is_whitespace) {
            in_block = false;
            continue;
        }

        if in_block {
            names.extend(line.split_whitespace().map(str::to_string));
        }
    }

    names
}
