use std::sync::LazyLock;

use regex::Regex;

use super::strip_nevra;

//   Upgrading        : curl-8.2.1-3.fc39.x86_64                          1/4
static PROGRESS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:Upgrading|Installing|Reinstalling)\s+:\s+(\S+)").expect("valid dnf regex")
});

#[derive(Clone, Copy, PartialEq)]
enum Block {
    None,
    /// "Upgrading:" / "Installing:" table, package name in the first column
    Table,
    /// "Upgraded:" / "Installed:" list of full package ids
    Result,
}

fn block_header(line: &str) -> Option<Block> {
    if line.starts_with(char::is_whitespace) || !line.trim_end().ends_with(':') {
        return None;
    }
    if line.starts_with("Upgrading") || line.starts_with("Installing") {
        Some(Block::Table)
    } else if line.starts_with("Upgraded") || line.starts_with("Installed") {
        Some(Block::Result)
    } else {
        None
    }
}

/// Package names from `dnf upgrade` output, in order of appearance
pub fn package_names(output: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut block = Block::None;

    for line in output.lines() {
        if line.trim().is_empty() {
            block = Block::None;
            continue;
        }

        if let Some(caps) = PROGRESS.captures(line) {
            names.push(strip_nevra(&caps[1]));
            continue;
        }

        if let Some(header) = block_header(line) {
            block = header;
            continue;
        }

        if !line.starts_with(' ') {
            block = Block::None;
            continue;
        }

        match block {
            // Rows start with a single space; deeper indents are wrapped
            // columns or "replacing" lines.
            Block::Table if !line[1..].starts_with(char::is_whitespace) => {
                if let Some(name) = line.split_whitespace().next() {
                    names.push(name.to_string());
                }
            }
            Block::Result => {
                names.extend(line.split_whitespace().map(strip_nevra));
            }
            _ => {}
        }
    }

    names
}
