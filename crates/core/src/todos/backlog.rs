//! Backlog document parsing.
//!
//! An entry starts at a level-four heading carrying an explicit anchor,
//! `#### Title {#anchor}`, and runs until the next heading of any level.
//! Inside an entry, `**Function:** `name`` and `**File:** `path[:line]``
//! lines are picked up, with or without a list bullet in front.

use std::sync::OnceLock;

use regex::Regex;

use crate::model::TodoEntry;

struct BacklogPatterns {
    entry_heading: Regex,
    any_heading: Regex,
    function: Regex,
    file: Regex,
}

fn patterns() -> &'static BacklogPatterns {
    static PATTERNS: OnceLock<BacklogPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| BacklogPatterns {
        entry_heading: Regex::new(r"^####\s+(?P<title>.*?)\s*\{#(?P<anchor>[^}\s]+)\}\s*$")
            .expect("entry heading pattern is valid"),
        any_heading: Regex::new(r"^#{1,6}\s").expect("heading pattern is valid"),
        function: Regex::new(r"^\s*(?:[-*+]\s+)?\*\*Function:\*\*\s*`(?P<name>[^`]+)`")
            .expect("function field pattern is valid"),
        file: Regex::new(r"^\s*(?:[-*+]\s+)?\*\*File:\*\*\s*`(?P<path>[^`]+)`")
            .expect("file field pattern is valid"),
    })
}

/// Split `path:line` into its parts. A suffix that is not a number stays in the path.
fn split_file_ref(raw: &str) -> (String, Option<usize>) {
    let raw = raw.trim();
    if let Some((path, line)) = raw.rsplit_once(':') {
        if let Ok(line) = line.parse::<usize>() {
            return (path.to_string(), Some(line));
        }
    }
    (raw.to_string(), None)
}

/// Parse every anchored entry of a backlog document, in document order.
pub fn parse_backlog(text: &str) -> Vec<TodoEntry> {
    let p = patterns();
    let mut entries: Vec<TodoEntry> = Vec::new();
    let mut open = false;

    for (idx, line) in text.lines().enumerate() {
        if let Some(caps) = p.entry_heading.captures(line) {
            entries.push(TodoEntry {
                anchor: caps["anchor"].to_string(),
                title: caps["title"].to_string(),
                line: idx + 1,
                function: None,
                file: None,
                file_line: None,
            });
            open = true;
            continue;
        }
        if p.any_heading.is_match(line) {
            open = false;
            continue;
        }
        if !open {
            continue;
        }
        let Some(entry) = entries.last_mut() else {
            continue;
        };
        if let Some(caps) = p.function.captures(line) {
            let name = caps["name"].trim().trim_end_matches("()").to_string();
            entry.function.get_or_insert(name);
        } else if let Some(caps) = p.file.captures(line) {
            let (path, file_line) = split_file_ref(&caps["path"]);
            if entry.file.is_none() {
                entry.file = Some(path);
                entry.file_line = file_line;
            }
        }
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_reference_with_line_is_split() {
        assert_eq!(split_file_ref("src/a.js:42"), ("src/a.js".to_string(), Some(42)));
        assert_eq!(split_file_ref("src/a.js"), ("src/a.js".to_string(), None));
        assert_eq!(split_file_ref("C:dir"), ("C:dir".to_string(), None));
    }

    #[test]
    fn fields_after_a_plain_heading_are_ignored() {
        let text = "#### Retry {#retry}\n\n## Notes\n**Function:** `later`\n";
        let entries = parse_backlog(text);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].function, None);
    }
}
