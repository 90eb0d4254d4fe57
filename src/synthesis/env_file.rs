//! Line-oriented `.env` merging

use super::connection::{DB_HOST, DB_NAME, DB_PASSWORD, DB_USER};
use regex::Regex;
use std::sync::OnceLock;

/// What to do when a key is already defined in the existing file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergePolicy {
    /// Replace the existing value; used for infra defaults that must point at the containers
    AlwaysOverwrite,
    /// Leave an existing definition untouched
    SetIfAbsent,
}

impl MergePolicy {
    pub fn for_key(key: &str) -> Self {
        match key {
            DB_HOST | DB_USER | DB_PASSWORD | DB_NAME => MergePolicy::AlwaysOverwrite,
            _ => MergePolicy::SetIfAbsent,
        }
    }
}

/// Result of merging computed variables into existing content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvMerge {
    pub content: String,
    pub appended: Vec<String>,
    pub overwritten: Vec<String>,
}

impl EnvMerge {
    pub fn is_noop(&self) -> bool {
        self.appended.is_empty() && self.overwritten.is_empty()
    }
}

fn key_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\s*(export\s+)?([A-Za-z_][A-Za-z0-9_]*)\s*=").expect("valid regex")
    })
}

/// Key defined by `line`, if any, along with whether it was exported.
fn parse_key(line: &str) -> Option<(&str, bool)> {
    let caps = key_pattern().captures(line)?;
    let key = caps.get(2)?.as_str();
    Some((key, caps.get(1).is_some()))
}

/// Merges `vars` into `existing` without ever deleting a line.
///
/// Empty values are skipped entirely. Existing definitions are replaced only
/// for keys whose policy is [`MergePolicy::AlwaysOverwrite`], and only when the
/// value actually differs. A file using CRLF line endings keeps them.
pub fn merge<'k, 'v, I>(existing: &str, vars: I) -> EnvMerge
where
    I: IntoIterator<Item = (&'k str, &'v str)>,
{
    let newline = if existing.contains("\r\n") { "\r\n" } else { "\n" };
    let mut lines: Vec<String> = existing.lines().map(str::to_string).collect();
    let mut appended = Vec::new();
    let mut overwritten = Vec::new();

    for (key, value) in vars {
        if value.is_empty() {
            continue;
        }

        let position = lines
            .iter()
            .position(|line| parse_key(line).map(|(k, _)| k) == Some(key));

        match position {
            Some(index) => {
                if MergePolicy::for_key(key) != MergePolicy::AlwaysOverwrite {
                    continue;
                }
                let exported = parse_key(&lines[index]).map(|(_, e)| e).unwrap_or(false);
                let replacement = if exported {
                    format!("export {}={}", key, value)
                } else {
                    format!("{}={}", key, value)
                };
                if lines[index] != replacement {
                    lines[index] = replacement;
                    overwritten.push(key.to_string());
                }
            }
            None => {
                lines.push(format!("{}={}", key, value));
                appended.push(key.to_string());
            }
        }
    }

    let mut content = lines.join(newline);
    if !content.is_empty() {
        content.push_str(newline);
    }

    EnvMerge {
        content,
        appended,
        overwritten,
    }
}
