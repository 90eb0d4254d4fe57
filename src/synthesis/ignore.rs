//! Build-context ignore list

use crate::layout::{ProjectLayout, INITDB_DIR};

const IGNORED: &[&str] = &[
    "node_modules",
    ".git",
    "__pycache__",
    "*.pyc",
    ".venv",
    "venv",
    "target",
    "build",
    ".gradle",
];

pub fn render(layout: &ProjectLayout) -> String {
    let mut out = String::from("# Generated by stackup\n");
    for entry in IGNORED {
        out.push_str(entry);
        out.push('\n');
    }
    out.push_str(&layout.context_relative(INITDB_DIR));
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ignore_entries() {
        let content = render(&ProjectLayout::new("/project"));
        let entries: Vec<_> = content.lines().filter(|l| !l.starts_with('#')).collect();

        assert!(entries.contains(&"node_modules"));
        assert!(entries.contains(&".git"));
        assert!(entries.contains(&"*.pyc"));
        assert_eq!(entries.last(), Some(&".stackup/initdb"));
    }
}
