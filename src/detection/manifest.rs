//! Manifest discovery and loading.
//!
//! Pure file access: this module decides which files belong to which ecosystem
//! and loads them, nothing more. Interpretation lives in the family detectors.

use crate::fs::FileSystem;
use crate::layout::CONFIG_RECORD_FILE;
use std::fmt;
use std::path::Path;
use tracing::{debug, warn};

/// Ecosystem a manifest belongs to.
///
/// Families are evaluated in [`ManifestFamily::ORDER`]; a later family overwrites
/// the framework, start command and port chosen by an earlier one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ManifestFamily {
    /// Dependency-list file of the Node ecosystem
    Node,
    /// Requirement and lock files of the Python ecosystem
    Python,
    /// Build descriptors of the JVM ecosystem
    Java,
}

impl ManifestFamily {
    pub const ORDER: [ManifestFamily; 3] = [
        ManifestFamily::Node,
        ManifestFamily::Python,
        ManifestFamily::Java,
    ];

    pub fn filenames(&self) -> &'static [&'static str] {
        match self {
            ManifestFamily::Node => &["package.json"],
            ManifestFamily::Python => &["requirements.txt", "Pipfile", "pyproject.toml"],
            ManifestFamily::Java => &["pom.xml", "build.gradle", "build.gradle.kts"],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ManifestFamily::Node => "node",
            ManifestFamily::Python => "python",
            ManifestFamily::Java => "java",
        }
    }
}

impl fmt::Display for ManifestFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A manifest file found at the project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub filename: &'static str,
    pub content: String,
}

pub struct ManifestReader<'a> {
    fs: &'a dyn FileSystem,
    root: &'a Path,
}

impl<'a> ManifestReader<'a> {
    pub fn new(fs: &'a dyn FileSystem, root: &'a Path) -> Self {
        Self { fs, root }
    }

    pub fn exists(&self, filename: &str) -> bool {
        self.fs.is_file(&self.root.join(filename))
    }

    pub fn has_config_record(&self) -> bool {
        self.exists(CONFIG_RECORD_FILE)
    }

    /// Manifest filenames of `family` present at the root, in declaration order.
    pub fn present(&self, family: ManifestFamily) -> Vec<&'static str> {
        family
            .filenames()
            .iter()
            .copied()
            .filter(|name| self.exists(name))
            .collect()
    }

    /// Loads every present manifest of `family`.
    ///
    /// A file that exists but cannot be read is logged and skipped, so a family
    /// whose only manifest is unreadable does not match at all.
    pub fn read(&self, family: ManifestFamily) -> Vec<Manifest> {
        self.present(family)
            .into_iter()
            .filter_map(|filename| {
                match self.fs.read_to_string(&self.root.join(filename)) {
                    Ok(content) => {
                        debug!(manifest = filename, bytes = content.len(), "Loaded manifest");
                        Some(Manifest { filename, content })
                    }
                    Err(e) => {
                        warn!(manifest = filename, error = %e, "Failed to read manifest, skipping");
                        None
                    }
                }
            })
            .collect()
    }
}
