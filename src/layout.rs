//! Where generated artifacts live relative to a project root

use std::path::{Path, PathBuf};

pub const DEFAULT_OUTPUT_DIR: &str = ".stackup";
pub const CONFIG_RECORD_FILE: &str = ".stackup.json";
pub const ENV_FILE: &str = ".env";
pub const IGNORE_FILE: &str = ".dockerignore";
pub const DOCKERFILE: &str = "Dockerfile";
pub const COMPOSE_FILE: &str = "docker-compose.yml";
pub const SHIM_DIR: &str = "shim";
pub const INITDB_DIR: &str = "initdb";

/// Resolves artifact paths for one project.
///
/// The config record, env file and ignore list sit at the project root; the
/// build recipe, compose manifest and shims live in the output subdirectory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    root: PathBuf,
    output_dir_name: String,
}

impl ProjectLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_output_dir(root, DEFAULT_OUTPUT_DIR)
    }

    pub fn with_output_dir(root: impl Into<PathBuf>, output_dir_name: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            output_dir_name: output_dir_name.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn output_dir_name(&self) -> &str {
        &self.output_dir_name
    }

    pub fn output_dir(&self) -> PathBuf {
        self.root.join(&self.output_dir_name)
    }

    pub fn config_record(&self) -> PathBuf {
        self.root.join(CONFIG_RECORD_FILE)
    }

    pub fn env_file(&self) -> PathBuf {
        self.root.join(ENV_FILE)
    }

    pub fn ignore_file(&self) -> PathBuf {
        self.root.join(IGNORE_FILE)
    }

    pub fn dockerfile(&self) -> PathBuf {
        self.output_dir().join(DOCKERFILE)
    }

    pub fn compose_file(&self) -> PathBuf {
        self.output_dir().join(COMPOSE_FILE)
    }

    pub fn shim_dir(&self) -> PathBuf {
        self.output_dir().join(SHIM_DIR)
    }

    pub fn initdb_dir(&self) -> PathBuf {
        self.output_dir().join(INITDB_DIR)
    }

    /// Path of an output-directory file as seen from the build context (the project root).
    pub fn context_relative(&self, file: &str) -> String {
        format!("{}/{}", self.output_dir_name, file)
    }
}
