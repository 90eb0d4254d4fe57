//! Progress handler trait and events

use std::path::PathBuf;
use std::time::Duration;

/// Kind of file the synthesizer produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    ConfigRecord,
    EnvFile,
    Shim,
    Dockerfile,
    IgnoreFile,
    ComposeManifest,
}

impl ArtifactKind {
    pub fn label(&self) -> &'static str {
        match self {
            ArtifactKind::ConfigRecord => "config record",
            ArtifactKind::EnvFile => "env file",
            ArtifactKind::Shim => "runtime shim",
            ArtifactKind::Dockerfile => "build recipe",
            ArtifactKind::IgnoreFile => "ignore list",
            ArtifactKind::ComposeManifest => "compose manifest",
        }
    }
}

/// Events emitted while generating an environment
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Synthesis started
    Started { root: PathBuf },

    /// A file was (re)written
    ArtifactWritten { kind: ArtifactKind, path: PathBuf },

    /// Environment file merged
    EnvMerged {
        appended: Vec<String>,
        overwritten: Vec<String>,
    },

    /// Synthesis completed successfully
    Completed { artifacts: usize, elapsed: Duration },

    /// Synthesis failed
    Failed { error: String },
}

/// Trait for handling progress events during synthesis
pub trait ProgressHandler: Send + Sync {
    /// Called when a progress event occurs
    fn on_progress(&self, event: &ProgressEvent);
}

/// No-op handler that ignores all events
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpHandler;

impl ProgressHandler for NoOpHandler {
    fn on_progress(&self, _event: &ProgressEvent) {}
}
