//! Artifact synthesis
//!
//! Turns a [`ProjectReport`] into the files a compose-based development
//! environment needs. Artifacts are written in dependency order: output
//! directory, config record, env file, shims, build recipe, ignore list and
//! finally the compose manifest that references them. Any write failure is
//! returned as-is; nothing already written is rolled back.

pub mod compose;
pub mod config_record;
pub mod connection;
pub mod dockerfile;
pub mod env_file;
pub mod ignore;
pub mod shim;

pub use compose::{ComposeFile, ComposeService};
pub use config_record::ConfigRecord;
pub use connection::ConnectionVars;
pub use env_file::{EnvMerge, MergePolicy};

use crate::detection::ProjectReport;
use crate::fs::RealFileSystem;
use crate::layout::{ProjectLayout, DEFAULT_OUTPUT_DIR};
use crate::progress::{ArtifactKind, LoggingHandler, ProgressEvent, ProgressHandler};
use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SynthesisError {
    #[error("Failed to write {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("Failed to serialize {artifact}: {message}")]
    Serialize {
        artifact: &'static str,
        message: String,
    },
}

impl SynthesisError {
    fn io(path: &Path, source: io::Error) -> Self {
        SynthesisError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Paths written by one synthesis run, plus what the env merge did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthesisSummary {
    pub artifacts: Vec<PathBuf>,
    pub env_appended: Vec<String>,
    pub env_overwritten: Vec<String>,
}

pub struct Synthesizer {
    output_dir: String,
    progress: Arc<dyn ProgressHandler>,
}

impl Default for Synthesizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Synthesizer {
    pub fn new() -> Self {
        Self {
            output_dir: DEFAULT_OUTPUT_DIR.to_string(),
            progress: Arc::new(LoggingHandler),
        }
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<String>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressHandler>) -> Self {
        self.progress = progress;
        self
    }

    pub fn synthesize(
        &self,
        root: &Path,
        report: &ProjectReport,
    ) -> Result<SynthesisSummary, SynthesisError> {
        let started = Instant::now();
        self.progress.on_progress(&ProgressEvent::Started {
            root: root.to_path_buf(),
        });

        match self.write_all(root, report) {
            Ok(summary) => {
                self.progress.on_progress(&ProgressEvent::Completed {
                    artifacts: summary.artifacts.len(),
                    elapsed: started.elapsed(),
                });
                Ok(summary)
            }
            Err(e) => {
                self.progress.on_progress(&ProgressEvent::Failed {
                    error: e.to_string(),
                });
                Err(e)
            }
        }
    }

    fn write_all(
        &self,
        root: &Path,
        report: &ProjectReport,
    ) -> Result<SynthesisSummary, SynthesisError> {
        let layout = ProjectLayout::with_output_dir(root, self.output_dir.as_str());
        let mut summary = SynthesisSummary::default();

        let output_dir = layout.output_dir();
        std::fs::create_dir_all(&output_dir).map_err(|e| SynthesisError::io(&output_dir, e))?;
        let initdb = layout.initdb_dir();
        std::fs::create_dir_all(&initdb).map_err(|e| SynthesisError::io(&initdb, e))?;

        let vars = ConnectionVars::from_services(&report.services);

        let record = ConfigRecord::from_report(report, &vars);
        let json = record.to_json().map_err(|e| SynthesisError::Serialize {
            artifact: "config record",
            message: e.to_string(),
        })?;
        self.write(&mut summary, ArtifactKind::ConfigRecord, &layout.config_record(), &json)?;

        let env_path = layout.env_file();
        let existing = match std::fs::read_to_string(&env_path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(SynthesisError::io(&env_path, e)),
        };
        let merged = env_file::merge(&existing, vars.iter());
        self.progress.on_progress(&ProgressEvent::EnvMerged {
            appended: merged.appended.clone(),
            overwritten: merged.overwritten.clone(),
        });
        if !merged.is_noop() || !env_path.exists() {
            self.write(&mut summary, ArtifactKind::EnvFile, &env_path, &merged.content)?;
        }
        summary.env_appended = merged.appended;
        summary.env_overwritten = merged.overwritten;

        if let Some(kind) = report.framework.shim() {
            let shim_dir = layout.shim_dir();
            std::fs::create_dir_all(&shim_dir).map_err(|e| SynthesisError::io(&shim_dir, e))?;
            for file in shim::render(kind, &vars) {
                self.write(
                    &mut summary,
                    ArtifactKind::Shim,
                    &shim_dir.join(file.name),
                    &file.content,
                )?;
            }
        }

        let recipe = dockerfile::render(report, &layout);
        self.write(&mut summary, ArtifactKind::Dockerfile, &layout.dockerfile(), &recipe)?;

        let ignore_list = ignore::render(&layout);
        self.write(&mut summary, ArtifactKind::IgnoreFile, &layout.ignore_file(), &ignore_list)?;

        let init_scripts = compose::discover_init_scripts(&RealFileSystem, root);
        let manifest = compose::build(report, &layout, &init_scripts);
        let yaml = manifest.to_yaml().map_err(|e| SynthesisError::Serialize {
            artifact: "compose manifest",
            message: e.to_string(),
        })?;
        self.write(
            &mut summary,
            ArtifactKind::ComposeManifest,
            &layout.compose_file(),
            &yaml,
        )?;

        Ok(summary)
    }

    fn write(
        &self,
        summary: &mut SynthesisSummary,
        kind: ArtifactKind,
        path: &Path,
        content: &str,
    ) -> Result<(), SynthesisError> {
        std::fs::write(path, content).map_err(|e| SynthesisError::io(path, e))?;
        self.progress.on_progress(&ProgressEvent::ArtifactWritten {
            kind,
            path: path.to_path_buf(),
        });
        summary.artifacts.push(path.to_path_buf());
        Ok(())
    }
}

/// Synthesizes with the default output directory and logging progress.
pub fn synthesize(root: &Path, report: &ProjectReport) -> Result<SynthesisSummary, SynthesisError> {
    Synthesizer::new().synthesize(root, report)
}
