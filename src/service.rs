//! Development environment service
//!
//! The high-level entry point a front end drives: analyze a project, generate
//! its environment, launch it and poll readiness. Each call validates the
//! project path first; the stages themselves never re-infer or share state.
//!
//! # Example
//!
//! ```no_run
//! use stackup::{DevEnvService, StackupConfig};
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let service = DevEnvService::new(StackupConfig::default())?;
//! let root = Path::new("/path/to/project");
//!
//! let report = service.analyze(root)?;
//! service.synthesize(root, &report)?;
//! let handle = service.launch(root).await?;
//! # drop(handle);
//! # Ok(())
//! # }
//! ```

use crate::config::{ConfigError, StackupConfig};
use crate::detection::{self, ProjectReport};
use crate::launch::{LaunchError, LaunchHandle, Launcher};
use crate::layout::ProjectLayout;
use crate::probe::ReadinessProber;
use crate::progress::ProgressHandler;
use crate::synthesis::{ConfigRecord, SynthesisError, SynthesisSummary, Synthesizer};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Project path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("Project path is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Synthesis failed: {0}")]
    Synthesis(#[from] SynthesisError),

    #[error("Launch failed: {0}")]
    Launch(#[from] LaunchError),

    #[error("No generated environment found at {0}")]
    RecordNotFound(PathBuf),

    #[error("Invalid config record {path}: {message}")]
    InvalidRecord { path: PathBuf, message: String },
}

impl ServiceError {
    /// Returns a user-friendly error message with troubleshooting hints
    pub fn help_message(&self) -> String {
        match self {
            ServiceError::PathNotFound(path) => format!(
                "Error: Project path not found\nPath: {}\n\n\
                Help: The specified path does not exist. Please check:\n\
                - Is the path correct?\n\
                - Do you have permission to access it?",
                path.display()
            ),
            ServiceError::NotADirectory(path) => format!(
                "Error: Project path is not a directory\nPath: {}\n\n\
                Help: Pass the project root directory, not a manifest file.",
                path.display()
            ),
            ServiceError::Config(e) => format!(
                "Error: Configuration error\n\n\
                Help: Check the STACKUP_* environment variables.\n\n\
                Details: {}",
                e
            ),
            ServiceError::Synthesis(SynthesisError::Io { path, source }) => format!(
                "Error: Could not write {}\n\n\
                Help: Check that the project directory is writable and not on a read-only mount.\n\n\
                Details: {}",
                path.display(),
                source
            ),
            ServiceError::Synthesis(e) => format!("Error: {}\n\nHelp: Report this issue if it persists.", e),
            ServiceError::Launch(LaunchError::MissingManifest(path)) => format!(
                "Error: Compose manifest missing\nPath: {}\n\n\
                Help: Generate the environment first:\n\
                stackup generate <path>",
                path.display()
            ),
            ServiceError::Launch(LaunchError::Spawn { program, source }) => format!(
                "Error: Could not start '{}'\n\n\
                Help: Is a container engine installed? Try:\n\
                - Install Docker with the compose plugin, or docker-compose\n\
                - Point STACKUP_COMPOSE_BIN at a compatible compose binary\n\n\
                Details: {}",
                program, source
            ),
            ServiceError::RecordNotFound(path) => format!(
                "Error: No generated environment\nPath: {}\n\n\
                Help: Run `stackup generate <path>` or `stackup up <path>` first.",
                path.display()
            ),
            ServiceError::InvalidRecord { path, message } => format!(
                "Error: Config record is unreadable\nPath: {}\n\n\
                Help: Delete it and run `stackup generate <path>` again.\n\n\
                Details: {}",
                path.display(),
                message
            ),
        }
    }
}

pub struct DevEnvService {
    config: StackupConfig,
    synthesizer: Synthesizer,
    launcher: Launcher,
    prober: ReadinessProber,
}

impl std::fmt::Debug for DevEnvService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DevEnvService")
            .field("config", &self.config)
            .finish()
    }
}

impl DevEnvService {
    /// Validates `config` and wires the stages from it.
    pub fn new(config: StackupConfig) -> Result<Self, ServiceError> {
        config.validate()?;

        let synthesizer = Synthesizer::new().with_output_dir(config.output_dir.as_str());
        let launcher = Launcher::new()
            .with_output_dir(config.output_dir.as_str())
            .with_compose_bin(config.compose_bin.clone());
        let prober = ReadinessProber::new(config.probe_host.as_str(), config.probe_timeout());

        Ok(Self {
            config,
            synthesizer,
            launcher,
            prober,
        })
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressHandler>) -> Self {
        self.synthesizer = self.synthesizer.with_progress(progress);
        self
    }

    pub fn config(&self) -> &StackupConfig {
        &self.config
    }

    pub fn layout(&self, root: &Path) -> ProjectLayout {
        ProjectLayout::with_output_dir(root, self.config.output_dir.as_str())
    }

    /// Infers the project's stack. Only an invalid path is an error.
    pub fn analyze(&self, root: &Path) -> Result<ProjectReport, ServiceError> {
        validate_project_path(root)?;
        let start = Instant::now();

        let report = detection::infer(root);

        info!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            framework = %report.framework,
            services = ?report.services.ids(),
            "Analysis completed"
        );
        Ok(report)
    }

    pub fn synthesize(
        &self,
        root: &Path,
        report: &ProjectReport,
    ) -> Result<SynthesisSummary, ServiceError> {
        validate_project_path(root)?;
        Ok(self.synthesizer.synthesize(root, report)?)
    }

    /// Analyze followed by synthesize.
    pub fn generate(&self, root: &Path) -> Result<(ProjectReport, SynthesisSummary), ServiceError> {
        let report = self.analyze(root)?;
        let summary = self.synthesize(root, &report)?;
        Ok((report, summary))
    }

    pub async fn launch(&self, root: &Path) -> Result<LaunchHandle, ServiceError> {
        validate_project_path(root)?;
        Ok(self.launcher.launch(root).await?)
    }

    /// Whether a compose manifest has been generated for `root`.
    pub fn is_generated(&self, root: &Path) -> bool {
        self.layout(root).compose_file().is_file()
    }

    pub async fn check_readiness<S: AsRef<str>>(
        &self,
        services: &[S],
        app_port: Option<u16>,
    ) -> BTreeMap<String, bool> {
        self.prober.check_all(services, app_port).await
    }

    /// Polls readiness using the configured interval and deadline.
    pub async fn wait_until_ready<S: AsRef<str>>(
        &self,
        services: &[S],
        app_port: Option<u16>,
    ) -> BTreeMap<String, bool> {
        self.prober
            .wait_until_ready(
                services,
                app_port,
                self.config.poll_interval(),
                self.config.ready_timeout(),
            )
            .await
    }

    /// Reads the config record a previous generation left behind.
    pub fn load_record(&self, root: &Path) -> Result<ConfigRecord, ServiceError> {
        validate_project_path(root)?;
        let path = self.layout(root).config_record();
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ServiceError::RecordNotFound(path))
            }
            Err(e) => {
                return Err(ServiceError::InvalidRecord {
                    path,
                    message: e.to_string(),
                })
            }
        };
        ConfigRecord::from_json(&content).map_err(|e| ServiceError::InvalidRecord {
            path,
            message: e.to_string(),
        })
    }
}

fn validate_project_path(path: &Path) -> Result<(), ServiceError> {
    if !path.exists() {
        return Err(ServiceError::PathNotFound(path.to_path_buf()));
    }
    if !path.is_dir() {
        return Err(ServiceError::NotADirectory(path.to_path_buf()));
    }
    Ok(())
}
