//! Orchestration launcher
//!
//! Starts `compose up --build -d` inside the generated output directory and
//! hands back a [`LaunchHandle`] streaming the process output. A failed build
//! shows up as log content and a non-zero exit code; only a process that
//! cannot be started at all is a [`LaunchError`].

mod handle;
mod invocation;

pub use handle::{LaunchEvent, LaunchHandle, LogChunk, LogStream};
pub use invocation::ComposeInvocation;

use crate::layout::{ProjectLayout, COMPOSE_FILE, DEFAULT_OUTPUT_DIR};
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

const READ_BUFFER_SIZE: usize = 8192;

#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("Compose manifest not found at {0}; generate the environment first")]
    MissingManifest(PathBuf),
    #[error("Failed to start '{program}': {source}")]
    Spawn { program: String, source: io::Error },
}

#[derive(Debug, Clone)]
pub struct Launcher {
    output_dir: String,
    compose_bin: Option<String>,
}

impl Default for Launcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Launcher {
    pub fn new() -> Self {
        Self {
            output_dir: DEFAULT_OUTPUT_DIR.to_string(),
            compose_bin: None,
        }
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<String>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub fn with_compose_bin(mut self, compose_bin: Option<String>) -> Self {
        self.compose_bin = compose_bin;
        self
    }

    /// Spawns the build-and-start operation and returns immediately.
    pub async fn launch(&self, root: &Path) -> Result<LaunchHandle, LaunchError> {
        let layout = ProjectLayout::with_output_dir(root, self.output_dir.as_str());
        let manifest = layout.compose_file();
        if !manifest.is_file() {
            return Err(LaunchError::MissingManifest(manifest));
        }

        let invocation = ComposeInvocation::detect(self.compose_bin.as_deref()).await;
        let program = invocation.program().to_string();
        let args = invocation.up_args(COMPOSE_FILE);
        info!(program = %program, args = ?args, dir = %layout.output_dir().display(), "Launching environment");

        let mut child = Command::new(&program)
            .args(&args)
            .current_dir(layout.output_dir())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| LaunchError::Spawn {
                program: program.clone(),
                source,
            })?;

        let (tx, rx) = mpsc::unbounded_channel();

        let stdout = child
            .stdout
            .take()
            .map(|pipe| tokio::spawn(forward(pipe, LogStream::Stdout, tx.clone())));
        let stderr = child
            .stderr
            .take()
            .map(|pipe| tokio::spawn(forward(pipe, LogStream::Stderr, tx.clone())));

        tokio::spawn(async move {
            for reader in [stdout, stderr].into_iter().flatten() {
                if let Err(e) = reader.await {
                    warn!(error = %e, "Log reader task failed");
                }
            }
            let code = match child.wait().await {
                Ok(status) => status.code(),
                Err(e) => {
                    warn!(error = %e, "Failed to wait for compose process");
                    None
                }
            };
            debug!(?code, "Compose process exited");
            let _ = tx.send(LaunchEvent::Exited(code));
        });

        Ok(LaunchHandle::new(invocation, rx))
    }
}

/// Drains `pipe` to EOF, forwarding chunks while anyone is listening.
async fn forward<R>(mut pipe: R, stream: LogStream, tx: mpsc::UnboundedSender<LaunchEvent>)
where
    R: AsyncRead + Unpin,
{
    let mut buf = vec![0u8; READ_BUFFER_SIZE];
    loop {
        match pipe.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => {
                let text = String::from_utf8_lossy(&buf[..n]).into_owned();
                // a closed receiver must not stop draining or the child blocks on a full pipe
                let _ = tx.send(LaunchEvent::Log(LogChunk { stream, text }));
            }
            Err(e) => {
                warn!(?stream, error = %e, "Failed reading compose output");
                break;
            }
        }
    }
}

/// Launches with the default output directory and compose detection.
pub async fn launch(root: &Path) -> Result<LaunchHandle, LaunchError> {
    Launcher::new().launch(root).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_manifest() {
        let dir = TempDir::new().unwrap();
        let err = launch(dir.path()).await.unwrap_err();
        assert!(matches!(err, LaunchError::MissingManifest(_)));
    }

    #[tokio::test]
    async fn test_spawn_failure_is_explicit() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".stackup")).unwrap();
        std::fs::write(dir.path().join(".stackup/docker-compose.yml"), "services: {}\n").unwrap();

        let err = Launcher::new()
            .with_compose_bin(Some("/nonexistent/stackup-compose".to_string()))
            .launch(dir.path())
            .await
            .unwrap_err();

        match err {
            LaunchError::Spawn { program, .. } => {
                assert_eq!(program, "/nonexistent/stackup-compose")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_streams_output_and_exit_code() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".stackup")).unwrap();
        // `sh -f docker-compose.yml up --build -d` runs the manifest as a script
        std::fs::write(
            dir.path().join(".stackup/docker-compose.yml"),
            "echo building\necho failed >&2\nexit 3\n",
        )
        .unwrap();

        let handle = Launcher::new()
            .with_compose_bin(Some("sh".to_string()))
            .launch(dir.path())
            .await
            .unwrap();
        let (code, chunks) = handle.wait().await;

        assert_eq!(code, Some(3));
        let stdout: String = chunks
            .iter()
            .filter(|c| c.stream == LogStream::Stdout)
            .map(|c| c.text.as_str())
            .collect();
        let stderr: String = chunks
            .iter()
            .filter(|c| c.stream == LogStream::Stderr)
            .map(|c| c.text.as_str())
            .collect();
        assert_eq!(stdout, "building\n");
        assert_eq!(stderr, "failed\n");
    }
}
