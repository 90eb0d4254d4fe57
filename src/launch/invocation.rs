//! Which compose front end to drive

use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// How compose is invoked on this host. Detected per launch, never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComposeInvocation {
    /// `docker compose ...`
    Plugin,
    /// `docker-compose ...`
    Standalone,
    /// User-configured program, called like the standalone binary
    Override(String),
}

impl ComposeInvocation {
    /// Uses `override_bin` when set, otherwise probes for the plugin and falls
    /// back to the standalone binary.
    pub async fn detect(override_bin: Option<&str>) -> Self {
        if let Some(bin) = override_bin {
            return ComposeInvocation::Override(bin.to_string());
        }

        let plugin = Command::new("docker")
            .args(["compose", "version"])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;

        match plugin {
            Ok(status) if status.success() => ComposeInvocation::Plugin,
            Ok(status) => {
                debug!(?status, "docker compose plugin unavailable, using docker-compose");
                ComposeInvocation::Standalone
            }
            Err(e) => {
                debug!(error = %e, "docker not runnable, using docker-compose");
                ComposeInvocation::Standalone
            }
        }
    }

    pub fn program(&self) -> &str {
        match self {
            ComposeInvocation::Plugin => "docker",
            ComposeInvocation::Standalone => "docker-compose",
            ComposeInvocation::Override(bin) => bin,
        }
    }

    /// Arguments preceding the compose subcommand.
    pub fn prefix_args(&self) -> &'static [&'static str] {
        match self {
            ComposeInvocation::Plugin => &["compose"],
            _ => &[],
        }
    }

    /// Full argument list for `compose -f <file> up --build -d`.
    pub fn up_args(&self, compose_file: &str) -> Vec<String> {
        self.prefix_args()
            .iter()
            .copied()
            .chain(["-f", compose_file, "up", "--build", "-d"])
            .map(str::to_string)
            .collect()
    }
}
