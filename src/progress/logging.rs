//! Logging-based progress handler

use super::{ProgressEvent, ProgressHandler};
use tracing::{debug, info, warn};

/// Handler that logs progress events using tracing
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHandler;

impl ProgressHandler for LoggingHandler {
    fn on_progress(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::Started { root } => {
                info!(root = %root.display(), "Generating environment");
            }
            ProgressEvent::ArtifactWritten { kind, path } => {
                debug!(artifact = kind.label(), path = %path.display(), "Wrote artifact");
            }
            ProgressEvent::EnvMerged {
                appended,
                overwritten,
            } => {
                if appended.is_empty() && overwritten.is_empty() {
                    debug!("Env file already up to date");
                } else {
                    info!(appended = ?appended, overwritten = ?overwritten, "Merged env file");
                }
            }
            ProgressEvent::Completed { artifacts, elapsed } => {
                info!(
                    artifacts,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Environment generated"
                );
            }
            ProgressEvent::Failed { error } => {
                warn!(error = %error, "Environment generation failed");
            }
        }
    }
}
