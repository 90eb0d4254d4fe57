//! Progress reporting for environment synthesis

mod handler;
mod logging;

pub use handler::{ArtifactKind, NoOpHandler, ProgressEvent, ProgressHandler};
pub use logging::LoggingHandler;
