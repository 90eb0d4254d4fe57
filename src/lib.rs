//! stackup - containerized development environments from project manifests
//!
//! Reads the manifests at a project root, infers the application framework and
//! the backing services it talks to, and generates everything needed to run the
//! whole stack under compose: a Dockerfile, a compose manifest, runtime shims
//! that redirect loopback database connections into the compose network, a
//! persisted config record and a merged `.env`.
//!
//! # Pipeline
//!
//! ```text
//! detection::infer ──► ProjectReport ──► Synthesizer ──► files on disk
//!                                                           │
//!                                 Launcher (compose up) ◄───┘
//!                                     │
//!                         ReadinessProber (TCP connect polling)
//! ```
//!
//! # Example
//!
//! ```no_run
//! use stackup::{detection, synthesis};
//! use std::path::Path;
//!
//! let root = Path::new("/path/to/project");
//! let report = detection::infer(root);
//! println!("{}", report);
//!
//! let summary = synthesis::synthesize(root, &report).expect("synthesis failed");
//! println!("wrote {} files", summary.artifacts.len());
//! ```
//!
//! # Project Structure
//!
//! - [`detection`]: manifest reading and stack inference
//! - [`synthesis`]: artifact generation
//! - [`launch`]: compose subprocess and log streaming
//! - [`probe`]: readiness checks
//! - [`service`]: the facade a front end drives

#[macro_use]
pub mod stack;

pub mod cli;
pub mod config;
pub mod detection;
pub mod fs;
pub mod launch;
pub mod layout;
pub mod probe;
pub mod progress;
pub mod service;
pub mod synthesis;
pub mod util;

pub use config::{ConfigError, StackupConfig};
pub use detection::{infer, ProjectReport, StackAnalyzer};
pub use launch::{LaunchError, LaunchEvent, LaunchHandle, Launcher, LogChunk};
pub use probe::ReadinessProber;
pub use service::{DevEnvService, ServiceError};
pub use stack::{Cache, Database, Framework, ServiceKind, ServiceSet};
pub use synthesis::{SynthesisError, SynthesisSummary, Synthesizer};
pub use util::{init_default, init_from_env, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
