//! Stack inference.
//!
//! Turns a project directory into a [`ProjectReport`]. Three manifest families
//! are evaluated independently and unconditionally, in [`ManifestFamily::ORDER`]:
//!
//! 1. Node (`package.json`): exact dependency-key matches
//! 2. Python (requirement/lock files): substring scan over raw text
//! 3. Java (build descriptors): substring scan, fixed start command and port
//!
//! A later family overwrites the framework, start command and port of an earlier
//! one; database and cache only when it matched one; services accumulate. When
//! several families match, the report carries a warning instead of failing.
//!
//! Inference is read-only and never errors. Unreadable or malformed manifests
//! are logged and degrade only their own family.

pub mod analyzer;
pub mod java;
pub mod manifest;
pub mod node;
pub mod python;
pub mod report;

pub use analyzer::{infer, StackAnalyzer};
pub use manifest::{Manifest, ManifestFamily, ManifestReader};
pub use report::{FamilyFindings, ProjectReport, DEFAULT_NODE_VERSION};
