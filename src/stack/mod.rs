//! Strongly-typed identifiers for the technology stack of a project.
//!
//! `Framework`, `Database` and `Cache` are closed enums with an explicit
//! "unrecognized" member (`Unknown`, `NoneDetected`). `ServiceKind` names the
//! infrastructure containers the generated environment can run and carries the
//! fixed facts about each one: well-known port, image, credentials.

#[macro_use]
pub mod id_enum_macro;

pub mod framework;
pub mod service;

pub use framework::{Framework, JavaBuildTool, ShimKind};
pub use service::{Cache, Database, ServiceKind, ServiceSet, DEV_PASSWORD, DEV_USER};
