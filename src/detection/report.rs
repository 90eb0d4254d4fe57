use crate::detection::manifest::ManifestFamily;
use crate::stack::{Cache, Database, Framework, JavaBuildTool, ServiceSet};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Node major version used when the manifest declares no engine constraint.
pub const DEFAULT_NODE_VERSION: &str = "18";

/// Start command when nothing better can be derived.
pub const FALLBACK_START_COMMAND: &str = "npm start";

/// Structured result of one inference pass over a project directory.
///
/// Created fresh per analysis and never mutated by the synthesizer. `services`
/// is authoritative; `database` and `cache` are summaries that always refer to
/// a member of `services` when set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectReport {
    pub framework: Framework,
    pub database: Database,
    pub cache: Cache,
    pub services: ServiceSet,
    pub config_found: bool,
    pub port: u16,
    pub start_command: String,
    pub node_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub java_build: Option<JavaBuildTool>,
    /// Manifest filenames that contributed, in evaluation order
    #[serde(default)]
    pub manifests: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl ProjectReport {
    /// Report for a directory with no recognized manifest.
    pub fn unknown(config_found: bool) -> Self {
        Self {
            framework: Framework::Unknown,
            database: Database::NoneDetected,
            cache: Cache::NoneDetected,
            services: ServiceSet::new(),
            config_found,
            port: Framework::Unknown.default_port(),
            start_command: FALLBACK_START_COMMAND.to_string(),
            node_version: DEFAULT_NODE_VERSION.to_string(),
            java_build: None,
            manifests: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Folds one family's findings in, following the documented overwrite policy:
    /// framework, start command and port are replaced; database and cache are
    /// replaced only when the family matched one; services only grow.
    pub(crate) fn apply(&mut self, findings: FamilyFindings) {
        self.framework = findings.framework;
        self.start_command = findings.start_command;
        self.port = findings.port;

        if let Some(database) = findings.database {
            self.database = database;
        }
        if let Some(cache) = findings.cache {
            self.cache = cache;
        }
        self.services.extend(&findings.services);

        if let Some(version) = findings.node_version {
            self.node_version = version;
        }
        if findings.java_build.is_some() {
            self.java_build = findings.java_build;
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.framework == Framework::Unknown
    }
}

impl fmt::Display for ProjectReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (database: {}, cache: {}, port: {})",
            self.framework, self.database, self.cache, self.port
        )
    }
}

/// What a single manifest family contributes to the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilyFindings {
    pub family: ManifestFamily,
    pub framework: Framework,
    pub database: Option<Database>,
    pub cache: Option<Cache>,
    pub services: ServiceSet,
    pub start_command: String,
    pub port: u16,
    pub node_version: Option<String>,
    pub java_build: Option<JavaBuildTool>,
}

impl FamilyFindings {
    pub fn new(family: ManifestFamily, framework: Framework, start_command: impl Into<String>) -> Self {
        Self {
            family,
            framework,
            database: None,
            cache: None,
            services: ServiceSet::new(),
            start_command: start_command.into(),
            port: framework.default_port(),
            node_version: None,
            java_build: None,
        }
    }

    /// Sets the database summary, overwriting any earlier match, and records its service.
    pub fn record_database(&mut self, database: Database) {
        self.database = Some(database);
        if let Some(service) = database.service() {
            self.services.insert(service);
        }
    }

    pub fn record_cache(&mut self, cache: Cache) {
        self.cache = Some(cache);
        if let Some(service) = cache.service() {
            self.services.insert(service);
        }
    }
}
