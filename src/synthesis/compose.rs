//! Compose manifest model and rendering

use crate::detection::ProjectReport;
use crate::fs::FileSystem;
use crate::layout::{ProjectLayout, DOCKERFILE, ENV_FILE, INITDB_DIR};
use crate::stack::{ServiceKind, DEV_PASSWORD, DEV_USER};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};

pub const APP_SERVICE: &str = "app";
const INIT_MOUNT_TARGET: &str = "/docker-entrypoint-initdb.d";
const INIT_SCRIPT_NAME: &str = "initdb.sh";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposeFile {
    pub services: BTreeMap<String, ComposeService>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposeService {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build: Option<BuildSpec>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub environment: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env_file: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub depends_on: BTreeMap<String, DependsOn>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub networks: BTreeMap<String, NetworkAttachment>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub volumes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub healthcheck: Option<Healthcheck>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildSpec {
    pub context: String,
    pub dockerfile: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependsOn {
    pub condition: String,
}

impl DependsOn {
    pub fn healthy() -> Self {
        Self {
            condition: "service_healthy".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkAttachment {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Healthcheck {
    pub test: Vec<String>,
    pub interval: String,
    pub timeout: String,
    pub retries: u32,
}

impl Healthcheck {
    fn new(test: &[&str], interval: &str) -> Self {
        Self {
            test: test.iter().map(|s| s.to_string()).collect(),
            interval: interval.to_string(),
            timeout: "5s".to_string(),
            retries: 10,
        }
    }
}

impl ComposeFile {
    pub fn to_yaml(&self) -> serde_yaml::Result<String> {
        serde_yaml::to_string(self)
    }

    pub fn from_yaml(content: &str) -> serde_yaml::Result<Self> {
        serde_yaml::from_str(content)
    }

    pub fn app(&self) -> Option<&ComposeService> {
        self.services.get(APP_SERVICE)
    }
}

/// SQL and init scripts at the project root, sorted by name.
pub fn discover_init_scripts(fs: &dyn FileSystem, root: &Path) -> Vec<String> {
    let entries = match fs.read_dir(root) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(root = %root.display(), error = %e, "Could not list project root for init scripts");
            return Vec::new();
        }
    };

    let mut scripts: Vec<String> = entries
        .into_iter()
        .filter(|entry| entry.is_file())
        .map(|entry| entry.name)
        .filter(|name| is_init_script(name))
        .collect();
    scripts.sort();
    debug!(count = scripts.len(), "Discovered init scripts");
    scripts
}

fn is_init_script(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    lower.ends_with(".sql") || lower.ends_with(".sql.gz") || lower == INIT_SCRIPT_NAME
}

/// Builds the manifest. Paths are relative to the output directory, where the file lives.
pub fn build(report: &ProjectReport, layout: &ProjectLayout, init_scripts: &[String]) -> ComposeFile {
    let mut services = BTreeMap::new();

    let depends_on = report
        .services
        .iter()
        .map(|s| (s.id().to_string(), DependsOn::healthy()))
        .collect();

    services.insert(
        APP_SERVICE.to_string(),
        ComposeService {
            build: Some(BuildSpec {
                context: "..".to_string(),
                dockerfile: layout.context_relative(DOCKERFILE),
            }),
            env_file: vec![format!("../{}", ENV_FILE)],
            ports: vec![format!("{}:{}", report.port, report.port)],
            depends_on,
            ..Default::default()
        },
    );

    for service in report.services.iter() {
        services.insert(service.id().to_string(), service_block(service, init_scripts));
    }

    ComposeFile { services }
}

fn service_block(service: ServiceKind, init_scripts: &[String]) -> ComposeService {
    let port = service.port();
    let mut block = ComposeService {
        image: Some(service.image().to_string()),
        ports: vec![format!("{}:{}", port, port)],
        ..Default::default()
    };

    let env = |pairs: &[(&str, &str)]| -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    };
    let db = service.database_name().unwrap_or_default();

    match service {
        ServiceKind::Postgres => {
            block.environment = env(&[
                ("POSTGRES_USER", DEV_USER),
                ("POSTGRES_PASSWORD", DEV_PASSWORD),
                ("POSTGRES_DB", db),
            ]);
            let ready = format!("pg_isready -U {} -d {}", DEV_USER, db);
            block.healthcheck = Some(Healthcheck::new(&["CMD-SHELL", ready.as_str()], "5s"));
        }
        ServiceKind::MySql => {
            block.environment = env(&[
                ("MYSQL_ROOT_PASSWORD", DEV_PASSWORD),
                ("MYSQL_USER", DEV_USER),
                ("MYSQL_PASSWORD", DEV_PASSWORD),
                ("MYSQL_DATABASE", db),
            ]);
            block.healthcheck = Some(Healthcheck::new(
                &["CMD", "mysqladmin", "ping", "-h", "localhost"],
                "10s",
            ));
        }
        ServiceKind::MongoDb => {
            block.environment = env(&[
                ("MONGO_INITDB_ROOT_USERNAME", DEV_USER),
                ("MONGO_INITDB_ROOT_PASSWORD", DEV_PASSWORD),
                ("MONGO_INITDB_DATABASE", db),
            ]);
            block.healthcheck = Some(Healthcheck::new(
                &["CMD", "mongosh", "--quiet", "--eval", "db.adminCommand('ping')"],
                "10s",
            ));
        }
        ServiceKind::Redis => {
            block.healthcheck = Some(Healthcheck::new(&["CMD", "redis-cli", "ping"], "5s"));
        }
    }

    let aliases: &[&str] = match service {
        ServiceKind::Postgres | ServiceKind::MySql => &["db", "database"],
        ServiceKind::MongoDb => &["mongo"],
        ServiceKind::Redis => &[],
    };
    if !aliases.is_empty() {
        block.networks.insert(
            "default".to_string(),
            NetworkAttachment {
                aliases: aliases.iter().map(|a| a.to_string()).collect(),
            },
        );
    }

    if service.is_relational() {
        block.volumes = init_volumes(init_scripts);
    }

    block
}

fn init_volumes(init_scripts: &[String]) -> Vec<String> {
    if init_scripts.is_empty() {
        return vec![format!("./{}:{}:ro", INITDB_DIR, INIT_MOUNT_TARGET)];
    }
    init_scripts
        .iter()
        .map(|name| format!("../{}:{}/{}:ro", name, INIT_MOUNT_TARGET, name))
        .collect()
}
