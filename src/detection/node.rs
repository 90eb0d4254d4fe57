//! Node ecosystem: `package.json`

use crate::detection::manifest::ManifestFamily;
use crate::detection::report::{FamilyFindings, DEFAULT_NODE_VERSION};
use crate::stack::{Cache, Database, Framework};
use serde_json::Value;
use std::collections::BTreeSet;
use tracing::warn;

const POSTGRES_DRIVERS: &[&str] = &["pg", "pg-promise", "postgres"];
const MYSQL_DRIVERS: &[&str] = &["mysql", "mysql2"];
const RELATIONAL_ORMS: &[&str] = &["sequelize", "typeorm", "prisma", "@prisma/client", "knex"];
const MONGO_DRIVERS: &[&str] = &["mongodb", "mongoose"];
const REDIS_CLIENTS: &[&str] = &["redis", "ioredis"];

const FALLBACK_ENTRY: &str = "index.js";

/// Interprets a `package.json`.
///
/// Presence alone makes the project `Node.js`. A document that fails to parse
/// yields the defaults with no service signal.
pub fn detect(content: &str) -> FamilyFindings {
    let mut findings = FamilyFindings::new(
        ManifestFamily::Node,
        Framework::Node,
        format!("node {}", FALLBACK_ENTRY),
    );
    findings.node_version = Some(DEFAULT_NODE_VERSION.to_string());

    let package: Value = match serde_json::from_str(content) {
        Ok(value) => value,
        Err(e) => {
            warn!(manifest = "package.json", error = %e, "Malformed manifest, ignoring its dependencies");
            return findings;
        }
    };

    let deps = dependency_keys(&package);
    let has_any = |names: &[&str]| names.iter().any(|name| deps.contains(*name));

    let has_mysql = has_any(MYSQL_DRIVERS);
    let has_postgres =
        has_any(POSTGRES_DRIVERS) || deps.iter().any(|key| key.contains("postgres"));
    let has_orm = has_any(RELATIONAL_ORMS);

    if has_postgres || (has_orm && !has_mysql) {
        findings.record_database(Database::Postgres);
    } else if has_mysql {
        findings.record_database(Database::MySql);
    }

    if has_any(MONGO_DRIVERS) {
        findings.record_database(Database::MongoDb);
    }

    if has_any(REDIS_CLIENTS) {
        findings.record_cache(Cache::Redis);
    }

    findings.start_command = start_command(&package);

    if let Some(version) = package["engines"]["node"].as_str().and_then(major_version) {
        findings.node_version = Some(version);
    }

    findings
}

/// Runtime and development dependency names merged into one flat set.
fn dependency_keys(package: &Value) -> BTreeSet<String> {
    ["dependencies", "devDependencies"]
        .iter()
        .filter_map(|section| package[*section].as_object())
        .flat_map(|deps| deps.keys().cloned())
        .collect()
}

fn start_command(package: &Value) -> String {
    if package["scripts"]["start"].is_string() {
        "npm start".to_string()
    } else if let Some(main) = package["main"].as_str() {
        format!("node {}", main)
    } else {
        format!("node {}", FALLBACK_ENTRY)
    }
}

/// First run of digits in an engine constraint: `>=20.1` gives `20`.
pub(crate) fn major_version(constraint: &str) -> Option<String> {
    constraint
        .split(|c: char| !c.is_ascii_digit())
        .find(|part| !part.is_empty())
        .map(str::to_string)
}
