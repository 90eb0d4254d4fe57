//! Persisted `.stackup.json` record

use super::connection::ConnectionVars;
use crate::detection::ProjectReport;
use crate::stack::{Framework, ServiceSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// What a previous generation run left behind. Read back by `status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigRecord {
    pub project_type: Framework,
    pub services: ServiceSet,
    /// Every connection key; values are empty for inactive services
    pub env: BTreeMap<String, String>,
    pub port: u16,
    pub start_command: String,
    #[serde(default)]
    pub generator_version: String,
}

impl ConfigRecord {
    pub fn from_report(report: &ProjectReport, vars: &ConnectionVars) -> Self {
        Self {
            project_type: report.framework,
            services: report.services.clone(),
            env: vars.to_map(),
            port: report.port,
            start_command: report.start_command.clone(),
            generator_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }

    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }
}
