//! Output formatting for multiple formats
//!
//! JSON and YAML serialize the underlying types directly; the human format is
//! a short boxed summary meant for a terminal.

use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::detection::ProjectReport;
use crate::synthesis::SynthesisSummary;

const RULE: &str = "\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}";

/// Output format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format (machine-readable)
    Json,
    /// YAML format
    Yaml,
    /// Human-readable formatted text
    Human,
}

/// What `generate` prints in structured formats.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateOutput<'a> {
    report: &'a ProjectReport,
    #[serde(flatten)]
    summary: &'a SynthesisSummary,
}

pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format_report(&self, report: &ProjectReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => to_json(report),
            OutputFormat::Yaml => to_yaml(report),
            OutputFormat::Human => Ok(self.format_report_human(report)),
        }
    }

    pub fn format_generated(
        &self,
        root: &Path,
        report: &ProjectReport,
        summary: &SynthesisSummary,
    ) -> Result<String> {
        let output = GenerateOutput { report, summary };
        match self.format {
            OutputFormat::Json => to_json(&output),
            OutputFormat::Yaml => to_yaml(&output),
            OutputFormat::Human => Ok(self.format_generated_human(root, report, summary)),
        }
    }

    pub fn format_status(&self, status: &BTreeMap<String, bool>) -> Result<String> {
        match self.format {
            OutputFormat::Json => to_json(status),
            OutputFormat::Yaml => to_yaml(status),
            OutputFormat::Human => Ok(self.format_status_human(status)),
        }
    }

    fn format_report_human(&self, report: &ProjectReport) -> String {
        let mut output = String::new();

        if report.is_unknown() {
            output.push_str("\u{26A0} Stack Analysis (no recognized manifest)\n");
        } else {
            output.push_str("\u{2713} Stack Analysis\n");
        }
        output.push_str(RULE);
        output.push_str("\n\n");

        output.push_str(&format!("Framework:  {}\n", report.framework));
        output.push_str(&format!("Database:   {}\n", report.database));
        output.push_str(&format!("Cache:      {}\n", report.cache));
        let services = if report.services.is_empty() {
            "(none)".to_string()
        } else {
            report.services.ids().join(", ")
        };
        output.push_str(&format!("Services:   {}\n\n", services));

        output.push_str("Runtime:\n");
        output.push_str(&format!("\u{251C}\u{2500} Start:   {}\n", report.start_command));
        output.push_str(&format!("\u{251C}\u{2500} Port:    {}\n", report.port));
        if report.framework.is_python() || report.framework == crate::stack::Framework::Java {
            output.push_str(&format!(
                "\u{2514}\u{2500} Build:   {}\n",
                report
                    .java_build
                    .map(|t| t.to_string())
                    .unwrap_or_else(|| "pip".to_string())
            ));
        } else {
            output.push_str(&format!("\u{2514}\u{2500} Node:    {}\n", report.node_version));
        }

        if !report.manifests.is_empty() {
            output.push_str(&format!("\nManifests: {}\n", report.manifests.join(", ")));
        }
        if report.config_found {
            output.push_str("Previously generated: yes\n");
        }

        if !report.warnings.is_empty() {
            output.push_str("\n\u{26A0} Warnings:\n");
            for warning in &report.warnings {
                output.push_str(&format!("  - {}\n", warning));
            }
        }

        output
    }

    fn format_generated_human(
        &self,
        root: &Path,
        report: &ProjectReport,
        summary: &SynthesisSummary,
    ) -> String {
        let mut output = self.format_report_human(report);

        output.push_str("\nGenerated:\n");
        for (i, path) in summary.artifacts.iter().enumerate() {
            let connector = if i + 1 == summary.artifacts.len() {
                "\u{2514}"
            } else {
                "\u{251C}"
            };
            let shown = path.strip_prefix(root).unwrap_or(path);
            output.push_str(&format!("{}\u{2500} {}\n", connector, shown.display()));
        }

        if !summary.env_appended.is_empty() {
            output.push_str(&format!(
                "\n.env: added {}\n",
                summary.env_appended.join(", ")
            ));
        }
        if !summary.env_overwritten.is_empty() {
            output.push_str(&format!(
                ".env: reset {}\n",
                summary.env_overwritten.join(", ")
            ));
        }

        output
    }

    fn format_status_human(&self, status: &BTreeMap<String, bool>) -> String {
        let mut output = String::new();

        output.push_str("Service Readiness\n");
        output.push_str(RULE);
        output.push_str("\n\n");

        if status.is_empty() {
            output.push_str("(nothing to probe)\n");
        }
        for (service, ready) in status {
            let (symbol, label) = if *ready {
                ("\u{2713}", "ready")
            } else {
                ("\u{2717}", "not reachable")
            };
            output.push_str(&format!("{} {:<10} {}\n", symbol, service, label));
        }

        output
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize to JSON")
}

fn to_yaml<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_yaml::to_string(value).context("Failed to serialize to YAML")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stack::{Database, Framework, ServiceKind};
    use std::path::PathBuf;

    fn create_test_report() -> ProjectReport {
        let mut report = ProjectReport::unknown(false);
        report.framework = Framework::Node;
        report.database = Database::Postgres;
        report.services.insert(ServiceKind::Postgres);
        report.manifests = vec!["package.json".to_string()];
        report
    }

    #[test]
    fn test_json_format() {
        let formatter = OutputFormatter::new(OutputFormat::Json);
        let output = formatter.format_report(&create_test_report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["framework"], "Node.js");
        assert_eq!(value["database"], "Postgres");
        assert_eq!(value["services"], serde_json::json!(["postgres"]));
        assert_eq!(value["startCommand"], "npm start");
    }

    #[test]
    fn test_yaml_format() {
        let formatter = OutputFormatter::new(OutputFormat::Yaml);
        let output = formatter.format_report(&create_test_report()).unwrap();

        assert!(output.contains("framework: Node.js"));
        assert!(output.contains("- postgres"));
    }

    #[test]
    fn test_human_format() {
        let formatter = OutputFormatter::new(OutputFormat::Human);
        let output = formatter.format_report(&create_test_report()).unwrap();

        assert!(output.contains("\u{2713} Stack Analysis"));
        assert!(output.contains("Framework:  Node.js"));
        assert!(output.contains("Services:   postgres"));
        assert!(output.contains("Manifests: package.json"));
    }

    #[test]
    fn test_human_format_unknown_project() {
        let formatter = OutputFormatter::new(OutputFormat::Human);
        let output = formatter.format_report(&ProjectReport::unknown(false)).unwrap();

        assert!(output.contains("no recognized manifest"));
        assert!(output.contains("Services:   (none)"));
    }

    #[test]
    fn test_generated_json_flattens_summary() {
        let summary = SynthesisSummary {
            artifacts: vec![PathBuf::from("/p/.stackup/Dockerfile")],
            env_appended: vec!["DATABASE_URL".to_string()],
            env_overwritten: vec![],
        };
        let formatter = OutputFormatter::new(OutputFormat::Json);
        let output = formatter
            .format_generated(Path::new("/p"), &create_test_report(), &summary)
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["report"]["framework"], "Node.js");
        assert_eq!(value["envAppended"], serde_json::json!(["DATABASE_URL"]));
        assert_eq!(value["artifacts"][0], "/p/.stackup/Dockerfile");
    }

    #[test]
    fn test_generated_human_shows_relative_paths() {
        let summary = SynthesisSummary {
            artifacts: vec![
                PathBuf::from("/p/.stackup.json"),
                PathBuf::from("/p/.stackup/docker-compose.yml"),
            ],
            ..Default::default()
        };
        let formatter = OutputFormatter::new(OutputFormat::Human);
        let output = formatter
            .format_generated(Path::new("/p"), &create_test_report(), &summary)
            .unwrap();

        assert!(output.contains("\u{251C}\u{2500} .stackup.json\n"));
        assert!(output.contains("\u{2514}\u{2500} .stackup/docker-compose.yml\n"));
    }

    #[test]
    fn test_status_formats() {
        let mut status = BTreeMap::new();
        status.insert("app".to_string(), false);
        status.insert("redis".to_string(), true);

        let human = OutputFormatter::new(OutputFormat::Human)
            .format_status(&status)
            .unwrap();
        assert!(human.contains("\u{2713} redis"));
        assert!(human.contains("\u{2717} app"));

        let json = OutputFormatter::new(OutputFormat::Json)
            .format_status(&status)
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["redis"], true);
    }
}
