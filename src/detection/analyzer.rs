use crate::detection::manifest::{ManifestFamily, ManifestReader};
use crate::detection::report::{FamilyFindings, ProjectReport};
use crate::detection::{java, node, python};
use crate::fs::{FileSystem, RealFileSystem};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Runs every manifest family over a project root and folds the results.
pub struct StackAnalyzer<'a> {
    fs: &'a dyn FileSystem,
    root: &'a Path,
}

impl<'a> StackAnalyzer<'a> {
    pub fn new(fs: &'a dyn FileSystem, root: &'a Path) -> Self {
        Self { fs, root }
    }

    /// Never fails: a directory without recognizable manifests is `Unknown`.
    pub fn analyze(&self) -> ProjectReport {
        let start = Instant::now();
        let reader = ManifestReader::new(self.fs, self.root);
        let mut report = ProjectReport::unknown(reader.has_config_record());
        let mut matched = Vec::new();

        for family in ManifestFamily::ORDER {
            let manifests = reader.read(family);
            if manifests.is_empty() {
                continue;
            }

            let findings: FamilyFindings = match family {
                ManifestFamily::Node => node::detect(&manifests[0].content),
                ManifestFamily::Python => {
                    let exists = |name: &str| reader.exists(name);
                    python::detect(&manifests, &exists)
                }
                ManifestFamily::Java => java::detect(&manifests),
            };

            debug!(
                family = %family,
                framework = %findings.framework,
                services = ?findings.services.ids(),
                "Manifest family matched"
            );

            report
                .manifests
                .extend(manifests.iter().map(|m| m.filename.to_string()));
            report.apply(findings);
            matched.push(family);
        }

        if matched.len() > 1 {
            let families = matched
                .iter()
                .map(|f| f.name())
                .collect::<Vec<_>>()
                .join(", ");
            let message = format!(
                "Multiple stacks detected ({}); using {} from the last evaluated manifest",
                families, report.framework
            );
            warn!(families = %families, framework = %report.framework, "Multiple stacks detected");
            report.warnings.push(message);
        }

        info!(
            root = %self.root.display(),
            framework = %report.framework,
            database = %report.database,
            cache = %report.cache,
            services = ?report.services.ids(),
            port = report.port,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Stack inference complete"
        );

        report
    }
}

/// Infers the stack of a project directory on the real file system.
pub fn infer(root: &Path) -> ProjectReport {
    let fs = RealFileSystem::new();
    StackAnalyzer::new(&fs, root).analyze()
}
