//! JVM ecosystem: `pom.xml`, `build.gradle`, `build.gradle.kts`

use crate::detection::manifest::{Manifest, ManifestFamily};
use crate::detection::report::FamilyFindings;
use crate::stack::{Cache, Database, Framework, JavaBuildTool};

pub const START_COMMAND: &str = "java -jar app.jar";

/// Three independent substring checks; a later match overwrites the database.
pub fn detect(manifests: &[Manifest]) -> FamilyFindings {
    let text = manifests
        .iter()
        .map(|m| m.content.as_str())
        .collect::<Vec<_>>()
        .join("\n");

    let mut findings = FamilyFindings::new(ManifestFamily::Java, Framework::Java, START_COMMAND);

    if text.contains("postgresql") {
        findings.record_database(Database::Postgres);
    }
    if text.contains("mongodb") {
        findings.record_database(Database::MongoDb);
    }
    if text.contains("redis") {
        findings.record_cache(Cache::Redis);
    }

    findings.java_build = Some(if manifests.iter().any(|m| m.filename == "pom.xml") {
        JavaBuildTool::Maven
    } else {
        JavaBuildTool::Gradle
    });

    findings
}
