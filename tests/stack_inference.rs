//! Stack inference over the sample projects in `tests/fixtures/projects`

mod support;

use stackup::detection::{infer, StackAnalyzer};
use stackup::fs::MockFileSystem;
use stackup::stack::{Cache, Database, Framework, JavaBuildTool};
use std::path::Path;
use support::fixture_path;
use yare::parameterized;

#[parameterized(
    node_postgres = { "node-postgres", Framework::Node, &["postgres"], 3000, "npm start" },
    node_mysql_mongo = { "node-mysql-mongo", Framework::Node, &["mysql", "mongodb", "redis"], 3000, "node index.js" },
    python_fastapi = { "python-fastapi", Framework::FastApi, &["postgres"], 8000, "uvicorn main:app --host 0.0.0.0 --port 8000" },
    python_flask_mysql = { "python-flask-mysql", Framework::Flask, &["mysql", "redis"], 5000, "flask --app wsgi run --host 0.0.0.0 --port 5000" },
    java_maven = { "java-maven", Framework::Java, &["postgres"], 8080, "java -jar app.jar" },
    java_gradle = { "java-gradle", Framework::Java, &["mongodb", "redis"], 8080, "java -jar app.jar" },
    empty = { "empty", Framework::Unknown, &[], 3000, "npm start" },
)]
fn test_fixture_inference(
    fixture: &str,
    framework: Framework,
    services: &[&str],
    port: u16,
    start_command: &str,
) {
    let report = infer(&fixture_path(fixture));

    assert_eq!(report.framework, framework);
    assert_eq!(report.services.ids(), services);
    assert_eq!(report.port, port);
    assert_eq!(report.start_command, start_command);
    assert!(!report.config_found);
    assert!(report.warnings.is_empty());
}

#[test]
fn test_node_engine_and_database_summary() {
    let report = infer(&fixture_path("node-postgres"));
    assert_eq!(report.node_version, "20");
    assert_eq!(report.database, Database::Postgres);
    assert_eq!(report.cache, Cache::NoneDetected);

    let report = infer(&fixture_path("node-mysql-mongo"));
    assert_eq!(report.node_version, "18");
    assert_eq!(report.database, Database::MongoDb);
    assert_eq!(report.cache, Cache::Redis);
}

#[test]
fn test_java_build_tool() {
    let maven = infer(&fixture_path("java-maven"));
    assert_eq!(maven.java_build, Some(JavaBuildTool::Maven));

    let gradle = infer(&fixture_path("java-gradle"));
    assert_eq!(gradle.java_build, Some(JavaBuildTool::Gradle));
    assert_eq!(gradle.database, Database::MongoDb);
}

#[test]
fn test_polyglot_project_warns_and_keeps_every_service() {
    let report = infer(&fixture_path("polyglot"));

    assert_eq!(report.framework, Framework::Java);
    assert_eq!(report.port, 8080);
    assert_eq!(report.services.ids(), vec!["redis", "postgres"]);
    assert_eq!(report.manifests, vec!["package.json", "pom.xml"]);
    assert_eq!(report.warnings.len(), 1);
    assert!(report.warnings[0].starts_with("Multiple stacks detected (node, java)"));
}

#[test]
fn test_database_implies_its_service() {
    for fixture in ["node-postgres", "node-mysql-mongo", "python-fastapi", "java-gradle"] {
        let report = infer(&fixture_path(fixture));
        let service = report
            .database
            .service()
            .unwrap_or_else(|| panic!("{} should have a database", fixture));
        assert!(report.services.contains(service), "{}", fixture);
    }
}

#[test]
fn test_missing_directory_is_unknown() {
    let report = infer(Path::new("/nonexistent/stackup-project"));
    assert!(report.is_unknown());
    assert!(report.services.is_empty());
}

#[test]
fn test_mock_pipfile_with_asyncpg() {
    let fs = MockFileSystem::new();
    fs.add_file("Pipfile", "[packages]\nfastapi = \"*\"\nasyncpg = \"*\"\n");
    fs.add_file("app.py", "");

    let report = StackAnalyzer::new(&fs, Path::new("/project")).analyze();

    assert_eq!(report.framework, Framework::FastApi);
    assert_eq!(report.start_command, "uvicorn app:app --host 0.0.0.0 --port 8000");
    assert_eq!(report.services.ids(), vec!["postgres"]);
}

#[test]
fn test_mock_config_record_sets_flag() {
    let fs = MockFileSystem::new();
    fs.add_file("package.json", "{}");
    fs.add_file(".stackup.json", "{}");

    let report = StackAnalyzer::new(&fs, Path::new("/project")).analyze();

    assert!(report.config_found);
    assert_eq!(report.start_command, "node index.js");
}

#[test]
fn test_inference_is_read_only() {
    let root = fixture_path("python-fastapi");
    let before: Vec<_> = std::fs::read_dir(&root)
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();

    let _ = infer(&root);

    let after: Vec<_> = std::fs::read_dir(&root)
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(before.len(), after.len());
}

#[test]
fn test_unreadable_manifest_does_not_match_its_family() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(dir.path().join("package.json"), [0xff, 0xfe, 0x00]).unwrap();
    std::fs::write(dir.path().join("pom.xml"), "<artifactId>postgresql</artifactId>").unwrap();

    let report = infer(dir.path());

    assert_eq!(report.framework, Framework::Java);
    assert_eq!(report.manifests, vec!["pom.xml"]);
    assert!(report.warnings.is_empty());
}
