//! Python ecosystem: `requirements.txt`, `Pipfile`, `pyproject.toml`
//!
//! Requirement files are scanned as lower-cased text rather than parsed, so a
//! keyword anywhere in any present file counts.

use crate::detection::manifest::{Manifest, ManifestFamily};
use crate::detection::report::FamilyFindings;
use crate::stack::{Cache, Database, Framework};

const POSTGRES_KEYWORDS: &[&str] = &["psycopg", "asyncpg"];
const MYSQL_KEYWORDS: &[&str] = &["mysqlclient", "pymysql", "mysql-connector", "aiomysql"];
const GENERIC_ORM: &str = "sqlalchemy";
const POSTGRES_HINT: &str = "postgres";
const MONGO_KEYWORDS: &[&str] = &["pymongo", "motor", "mongoengine"];
const REDIS_KEYWORD: &str = "redis";

/// Entry-point candidates and fallback for each Python flavour.
struct EntryPoint {
    candidates: &'static [&'static str],
    fallback: &'static str,
}

const GENERIC_ENTRY: EntryPoint = EntryPoint {
    candidates: &["app.py", "main.py", "server.py"],
    fallback: "app.py",
};

const FASTAPI_ENTRY: EntryPoint = EntryPoint {
    candidates: &["main.py", "app.py", "server.py"],
    fallback: "main.py",
};

const FLASK_ENTRY: EntryPoint = EntryPoint {
    candidates: &["app.py", "main.py", "server.py", "wsgi.py"],
    fallback: "app.py",
};

impl EntryPoint {
    /// First candidate present on disk, else the fallback even if absent.
    fn resolve(&self, exists: &dyn Fn(&str) -> bool) -> &'static str {
        self.candidates
            .iter()
            .copied()
            .find(|candidate| exists(candidate))
            .unwrap_or(self.fallback)
    }
}

fn module_name(file: &str) -> &str {
    file.strip_suffix(".py").unwrap_or(file)
}

/// Interprets every present requirement/lock file together.
///
/// `exists` answers whether a file is present at the project root and is only
/// used to pick the entry point.
pub fn detect(manifests: &[Manifest], exists: &dyn Fn(&str) -> bool) -> FamilyFindings {
    let text = manifests
        .iter()
        .map(|m| m.content.as_str())
        .collect::<Vec<_>>()
        .join("\n")
        .to_lowercase();
    let mentions = |keywords: &[&str]| keywords.iter().any(|k| text.contains(k));

    let entry = GENERIC_ENTRY.resolve(exists);
    let mut findings = FamilyFindings::new(
        ManifestFamily::Python,
        Framework::Python,
        format!("python {}", entry),
    );

    if mentions(POSTGRES_KEYWORDS) {
        findings.record_database(Database::Postgres);
    } else if mentions(MYSQL_KEYWORDS) {
        findings.record_database(Database::MySql);
    } else if text.contains(GENERIC_ORM) {
        // An ORM alone says nothing about the engine; MySQL unless Postgres is named.
        if text.contains(POSTGRES_HINT) {
            findings.record_database(Database::Postgres);
        } else {
            findings.record_database(Database::MySql);
        }
    }

    if mentions(MONGO_KEYWORDS) {
        findings.record_database(Database::MongoDb);
    }

    if text.contains(REDIS_KEYWORD) {
        findings.record_cache(Cache::Redis);
    }

    if text.contains("fastapi") {
        let module = module_name(FASTAPI_ENTRY.resolve(exists));
        findings.framework = Framework::FastApi;
        findings.port = Framework::FastApi.default_port();
        findings.start_command = format!(
            "uvicorn {}:app --host 0.0.0.0 --port {}",
            module, findings.port
        );
    } else if text.contains("flask") {
        let module = module_name(FLASK_ENTRY.resolve(exists));
        findings.framework = Framework::Flask;
        findings.port = Framework::Flask.default_port();
        findings.start_command = format!(
            "flask --app {} run --host 0.0.0.0 --port {}",
            module, findings.port
        );
    }

    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stack::ServiceKind;

    fn requirements(content: &str) -> Vec<Manifest> {
        vec![Manifest {
            filename: "requirements.txt",
            content: content.to_string(),
        }]
    }

    fn nothing_on_disk(_: &str) -> bool {
        false
    }

    #[test]
    fn test_fastapi_with_psycopg() {
        let findings = detect(&requirements("fastapi\npsycopg2\n"), &nothing_on_disk);

        assert_eq!(findings.framework, Framework::FastApi);
        assert_eq!(findings.database, Some(Database::Postgres));
        assert_eq!(findings.port, 8000);
        assert_eq!(
            findings.start_command,
            "uvicorn main:app --host 0.0.0.0 --port 8000"
        );
    }

    #[test]
    fn test_fastapi_entry_point_prefers_existing_file() {
        let exists = |name: &str| name == "app.py";
        let findings = detect(&requirements("fastapi\n"), &exists);

        assert_eq!(
            findings.start_command,
            "uvicorn app:app --host 0.0.0.0 --port 8000"
        );
    }

    #[test]
    fn test_flask() {
        let exists = |name: &str| name == "wsgi.py";
        let findings = detect(&requirements("Flask==3.0\n"), &exists);

        assert_eq!(findings.framework, Framework::Flask);
        assert_eq!(findings.port, 5000);
        assert_eq!(
            findings.start_command,
            "flask --app wsgi run --host 0.0.0.0 --port 5000"
        );
    }

    #[test]
    fn test_generic_python() {
        let exists = |name: &str| name == "main.py";
        let findings = detect(&requirements("requests\n"), &exists);

        assert_eq!(findings.framework, Framework::Python);
        assert_eq!(findings.port, 5000);
        assert_eq!(findings.start_command, "python main.py");
        assert!(findings.services.is_empty());
    }

    #[test]
    fn test_sqlalchemy_alone_implies_mysql() {
        let findings = detect(&requirements("SQLAlchemy==2.0\n"), &nothing_on_disk);
        assert_eq!(findings.database, Some(Database::MySql));
    }

    #[test]
    fn test_sqlalchemy_with_postgres_hint() {
        let findings = detect(
            &requirements("sqlalchemy[postgresql_asyncpg]\n"),
            &nothing_on_disk,
        );
        assert_eq!(findings.database, Some(Database::Postgres));
    }

    #[test]
    fn test_scan_is_substring_based() {
        let findings = detect(&requirements("django-redis-cache\n"), &nothing_on_disk);
        assert_eq!(findings.cache, Some(Cache::Redis));
    }

    #[test]
    fn test_all_files_in_family_are_scanned() {
        let manifests = vec![
            Manifest {
                filename: "requirements.txt",
                content: "flask\n".to_string(),
            },
            Manifest {
                filename: "Pipfile",
                content: "[packages]\npymongo = \"*\"\n".to_string(),
            },
        ];
        let findings = detect(&manifests, &nothing_on_disk);

        assert_eq!(findings.framework, Framework::Flask);
        assert_eq!(findings.database, Some(Database::MongoDb));
        assert_eq!(findings.services.ids(), vec!["mongodb"]);
    }

    #[test]
    fn test_mongo_overwrites_relational_but_keeps_service() {
        let findings = detect(&requirements("pymysql\nmotor\n"), &nothing_on_disk);

        assert_eq!(findings.database, Some(Database::MongoDb));
        assert!(findings.services.contains(ServiceKind::MySql));
    }
}
