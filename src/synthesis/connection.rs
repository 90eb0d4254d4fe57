//! Connection-string variables derived from the active service set

use crate::stack::{ServiceKind, ServiceSet, DEV_PASSWORD, DEV_USER};
use std::collections::BTreeMap;

pub const DATABASE_URL: &str = "DATABASE_URL";
pub const DB_HOST: &str = "DB_HOST";
pub const DB_PORT: &str = "DB_PORT";
pub const DB_USER: &str = "DB_USER";
pub const DB_PASSWORD: &str = "DB_PASSWORD";
pub const DB_NAME: &str = "DB_NAME";
pub const MONGODB_URI: &str = "MONGODB_URI";
pub const REDIS_URL: &str = "REDIS_URL";

/// Every key the config record and env file carry, in write order.
pub const CONNECTION_KEYS: [&str; 8] = [
    DATABASE_URL,
    DB_HOST,
    DB_PORT,
    DB_USER,
    DB_PASSWORD,
    DB_NAME,
    MONGODB_URI,
    REDIS_URL,
];

/// Fixed set of connection variables. Absent services yield empty strings,
/// never missing keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionVars {
    entries: Vec<(&'static str, String)>,
}

impl ConnectionVars {
    pub fn from_services(services: &ServiceSet) -> Self {
        let relational = relational_service(services);

        let (database_url, host, port, user, password, name) = match relational {
            Some(service) => {
                let db_name = service.database_name().unwrap_or_default();
                (
                    url_for(service),
                    service.id().to_string(),
                    service.port().to_string(),
                    DEV_USER.to_string(),
                    DEV_PASSWORD.to_string(),
                    db_name.to_string(),
                )
            }
            None => Default::default(),
        };

        let mongodb_uri = if services.contains(ServiceKind::MongoDb) {
            url_for(ServiceKind::MongoDb)
        } else {
            String::new()
        };
        let redis_url = if services.contains(ServiceKind::Redis) {
            url_for(ServiceKind::Redis)
        } else {
            String::new()
        };

        Self {
            entries: vec![
                (DATABASE_URL, database_url),
                (DB_HOST, host),
                (DB_PORT, port),
                (DB_USER, user),
                (DB_PASSWORD, password),
                (DB_NAME, name),
                (MONGODB_URI, mongodb_uri),
                (REDIS_URL, redis_url),
            ],
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        self.entries.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Only the populated entries.
    pub fn non_empty(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        self.iter().filter(|(_, v)| !v.is_empty())
    }

    pub fn to_map(&self) -> BTreeMap<String, String> {
        self.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }
}

/// Postgres wins over MySQL when both are active.
pub fn relational_service(services: &ServiceSet) -> Option<ServiceKind> {
    [ServiceKind::Postgres, ServiceKind::MySql]
        .into_iter()
        .find(|s| services.contains(*s))
}

/// In-network connection URL for `service`.
pub fn url_for(service: ServiceKind) -> String {
    let host = service.id();
    let port = service.port();
    let db = service.database_name().unwrap_or_default();
    match service {
        ServiceKind::Postgres => format!(
            "postgresql://{}:{}@{}:{}/{}",
            DEV_USER, DEV_PASSWORD, host, port, db
        ),
        ServiceKind::MySql => format!(
            "mysql://{}:{}@{}:{}/{}",
            DEV_USER, DEV_PASSWORD, host, port, db
        ),
        ServiceKind::MongoDb => format!(
            "mongodb://{}:{}@{}:{}/{}?authSource=admin",
            DEV_USER, DEV_PASSWORD, host, port, db
        ),
        ServiceKind::Redis => format!("redis://{}:{}", host, port),
    }
}
