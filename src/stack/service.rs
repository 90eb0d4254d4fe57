use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Development credentials shared by every generated service.
pub const DEV_USER: &str = "devuser";
pub const DEV_PASSWORD: &str = "devpassword";

crate::define_id_enum! {
    /// Primary datastore summary; informational only, `ServiceSet` is authoritative
    Database (fallback = NoneDetected) {
        NoneDetected => "None detected",
        Postgres => "Postgres" | "postgres" | "PostgreSQL",
        MySql => "MySQL" | "mysql",
        MongoDb => "MongoDB" | "mongodb",
    }
}

crate::define_id_enum! {
    /// Cache summary
    Cache (fallback = NoneDetected) {
        NoneDetected => "None detected",
        Redis => "Redis" | "redis",
    }
}

impl Database {
    pub fn service(&self) -> Option<ServiceKind> {
        match self {
            Database::NoneDetected => None,
            Database::Postgres => Some(ServiceKind::Postgres),
            Database::MySql => Some(ServiceKind::MySql),
            Database::MongoDb => Some(ServiceKind::MongoDb),
        }
    }
}

impl Cache {
    pub fn service(&self) -> Option<ServiceKind> {
        match self {
            Cache::NoneDetected => None,
            Cache::Redis => Some(ServiceKind::Redis),
        }
    }
}

/// An infrastructure container the environment can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceKind {
    Postgres,
    #[serde(rename = "mysql")]
    MySql,
    #[serde(rename = "mongodb")]
    MongoDb,
    Redis,
}

impl ServiceKind {
    pub const ALL: [ServiceKind; 4] = [
        ServiceKind::Postgres,
        ServiceKind::MySql,
        ServiceKind::MongoDb,
        ServiceKind::Redis,
    ];

    /// Identifier used in reports, the config record and as the compose service name.
    pub fn id(&self) -> &'static str {
        match self {
            ServiceKind::Postgres => "postgres",
            ServiceKind::MySql => "mysql",
            ServiceKind::MongoDb => "mongodb",
            ServiceKind::Redis => "redis",
        }
    }

    /// Well-known port, published unchanged on the host.
    pub fn port(&self) -> u16 {
        match self {
            ServiceKind::Postgres => 5432,
            ServiceKind::MySql => 3306,
            ServiceKind::MongoDb => 27017,
            ServiceKind::Redis => 6379,
        }
    }

    /// Hostname the runtime shims redirect loopback connections to.
    pub fn shim_host(&self) -> &'static str {
        match self {
            ServiceKind::Postgres => "postgres",
            ServiceKind::MySql => "mysql",
            ServiceKind::MongoDb => "mongo",
            ServiceKind::Redis => "redis",
        }
    }

    pub fn image(&self) -> &'static str {
        match self {
            ServiceKind::Postgres => "postgres:15-alpine",
            ServiceKind::MySql => "mysql:8.0",
            ServiceKind::MongoDb => "mongo:7",
            ServiceKind::Redis => "redis:7-alpine",
        }
    }

    /// Database name created inside the container, if the service has one.
    pub fn database_name(&self) -> Option<&'static str> {
        match self {
            ServiceKind::Postgres | ServiceKind::MongoDb => Some("devdb"),
            ServiceKind::MySql => Some("todos_db"),
            ServiceKind::Redis => None,
        }
    }

    pub fn is_relational(&self) -> bool {
        matches!(self, ServiceKind::Postgres | ServiceKind::MySql)
    }

    /// Resolves a logical name, accepting the `mongo` shorthand.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "postgres" | "postgresql" => Some(ServiceKind::Postgres),
            "mysql" => Some(ServiceKind::MySql),
            "mongodb" | "mongo" => Some(ServiceKind::MongoDb),
            "redis" => Some(ServiceKind::Redis),
            _ => None,
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ServiceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| format!("unknown service: {}", s))
    }
}

/// Insertion-ordered, deduplicated set of services. Grows only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceSet(Vec<ServiceKind>);

impl ServiceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `service` unless already present; returns whether it was added.
    pub fn insert(&mut self, service: ServiceKind) -> bool {
        if self.0.contains(&service) {
            return false;
        }
        self.0.push(service);
        true
    }

    pub fn extend(&mut self, other: &ServiceSet) {
        for service in other.iter() {
            self.insert(service);
        }
    }

    pub fn contains(&self, service: ServiceKind) -> bool {
        self.0.contains(&service)
    }

    pub fn iter(&self) -> impl Iterator<Item = ServiceKind> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn ids(&self) -> Vec<&'static str> {
        self.0.iter().map(|s| s.id()).collect()
    }
}

impl FromIterator<ServiceKind> for ServiceSet {
    fn from_iter<I: IntoIterator<Item = ServiceKind>>(iter: I) -> Self {
        let mut set = ServiceSet::new();
        for service in iter {
            set.insert(service);
        }
        set
    }
}
