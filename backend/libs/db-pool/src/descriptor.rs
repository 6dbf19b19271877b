//! Connection descriptor and pooling policy handed to the pool

use std::fmt;
use std::time::Duration;

/// Default PostgreSQL port, used when the connection string omits one
pub const DEFAULT_POSTGRES_PORT: u16 = 5432;

/// Prefix of the driver-native connection string
pub const NATIVE_URI_PREFIX: &str = "jdbc:postgresql://";

/// Database password
///
/// Never printed: both `Debug` and `Display` render `[REDACTED]`.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Access the raw secret, for handing to the driver only
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl fmt::Display for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

/// Structured database connection target
///
/// Invariants on a successfully resolved descriptor: `host` and `username`
/// are non-empty and `port` is in 1..=65535.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionDescriptor {
    /// Driver-native connection string (`jdbc:postgresql://host:port/db?params`)
    pub connection_string: String,
    pub host: String,
    pub port: u16,
    /// Path component verbatim, including the leading `/`
    pub database_path: String,
    pub username: String,
    pub password: Password,
    /// Query string without the leading `?`
    pub query_params: String,
    pub ssl_required: bool,
}

impl ConnectionDescriptor {
    /// Database name derived from the path (`/books` -> `books`)
    pub fn database_name(&self) -> Option<&str> {
        let name = self.database_path.trim_start_matches('/');
        if name.is_empty() {
            None
        } else {
            Some(name)
        }
    }

    /// Value of a query parameter, if present
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query_params
            .split('&')
            .filter_map(|pair| pair.split_once('=').or(Some((pair, ""))))
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v)
    }

    /// Connection string with its query replaced by `?[params]`, safe for logs
    pub fn redacted_connection_string(&self) -> String {
        match self.connection_string.split_once('?') {
            Some((base, _)) => format!("{}?[params]", base),
            None => self.connection_string.clone(),
        }
    }
}

impl fmt::Debug for ConnectionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionDescriptor")
            .field("connection_string", &self.redacted_connection_string())
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database_path", &self.database_path)
            .field("username", &self.username)
            .field("password", &self.password)
            .field("query_params", &"[REDACTED]")
            .field("ssl_required", &self.ssl_required)
            .finish()
    }
}

/// `sslmode` values that refuse a plaintext connection
pub(crate) fn sslmode_requires_tls(query: &str) -> bool {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .any(|(k, v)| {
            k == "sslmode" && matches!(v, "require" | "verify-ca" | "verify-full")
        })
}

/// Connection pool limits for cloud-hosted databases
///
/// Fixed per resolution; not derived from the connection string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolingPolicy {
    pub max_pool_size: u32,
    pub min_idle: u32,
    pub connection_timeout_ms: u64,
    pub idle_timeout_ms: u64,
    pub max_lifetime_ms: u64,
    pub leak_detection_threshold_ms: u64,
    /// Query the pool runs to probe connection health
    pub validation_query: &'static str,
}

impl Default for PoolingPolicy {
    fn default() -> Self {
        Self {
            max_pool_size: 5,
            min_idle: 2,
            connection_timeout_ms: 30_000, // 30 seconds
            idle_timeout_ms: 600_000, // 10 minutes
            max_lifetime_ms: 1_800_000, // 30 minutes
            leak_detection_threshold_ms: 60_000, // 1 minute
            validation_query: "SELECT 1",
        }
    }
}

impl PoolingPolicy {
    pub fn connection_timeout(&self) -> Duration {
        Duration::from_millis(self.connection_timeout_ms)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_millis(self.idle_timeout_ms)
    }

    pub fn max_lifetime(&self) -> Duration {
        Duration::from_millis(self.max_lifetime_ms)
    }

    pub fn leak_detection_threshold(&self) -> Duration {
        Duration::from_millis(self.leak_detection_threshold_ms)
    }
}
