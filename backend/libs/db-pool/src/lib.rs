//! Database connection configuration and pool bootstrap
//!
//! Resolves the connection descriptor from the deployment environment once at
//! startup and hands it, together with the fixed pooling policy, to sqlx.
//!
//! ```ignore
//! let resolution = db_pool::resolve_and_report_from_env()?;
//! let pool = db_pool::create_pool(&resolution).await?;
//! ```

mod descriptor;
pub mod env_utils;
mod error;
mod report;
mod resolver;

pub use descriptor::{
    ConnectionDescriptor, Password, PoolingPolicy, DEFAULT_POSTGRES_PORT, NATIVE_URI_PREFIX,
};
pub use error::ConfigurationError;
pub use report::resolve_and_report_from_env;
pub use resolver::{
    resolve_from_env, resolve_with, ConnectionScheme, HostnameSource, Resolution,
    ResolutionWarning, DATABASE_PASSWORD, DATABASE_URL, DATABASE_USERNAME, JDBC_DATABASE_URL,
};

use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions, PgSslMode};
use tracing::{debug, error, info};

/// Build driver connect options from a resolved descriptor
pub fn connect_options(descriptor: &ConnectionDescriptor) -> PgConnectOptions {
    // sqlx wants bare IPv6 literals
    let host = descriptor
        .host
        .trim_start_matches('[')
        .trim_end_matches(']');

    let mut options = PgConnectOptions::new()
        .host(host)
        .port(descriptor.port)
        .username(&descriptor.username)
        .password(descriptor.password.expose());

    if let Some(database) = descriptor.database_name() {
        options = options.database(database);
    }

    let ssl_mode = descriptor
        .query_param("sslmode")
        .and_then(|mode| mode.parse::<PgSslMode>().ok());
    match ssl_mode {
        Some(mode) => options = options.ssl_mode(mode),
        None if descriptor.ssl_required => options = options.ssl_mode(PgSslMode::Require),
        None => {}
    }

    if let Some(name) = descriptor.query_param("application_name") {
        options = options.application_name(name);
    }

    options
}

/// Build pool options from the pooling policy
pub fn pool_options(policy: &PoolingPolicy) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(policy.max_pool_size)
        .min_connections(policy.min_idle)
        // Timeout for acquiring a connection from the pool
        .acquire_timeout(policy.connection_timeout())
        // Close connections idle for longer than this
        .idle_timeout(policy.idle_timeout())
        // Maximum lifetime of a connection (to handle stale connections)
        .max_lifetime(policy.max_lifetime())
        // Test connections before returning them from the pool
        .test_before_acquire(true)
}

/// Create a PostgreSQL pool from a resolution and verify it with the
/// policy's validation query
pub async fn create_pool(resolution: &Resolution) -> Result<PgPool, sqlx::Error> {
    let descriptor = &resolution.descriptor;
    let policy = &resolution.policy;

    debug!(
        "Creating database pool: host={}, port={}, max={}, min={}, \
         connection_timeout={}ms, idle_timeout={}ms",
        descriptor.host,
        descriptor.port,
        policy.max_pool_size,
        policy.min_idle,
        policy.connection_timeout_ms,
        policy.idle_timeout_ms
    );
    // sqlx has no leak detector; the threshold is informational only
    debug!(
        leak_detection_threshold_ms = policy.leak_detection_threshold_ms,
        "Leak detection threshold not enforced by driver"
    );

    let pool = pool_options(policy)
        .connect_with(connect_options(descriptor))
        .await?;

    match tokio::time::timeout(
        policy.connection_timeout(),
        sqlx::query(policy.validation_query).execute(&pool),
    )
    .await
    {
        Ok(Ok(_)) => {
            info!(
                host = %descriptor.host,
                hostname_source = resolution.hostname_source.as_str(),
                "Database pool created and verified successfully"
            );
            Ok(pool)
        }
        Ok(Err(e)) => {
            error!(
                host = %descriptor.host,
                error = %e,
                "Database connection verification failed"
            );
            Err(e)
        }
        Err(_) => {
            error!(
                host = %descriptor.host,
                timeout_ms = policy.connection_timeout_ms,
                "Database connection verification timeout"
            );
            Err(sqlx::Error::Io(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                "Database verification timeout",
            )))
        }
    }
}
