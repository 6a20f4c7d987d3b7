//! Datastore connection and per-call deadlines.

use std::future::Future;
use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Connection-pool settings.
#[derive(Debug, Clone)]
pub struct DbSettings {
    pub url: String,
    pub max_connections: u32,
    /// Upper bound on waiting for a pooled connection.
    pub acquire_timeout: Duration,
}

pub async fn connect(settings: &DbSettings) -> Result<DatabaseConnection, DbErr> {
    let mut opts = ConnectOptions::new(settings.url.clone());
    opts.max_connections(settings.max_connections)
        .acquire_timeout(settings.acquire_timeout)
        .connect_timeout(settings.acquire_timeout)
        .sqlx_logging(false);
    Database::connect(opts).await
}

/// A store call did not finish within its deadline.
#[derive(Debug, thiserror::Error)]
#[error("{operation} timed out after {after:?}")]
pub struct DeadlineExceeded {
    pub operation: &'static str,
    pub after: Duration,
}

/// Run `fut` with a deadline. On expiry the future is dropped, which rolls back any
/// transaction it had open.
pub async fn with_deadline<F, T>(
    deadline: Duration,
    operation: &'static str,
    fut: F,
) -> Result<T, DeadlineExceeded>
where
    F: Future<Output = T>,
{
    tokio::time::timeout(deadline, fut).await.map_err(|_| {
        tracing::warn!(operation, ?deadline, "store call timed out");
        DeadlineExceeded {
            operation,
            after: deadline,
        }
    })
}
