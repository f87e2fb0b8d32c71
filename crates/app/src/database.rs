//! Database connection management

use sqlx::{
    PgPool, Postgres, Row, Transaction,
    error::{DatabaseError, ErrorKind},
    migrate::MigrateError,
    postgres::PgRow,
};
use thiserror::Error;

/// Error returned by every storage collaborator.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("document not found")]
    NotFound,

    #[error("document already exists")]
    AlreadyExists,

    #[error("document was modified concurrently")]
    VersionConflict,

    #[error("storage error")]
    Sql(#[source] sqlx::Error),

    #[error("malformed document")]
    Document(#[from] serde_json::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StorageError {
    fn from(error: sqlx::Error) -> Self {
        if matches!(error, sqlx::Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            _ => Self::Sql(error),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Db {
    pool: PgPool,
}

impl Db {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Begin a transaction scoped to a single document write.
    ///
    /// # Errors
    ///
    /// Returns an error when starting the transaction fails.
    pub async fn begin_transaction(&self) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        self.pool.begin().await
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Connect to `PostgreSQL`.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPool::connect(database_url).await
}

/// Apply the bundled schema migrations.
///
/// # Errors
///
/// Returns an error if any migration fails to apply.
pub async fn migrate(pool: &PgPool) -> Result<(), MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await
}

/// Read a non-negative `BIGINT` column.
pub(crate) fn try_get_u64(row: &PgRow, col: &str) -> Result<u64, sqlx::Error> {
    let value: i64 = row.try_get(col)?;

    u64::try_from(value).map_err(|e| sqlx::Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(e),
    })
}

/// Convert an unsigned amount for binding to a `BIGINT` column.
pub(crate) fn to_i64(value: u64, col: &str) -> Result<i64, sqlx::Error> {
    i64::try_from(value).map_err(|e| sqlx::Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(e),
    })
}
