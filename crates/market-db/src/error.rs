//! # Database Error Types
//!
//! Error types for database operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbError (this module) ← Categorized, message kept verbatim            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Caller (HTTP layer) decides what the user sees                        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing here retries or recovers. A zero-row update or delete is not an
//! error and never reaches this module.

use std::fmt;

use thiserror::Error;

/// Which store rule a write broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    /// UNIQUE index (username, item name, location, category).
    Unique,
    /// Dangling reference to a parent row.
    ForeignKey,
    /// Required column left empty.
    NotNull,
    /// CHECK rule, e.g. a string longer than 256 characters.
    Check,
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConstraintKind::Unique => "unique",
            ConstraintKind::ForeignKey => "foreign key",
            ConstraintKind::NotNull => "not null",
            ConstraintKind::Check => "check",
        };
        f.write_str(name)
    }
}

/// Database operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// A write broke a store constraint.
    ///
    /// ## When This Occurs
    /// - Inserting a duplicate username
    /// - Pointing `owner_id` at a missing owner
    /// - Leaving a required column NULL
    /// - Exceeding a length CHECK
    #[error("{kind} constraint violated: {message}")]
    ConstraintViolation {
        kind: ConstraintKind,
        message: String,
    },

    /// Entity not found in database.
    ///
    /// Lookups that may legitimately miss return `Option` instead.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// The store could not be reached.
    ///
    /// ## When This Occurs
    /// - Database file can't be opened or created
    /// - Pool closed or acquire timed out
    /// - I/O failure mid-query
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// Applying or reverting a migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// The store rejected a statement for another reason.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, DbError::ConstraintViolation { .. })
    }

    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            DbError::ConstraintViolation {
                kind: ConstraintKind::Unique,
                ..
            }
        )
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound            → DbError::NotFound
/// sqlx::Error::Database (constraint)  → DbError::ConstraintViolation
/// sqlx::Error::Database (other)       → DbError::QueryFailed
/// Io / Tls / Protocol / Pool*         → DbError::StoreUnavailable
/// Other                               → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::not_found("Record", "unknown"),

            sqlx::Error::Database(db_err) => {
                let message = db_err.message().to_string();
                let kind = match db_err.kind() {
                    sqlx::error::ErrorKind::UniqueViolation => Some(ConstraintKind::Unique),
                    sqlx::error::ErrorKind::ForeignKeyViolation => {
                        Some(ConstraintKind::ForeignKey)
                    }
                    sqlx::error::ErrorKind::NotNullViolation => Some(ConstraintKind::NotNull),
                    sqlx::error::ErrorKind::CheckViolation => Some(ConstraintKind::Check),
                    _ => None,
                };

                match kind {
                    Some(kind) => DbError::ConstraintViolation { kind, message },
                    None => DbError::QueryFailed(message),
                }
            }

            sqlx::Error::Io(e) => DbError::StoreUnavailable(e.to_string()),
            sqlx::Error::Tls(e) => DbError::StoreUnavailable(e.to_string()),
            sqlx::Error::Protocol(msg) => DbError::StoreUnavailable(msg),
            sqlx::Error::PoolTimedOut => {
                DbError::StoreUnavailable("Timed out acquiring a connection".to_string())
            }
            sqlx::Error::PoolClosed => DbError::StoreUnavailable("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;
