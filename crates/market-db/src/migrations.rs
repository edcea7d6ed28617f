//! # Database Migrations
//!
//! Versioned apply/rollback over the declarative schema in [`crate::schema`].
//!
//! ## How Migrations Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Migration Process                                  │
//! │                                                                         │
//! │  run_migrations()                                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CREATE TABLE IF NOT EXISTS _schema_migrations                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  For each migration not yet recorded (ascending version):              │
//! │       ├── BEGIN                                                         │
//! │       ├── CREATE TABLE ... (tables in listed order)                    │
//! │       ├── INSERT INTO _schema_migrations                               │
//! │       └── COMMIT                                                        │
//! │                                                                         │
//! │  rollback_last()                                                       │
//! │       ├── BEGIN                                                         │
//! │       ├── DROP TABLE ... (tables in reverse order)                     │
//! │       ├── DELETE FROM _schema_migrations WHERE version = ?             │
//! │       └── COMMIT                                                        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Adding New Migrations
//!
//! 1. Describe the new tables in `schema.rs`
//! 2. Append a [`Migration`] to [`MIGRATIONS`] with a larger version
//! 3. **NEVER** edit a migration that has shipped - always add a new one

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::schema::{TableDef, MARKETPLACE_TABLES};

/// Bookkeeping table recording applied versions.
pub const MIGRATIONS_TABLE: &str = "_schema_migrations";

/// A versioned set of tables created together and dropped together.
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    /// Timestamp-style version, e.g. `20200820170242`.
    pub version: i64,
    pub name: &'static str,
    /// Tables in creation order.
    pub tables: &'static [TableDef],
}

/// Every migration, ascending by version.
pub const MIGRATIONS: &[Migration] = &[Migration {
    version: 20200820170242,
    name: "marketplace_init",
    tables: MARKETPLACE_TABLES,
}];

/// Runs all pending marketplace migrations.
///
/// ## Safety
/// - Idempotent: safe to run multiple times
/// - Transactional: each migration runs in a transaction
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    info!("Checking for pending migrations");

    let applied = apply_pending(pool, MIGRATIONS).await?;

    info!(applied, "All migrations applied successfully");
    Ok(())
}

/// Applies every migration in `migrations` that is not yet recorded.
///
/// Returns how many were applied.
pub async fn apply_pending(pool: &SqlitePool, migrations: &[Migration]) -> DbResult<usize> {
    ensure_migrations_table(pool).await?;

    let applied = applied_versions(pool).await?;
    let mut count = 0;

    for migration in migrations.iter().filter(|m| !applied.contains(&m.version)) {
        apply(pool, migration).await.map_err(|e| {
            DbError::MigrationFailed(format!("{} {}: {}", migration.version, migration.name, e))
        })?;
        count += 1;
    }

    Ok(count)
}

async fn apply(pool: &SqlitePool, migration: &Migration) -> DbResult<()> {
    info!(version = migration.version, name = migration.name, "Applying migration");

    let mut tx = pool.begin().await?;

    for table in migration.tables {
        debug!(table = table.name, "Creating table");
        let sql = table.create_sql();
        sqlx::query(&sql).execute(&mut *tx).await?;
    }

    sqlx::query("INSERT INTO _schema_migrations (version, name) VALUES (?1, ?2)")
        .bind(migration.version)
        .bind(migration.name)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(())
}

/// Reverts the most recently applied marketplace migration.
///
/// ## Returns
/// * `Ok(Some(version))` - The version that was reverted
/// * `Ok(None)` - Nothing was applied
pub async fn rollback_last(pool: &SqlitePool) -> DbResult<Option<i64>> {
    rollback_last_of(pool, MIGRATIONS).await
}

/// Reverts the most recently applied migration out of `migrations`.
pub async fn rollback_last_of(
    pool: &SqlitePool,
    migrations: &[Migration],
) -> DbResult<Option<i64>> {
    ensure_migrations_table(pool).await?;

    let latest = match applied_versions(pool).await?.last() {
        Some(version) => *version,
        None => return Ok(None),
    };

    let migration = migrations
        .iter()
        .find(|m| m.version == latest)
        .ok_or_else(|| DbError::MigrationFailed(format!("unknown applied version {}", latest)))?;

    revert(pool, migration).await.map_err(|e| {
        DbError::MigrationFailed(format!("{} {}: {}", migration.version, migration.name, e))
    })?;

    Ok(Some(latest))
}

/// Reverts every applied marketplace migration, newest first.
///
/// Returns how many were reverted.
pub async fn rollback_all(pool: &SqlitePool) -> DbResult<usize> {
    let mut count = 0;
    while rollback_last(pool).await?.is_some() {
        count += 1;
    }
    Ok(count)
}

async fn revert(pool: &SqlitePool, migration: &Migration) -> DbResult<()> {
    info!(version = migration.version, name = migration.name, "Reverting migration");

    let mut tx = pool.begin().await?;

    for table in migration.tables.iter().rev() {
        debug!(table = table.name, "Dropping table");
        let sql = table.drop_sql();
        sqlx::query(&sql).execute(&mut *tx).await?;
    }

    sqlx::query("DELETE FROM _schema_migrations WHERE version = ?1")
        .bind(migration.version)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(())
}

/// Returns information about migrations.
///
/// ## Returns
/// Tuple of (total_migrations, applied_migrations)
pub async fn migration_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let total = MIGRATIONS.len();

    let has_table: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
    )
    .bind(MIGRATIONS_TABLE)
    .fetch_one(pool)
    .await?;

    if has_table == 0 {
        return Ok((total, 0));
    }

    Ok((total, applied_versions(pool).await?.len()))
}

async fn ensure_migrations_table(pool: &SqlitePool) -> DbResult<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS _schema_migrations (
            version INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn applied_versions(pool: &SqlitePool) -> DbResult<Vec<i64>> {
    let versions: Vec<i64> = sqlx::query_scalar("SELECT version FROM _schema_migrations ORDER BY version")
        .fetch_all(pool)
        .await?;

    Ok(versions)
}
