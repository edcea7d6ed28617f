//! # User Repository
//!
//! The only code that reads or writes the `users` table.
//!
//! ## Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    One statement per operation                          │
//! │                                                                         │
//! │  list()              SELECT ... FROM users ORDER BY id                 │
//! │  create(new)         INSERT INTO users (...) VALUES (...) RETURNING id │
//! │  update(id, changes) UPDATE users SET <present fields> WHERE id = ?    │
//! │  delete_by_id(id)    DELETE FROM users WHERE id = ?                    │
//! │  get_by_id(id)       SELECT ... FROM users WHERE id = ?                │
//! │                                                                         │
//! │  Missing ids are not errors:                                           │
//! │    update / delete_by_id → Ok(0)                                       │
//! │    get_by_id             → Ok(None)                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Store failures (constraint violations, an unreachable store) come back as
//! [`DbError`](crate::DbError) unchanged; nothing is retried.

use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use market_core::{NewUser, User, UserChanges};

/// Repository for user database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = UserRepository::new(pool);
///
/// let ids = repo.create(&NewUser::new("dragon", "pass", "Dragon")).await?;
/// let user = repo.get_by_id(ids[0]).await?;
/// ```
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Lists every user in insertion order.
    ///
    /// Returns an empty vector when the table is empty.
    pub async fn list(&self) -> DbResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password, first_name, is_owner, owner_id
            FROM users
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = users.len(), "Listed users");
        Ok(users)
    }

    /// Inserts a new user.
    ///
    /// Columns the caller leaves unset (`is_owner`, `owner_id`) are omitted
    /// from the statement so the column defaults apply.
    ///
    /// ## Returns
    /// * `Ok(vec![id])` - The id assigned by the store
    /// * `Err(DbError::ConstraintViolation)` - Duplicate username, missing
    ///   owner, or an over-long field; no row is written
    pub async fn create(&self, user: &NewUser) -> DbResult<Vec<i64>> {
        debug!(username = %user.username, "Creating user");

        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new("INSERT INTO users (username, password, first_name");
        if user.is_owner.is_some() {
            builder.push(", is_owner");
        }
        if user.owner_id.is_some() {
            builder.push(", owner_id");
        }
        builder.push(") VALUES (");

        {
            let mut values = builder.separated(", ");
            values.push_bind(user.username.as_str());
            values.push_bind(user.password.as_str());
            values.push_bind(user.first_name.as_str());
            if let Some(is_owner) = user.is_owner {
                values.push_bind(is_owner);
            }
            if let Some(owner_id) = user.owner_id {
                values.push_bind(owner_id);
            }
        }
        builder.push(") RETURNING id");

        let id: i64 = builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        debug!(id, username = %user.username, "Created user");
        Ok(vec![id])
    }

    /// Applies a partial update to the user with the given id.
    ///
    /// Only fields present in `changes` are written.
    ///
    /// ## Returns
    /// * `Ok(1)` - The row was updated
    /// * `Ok(0)` - No such id, or `changes` is empty
    /// * `Err(DbError::ConstraintViolation)` - The new username is taken
    pub async fn update(&self, id: i64, changes: &UserChanges) -> DbResult<u64> {
        if changes.is_empty() {
            debug!(id, "Empty user update, nothing to write");
            return Ok(0);
        }

        debug!(id, "Updating user");

        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE users SET ");

        {
            let mut set = builder.separated(", ");
            if let Some(username) = &changes.username {
                set.push("username = ");
                set.push_bind_unseparated(username.as_str());
            }
            if let Some(password) = &changes.password {
                set.push("password = ");
                set.push_bind_unseparated(password.as_str());
            }
            if let Some(first_name) = &changes.first_name {
                set.push("first_name = ");
                set.push_bind_unseparated(first_name.as_str());
            }
            if let Some(is_owner) = changes.is_owner {
                set.push("is_owner = ");
                set.push_bind_unseparated(is_owner);
            }
            if let Some(owner_id) = changes.owner_id {
                set.push("owner_id = ");
                set.push_bind_unseparated(owner_id);
            }
        }

        builder.push(" WHERE id = ");
        builder.push_bind(id);

        let result = builder.build().execute(&self.pool).await?;

        debug!(id, rows = result.rows_affected(), "Updated user");
        Ok(result.rows_affected())
    }

    /// Deletes the user with the given id.
    ///
    /// Deleting a missing id is a no-op. Other rows keep their ids.
    /// Want-list entries of the user are removed by cascade.
    ///
    /// ## Returns
    /// Number of rows removed (0 or 1).
    pub async fn delete_by_id(&self, id: i64) -> DbResult<u64> {
        debug!(id, "Deleting user");

        let result = sqlx::query("DELETE FROM users WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Gets a user by id.
    ///
    /// ## Returns
    /// * `Ok(Some(User))` - User found
    /// * `Ok(None)` - User not found
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password, first_name, is_owner, owner_id
            FROM users
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Counts users (for diagnostics and seeding).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
