//! # market-db: Database Layer for the Marketplace
//!
//! SQLite storage for the marketplace schema, with sqlx for async access.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Marketplace Data Flow                            │
//! │                                                                         │
//! │  HTTP handler (create_user)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     market-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │   (user.rs)   │    │  (schema.rs) │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ UserRepo      │    │ 7 tables     │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`config`] - Pool settings, loaded from code or `MARKET_*` env vars
//! - [`pool`] - Connection pool creation
//! - [`schema`] - Declarative table descriptors
//! - [`migrations`] - Versioned apply/rollback of the schema
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use market_core::{NewUser, UserChanges};
//! use market_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::from_env()?).await?;
//!
//! let ids = db.users().create(&NewUser::new("dragon", "pass", "Dragon")).await?;
//! db.users().update(ids[0], &UserChanges::default().first_name("Jess")).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod schema;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{ConfigError, DbConfig, Environment};
pub use error::{ConstraintKind, DbError, DbResult};
pub use pool::Database;

pub use repository::user::UserRepository;
