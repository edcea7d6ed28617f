//! # Repository Module
//!
//! Database repository implementations for the marketplace.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  HTTP handler                                                          │
//! │       │                                                                 │
//! │       │  db.users().get_by_id(7)                                       │
//! │       ▼                                                                 │
//! │  UserRepository                                                        │
//! │  ├── list(&self)                                                       │
//! │  ├── create(&self, new_user)                                           │
//! │  ├── update(&self, id, changes)                                        │
//! │  ├── delete_by_id(&self, id)                                           │
//! │  └── get_by_id(&self, id)                                              │
//! │       │                                                                 │
//! │       │  One SQL statement each                                         │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`UserRepository`](user::UserRepository) - User CRUD
//!
//! The other marketplace tables only serve as foreign key targets and have
//! no repository.

pub mod user;
