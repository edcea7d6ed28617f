//! # market-core: Marketplace Record Types
//!
//! Plain data for the seven marketplace tables. Nothing in this crate
//! touches a database; `market-db` maps these types to rows.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Marketplace Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              HTTP handlers (outside this workspace)             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ NewUser / UserChanges (JSON)           │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ market-core (THIS CRATE) ★                      │   │
//! │  │   Location  Owner  ItemCategory  Item  OwnerItem  User  ItemToBuy│  │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 market-db (Database Layer)                      │   │
//! │  │          schema, migrations, UserRepository                     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example Usage
//!
//! ```rust
//! use market_core::{NewUser, UserChanges};
//!
//! let new_user = NewUser::new("dragon", "pass", "Dragon");
//! let rename = UserChanges::default().first_name("Jess");
//! assert_eq!(new_user.first_name, "Dragon");
//! assert_eq!(rename.first_name.as_deref(), Some("Jess"));
//! ```

pub mod types;

pub use types::*;

/// Upper bound on the length of bounded string columns
/// (usernames, passwords, names, categories, locations).
pub const MAX_STRING_LEN: usize = 256;
