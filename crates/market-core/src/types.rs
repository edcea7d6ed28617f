//! # Record Types
//!
//! One struct per marketplace table, plus the input shapes used to create
//! and edit users.
//!
//! ## Table Graph
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Foreign Key Graph                                │
//! │                                                                         │
//! │  Location ◄── Owner ◄──┬── User ◄──────────┐                           │
//! │                        │                    │                           │
//! │                        └── OwnerItem        ItemToBuy                   │
//! │                               │             │                           │
//! │  ItemCategory ◄── Item ◄──────┴─────────────┘                           │
//! │                                                                         │
//! │  Every arrow cascades on delete and update of the parent.               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Every record has an `id: i64` surrogate key assigned by the store.
//! Ids only grow and are never reused after a delete.

use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

// =============================================================================
// Location
// =============================================================================

/// A place where owners keep their items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Location {
    pub id: i64,
    /// Display name, unique across all locations.
    pub location: String,
}

// =============================================================================
// Owner
// =============================================================================

/// Someone renting out items. Users point at an owner row when `is_owner` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Owner {
    pub id: i64,
    pub location_id: Option<i64>,
}

// =============================================================================
// Items
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct ItemCategory {
    pub id: i64,
    /// Category name, unique.
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Item {
    pub id: i64,
    /// Item name, unique.
    pub name: String,
    pub item_category_id: Option<i64>,
}

/// An owner's listing of an item: how many they have and at what price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct OwnerItem {
    pub id: i64,
    pub quantity: i64,
    /// Two-place decimal price held in cents, e.g. `1250` is 12.50.
    pub price: i64,
    pub description: Option<String>,
    pub owner_id: Option<i64>,
    pub item_id: Option<i64>,
}

// =============================================================================
// User
// =============================================================================

/// A stored user row.
///
/// `password` is an opaque string; hashing belongs to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub is_owner: bool,
    pub owner_id: Option<i64>,
}

/// Fields accepted when creating a user.
///
/// `is_owner` and `owner_id` are optional; when omitted the column
/// defaults apply (`false` and `NULL`).
///
/// ## Example
/// ```rust
/// use market_core::NewUser;
///
/// let user = NewUser::new("dragon", "pass", "Dragon");
/// assert_eq!(user.is_owner, None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(deny_unknown_fields)]
#[ts(export)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub is_owner: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub owner_id: Option<i64>,
}

impl NewUser {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        first_name: impl Into<String>,
    ) -> Self {
        NewUser {
            username: username.into(),
            password: password.into(),
            first_name: first_name.into(),
            is_owner: None,
            owner_id: None,
        }
    }

    /// Marks the user as the given owner (`is_owner = true`, `owner_id = owner_id`).
    pub fn owner(mut self, owner_id: i64) -> Self {
        self.is_owner = Some(true);
        self.owner_id = Some(owner_id);
        self
    }
}

/// A partial update to a user row.
///
/// Only fields that are `Some` are written. `owner_id` is tri-state:
/// absent (`None`), cleared (`Some(None)`), or set (`Some(Some(id))`).
///
/// ## Example
/// ```rust
/// use market_core::UserChanges;
///
/// let changes = UserChanges::default().first_name("Jeremy");
/// assert!(!changes.is_empty());
/// assert!(UserChanges::default().is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(deny_unknown_fields)]
#[ts(export)]
pub struct UserChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub is_owner: Option<bool>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present"
    )]
    #[ts(optional)]
    pub owner_id: Option<Option<i64>>,
}

impl UserChanges {
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn first_name(mut self, first_name: impl Into<String>) -> Self {
        self.first_name = Some(first_name.into());
        self
    }

    pub fn is_owner(mut self, is_owner: bool) -> Self {
        self.is_owner = Some(is_owner);
        self
    }

    /// Sets (`Some(id)`) or clears (`None`) the owner reference.
    pub fn owner_id(mut self, owner_id: Option<i64>) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    /// True when no field would be written.
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.password.is_none()
            && self.first_name.is_none()
            && self.is_owner.is_none()
            && self.owner_id.is_none()
    }
}

/// Maps a present JSON key to `Some`, so `"owner_id": null` becomes
/// `Some(None)` while a missing key stays `None` via `#[serde(default)]`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

// =============================================================================
// Want List
// =============================================================================

/// A user's want-list entry for an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct ItemToBuy {
    pub id: i64,
    pub item_id: Option<i64>,
    pub user_id: Option<i64>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_leaves_defaults_unset() {
        let user = NewUser::new("dragon", "pass", "Dragon");
        assert_eq!(user.username, "dragon");
        assert_eq!(user.is_owner, None);
        assert_eq!(user.owner_id, None);

        let owner = NewUser::new("wolf", "pass", "Wolf").owner(3);
        assert_eq!(owner.is_owner, Some(true));
        assert_eq!(owner.owner_id, Some(3));
    }

    #[test]
    fn test_new_user_rejects_unknown_fields() {
        let json = r#"{"username":"dragon","password":"pass","first_name":"Dragon","role":"admin"}"#;
        let err = serde_json::from_str::<NewUser>(json).unwrap_err();
        assert!(err.to_string().contains("unknown field"));
    }

    #[test]
    fn test_new_user_requires_username() {
        let json = r#"{"password":"pass","first_name":"Dragon"}"#;
        assert!(serde_json::from_str::<NewUser>(json).is_err());
    }

    #[test]
    fn test_changes_reject_id() {
        let json = r#"{"id":7,"first_name":"Jess"}"#;
        assert!(serde_json::from_str::<UserChanges>(json).is_err());
    }

    #[test]
    fn test_changes_owner_id_tri_state() {
        let absent: UserChanges = serde_json::from_str(r#"{"first_name":"Jess"}"#).unwrap();
        assert_eq!(absent.owner_id, None);

        let cleared: UserChanges = serde_json::from_str(r#"{"owner_id":null}"#).unwrap();
        assert_eq!(cleared.owner_id, Some(None));

        let set: UserChanges = serde_json::from_str(r#"{"owner_id":4}"#).unwrap();
        assert_eq!(set.owner_id, Some(Some(4)));
    }

    #[test]
    fn test_changes_builder() {
        let changes = UserChanges::default().first_name("Jeremy").is_owner(true);
        assert_eq!(changes.first_name.as_deref(), Some("Jeremy"));
        assert_eq!(changes.is_owner, Some(true));
        assert!(changes.username.is_none());
        assert!(!changes.is_empty());
    }

    #[test]
    fn test_user_serializes_null_owner() {
        let user = User {
            id: 1,
            username: "dragon".to_string(),
            password: "pass".to_string(),
            first_name: "Dragon".to_string(),
            is_owner: false,
            owner_id: None,
        };
        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value["owner_id"], serde_json::Value::Null);
        assert_eq!(value["is_owner"], false);
    }

    #[test]
    fn test_optional_fields_export_as_optional_keys() {
        let new_user = NewUser::decl();
        assert!(new_user.contains("username: string"), "{new_user}");
        assert!(new_user.contains("is_owner?: boolean"), "{new_user}");
        assert!(new_user.contains("owner_id?:"), "{new_user}");

        let changes = UserChanges::decl();
        assert!(changes.contains("first_name?: string"), "{changes}");
        assert!(changes.contains("is_owner?: boolean"), "{changes}");
        assert!(changes.contains("owner_id?:"), "{changes}");
        assert!(changes.contains("| null"), "{changes}");
    }
}
