//! # Declarative Schema
//!
//! Table descriptors for the marketplace, rendered to SQLite DDL.
//!
//! ## Table Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Create order (drop runs backwards)                   │
//! │                                                                         │
//! │  1. locations                                                          │
//! │  2. owners          ──► locations                                      │
//! │  3. item_categories                                                    │
//! │  4. items           ──► item_categories                                │
//! │  5. owner_items     ──► owners, items                                  │
//! │  6. users           ──► owners                                         │
//! │  7. items_to_buy    ──► items, users                                   │
//! │                                                                         │
//! │  A table only references tables created before it.                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Column Rendering
//! | ColumnType   | SQLite                                         |
//! |--------------|------------------------------------------------|
//! | `Increments` | `INTEGER PRIMARY KEY AUTOINCREMENT`            |
//! | `String`     | `TEXT` + `CHECK (length(col) <= max)`          |
//! | `Text`       | `TEXT`                                         |
//! | `Integer`    | `INTEGER`                                      |
//! | `Cents`      | `INTEGER` (decimal with two places, in cents)  |
//! | `Boolean`    | `BOOLEAN NOT NULL DEFAULT 0/1`                 |
//!
//! `AUTOINCREMENT` keeps SQLite from handing out the id of a deleted row
//! again.

use market_core::MAX_STRING_LEN;

/// Storage type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    /// Store-assigned surrogate key.
    Increments,
    /// Bounded string.
    String { max_len: usize },
    /// Unbounded text.
    Text,
    Integer,
    /// Fixed two-place decimal stored as integer minor units.
    Cents,
    /// Boolean flag with a default; never NULL.
    Boolean { default: bool },
}

/// Parent column a foreign key points at. Always cascades.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForeignKey {
    pub table: &'static str,
    pub column: &'static str,
}

/// One column of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: &'static str,
    pub ty: ColumnType,
    pub not_null: bool,
    pub unique: bool,
    pub references: Option<ForeignKey>,
}

impl ColumnDef {
    const fn new(name: &'static str, ty: ColumnType) -> Self {
        ColumnDef {
            name,
            ty,
            not_null: false,
            unique: false,
            references: None,
        }
    }

    pub const fn increments(name: &'static str) -> Self {
        ColumnDef::new(name, ColumnType::Increments)
    }

    pub const fn string(name: &'static str, max_len: usize) -> Self {
        ColumnDef::new(name, ColumnType::String { max_len })
    }

    pub const fn text(name: &'static str) -> Self {
        ColumnDef::new(name, ColumnType::Text)
    }

    pub const fn integer(name: &'static str) -> Self {
        ColumnDef::new(name, ColumnType::Integer)
    }

    pub const fn cents(name: &'static str) -> Self {
        ColumnDef::new(name, ColumnType::Cents)
    }

    pub const fn boolean(name: &'static str, default: bool) -> Self {
        ColumnDef::new(name, ColumnType::Boolean { default })
    }

    pub const fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    pub const fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Integer reference to `table.column`, cascading on delete and update.
    pub const fn references(mut self, table: &'static str, column: &'static str) -> Self {
        self.references = Some(ForeignKey { table, column });
        self
    }

    /// Renders the column definition as it appears inside `CREATE TABLE`.
    pub fn to_sql(&self) -> String {
        let mut sql = format!("\"{}\"", self.name);

        match self.ty {
            ColumnType::Increments => {
                sql.push_str(" INTEGER PRIMARY KEY AUTOINCREMENT");
                return sql;
            }
            ColumnType::String { .. } | ColumnType::Text => sql.push_str(" TEXT"),
            ColumnType::Integer | ColumnType::Cents => sql.push_str(" INTEGER"),
            ColumnType::Boolean { .. } => sql.push_str(" BOOLEAN"),
        }

        if self.not_null || matches!(self.ty, ColumnType::Boolean { .. }) {
            sql.push_str(" NOT NULL");
        }
        if let ColumnType::Boolean { default } = self.ty {
            sql.push_str(if default { " DEFAULT 1" } else { " DEFAULT 0" });
        }
        if self.unique {
            sql.push_str(" UNIQUE");
        }
        if let ColumnType::String { max_len } = self.ty {
            sql.push_str(&format!(" CHECK (length(\"{}\") <= {})", self.name, max_len));
        }
        if let Some(fk) = self.references {
            sql.push_str(&format!(
                " REFERENCES \"{}\" (\"{}\") ON DELETE CASCADE ON UPDATE CASCADE",
                fk.table, fk.column
            ));
        }

        sql
    }
}

/// A table: name plus ordered columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableDef {
    pub name: &'static str,
    pub columns: &'static [ColumnDef],
}

impl TableDef {
    pub fn create_sql(&self) -> String {
        let columns = self
            .columns
            .iter()
            .map(|c| format!("    {}", c.to_sql()))
            .collect::<Vec<_>>()
            .join(",\n");

        format!("CREATE TABLE IF NOT EXISTS \"{}\" (\n{}\n)", self.name, columns)
    }

    pub fn drop_sql(&self) -> String {
        format!("DROP TABLE IF EXISTS \"{}\"", self.name)
    }

    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }
}

// =============================================================================
// Marketplace Tables
// =============================================================================

pub const LOCATIONS: TableDef = TableDef {
    name: "locations",
    columns: &[
        ColumnDef::increments("id"),
        ColumnDef::string("location", MAX_STRING_LEN).not_null().unique(),
    ],
};

pub const OWNERS: TableDef = TableDef {
    name: "owners",
    columns: &[
        ColumnDef::increments("id"),
        ColumnDef::integer("location_id").references("locations", "id"),
    ],
};

pub const ITEM_CATEGORIES: TableDef = TableDef {
    name: "item_categories",
    columns: &[
        ColumnDef::increments("id"),
        ColumnDef::string("category", MAX_STRING_LEN).not_null().unique(),
    ],
};

pub const ITEMS: TableDef = TableDef {
    name: "items",
    columns: &[
        ColumnDef::increments("id"),
        ColumnDef::string("name", MAX_STRING_LEN).not_null().unique(),
        ColumnDef::integer("item_category_id").references("item_categories", "id"),
    ],
};

pub const OWNER_ITEMS: TableDef = TableDef {
    name: "owner_items",
    columns: &[
        ColumnDef::increments("id"),
        ColumnDef::integer("quantity").not_null(),
        ColumnDef::cents("price").not_null(),
        ColumnDef::text("description"),
        ColumnDef::integer("owner_id").references("owners", "id"),
        ColumnDef::integer("item_id").references("items", "id"),
    ],
};

pub const USERS: TableDef = TableDef {
    name: "users",
    columns: &[
        ColumnDef::increments("id"),
        ColumnDef::string("username", MAX_STRING_LEN).not_null().unique(),
        ColumnDef::string("password", MAX_STRING_LEN).not_null(),
        ColumnDef::string("first_name", MAX_STRING_LEN).not_null(),
        ColumnDef::boolean("is_owner", false),
        ColumnDef::integer("owner_id").references("owners", "id"),
    ],
};

pub const ITEMS_TO_BUY: TableDef = TableDef {
    name: "items_to_buy",
    columns: &[
        ColumnDef::increments("id"),
        ColumnDef::integer("item_id").references("items", "id"),
        ColumnDef::integer("user_id").references("users", "id"),
    ],
};

/// Every marketplace table in creation order.
pub const MARKETPLACE_TABLES: &[TableDef] = &[
    LOCATIONS,
    OWNERS,
    ITEM_CATEGORIES,
    ITEMS,
    OWNER_ITEMS,
    USERS,
    ITEMS_TO_BUY,
];
