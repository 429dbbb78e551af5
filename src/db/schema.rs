//! SQL DDL for initializing the database schema.
//! SQLite-first design; defaults live in the DDL so direct SQL inserts fall back correctly.

/// Version stamped into `PRAGMA user_version` once the schema below exists.
pub const SCHEMA_VERSION: i64 = 1;

/// SQLite schema includes:
/// - `products` table (one product per row, `_id` never reused)
pub const SQLITE_INIT: &str = r#"
-- ---------------------------------------------------------------------------
-- Products
-- ---------------------------------------------------------------------------
CREATE TABLE IF NOT EXISTS products (
    _id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    description TEXT,
    price INTEGER DEFAULT 0,
    quantity INTEGER NOT NULL DEFAULT 0,
    picture TEXT, -- opaque URI string
    soldQuantity INTEGER NOT NULL DEFAULT 0,
    soldProfit INTEGER NOT NULL DEFAULT 0
);
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use inventory_contract::{Column, TABLE_NAME};

    #[test]
    fn ddl_declares_every_contract_column() {
        assert!(SQLITE_INIT.contains(&format!("CREATE TABLE IF NOT EXISTS {TABLE_NAME}")));
        for column in Column::ALL {
            assert!(
                SQLITE_INIT.contains(&format!("    {} ", column.as_str())),
                "missing column {column}"
            );
        }
    }
}
