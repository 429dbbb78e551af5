//! Storage engine: the only code that opens the product database.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows
//! - `schema.rs`: SQL DDL and schema version (SQLite-first)
//! - `statement.rs`: dynamic SQL built from contract columns
//! - `actor.rs`: `DbActor`, owner of the pool and the version lifecycle

pub mod actor;
pub mod models;
pub mod schema;
pub mod statement;

pub use actor::{DbActorHandle, QueryPlan, open, spawn};
pub use models::Product;
pub use schema::{SCHEMA_VERSION, SQLITE_INIT};
pub use statement::{Direction, OrderTerm, parse_order};
