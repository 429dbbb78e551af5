pub mod config;
pub mod db;
pub mod error;
pub mod loader;
pub mod provider;
mod utils;
mod values;

pub use error::{ErrorKind, InventoryError, ValidationError};
pub use inventory_contract as contract;
pub use loader::{LoaderHandle, ProductLoader};
pub use provider::{ContentValues, ProductProvider, RowSet, Selection, Value};
