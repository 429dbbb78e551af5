mod inventory;
mod validation;

pub use inventory::{ErrorKind, InventoryError};
pub use validation::ValidationError;
