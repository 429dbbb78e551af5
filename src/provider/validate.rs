//! Pre-write checks. Nothing reaches the database unless these pass.

use inventory_contract::Column;

use crate::error::ValidationError;
use crate::values::{ContentValues, Value};

/// Insert: name and quantity are required, price is optional.
pub fn validate_insert(values: &ContentValues) -> Result<(), ValidationError> {
    check_name(values.get(Column::Name))?;
    if let Some(price) = values.get(Column::Price) {
        check_price(price)?;
    }
    check_quantity(values.get(Column::Quantity))?;
    check_no_id(values)
}

/// Update: every field is checked only when its key is present.
pub fn validate_update(values: &ContentValues) -> Result<(), ValidationError> {
    if values.is_empty() {
        return Err(ValidationError::EmptyValues);
    }
    if let Some(name) = values.get(Column::Name) {
        check_name(Some(name))?;
    }
    if let Some(price) = values.get(Column::Price) {
        check_price(price)?;
    }
    if let Some(quantity) = values.get(Column::Quantity) {
        check_quantity(Some(quantity))?;
    }
    check_no_id(values)
}

fn check_name(name: Option<&Value>) -> Result<(), ValidationError> {
    match name {
        Some(v) if !v.is_null() => Ok(()),
        _ => Err(ValidationError::NameRequired),
    }
}

// Null price means "not decided yet".
fn check_price(price: &Value) -> Result<(), ValidationError> {
    if price.is_null() {
        return Ok(());
    }
    match price.as_i64() {
        Some(p) if p >= 0 => Ok(()),
        _ => Err(ValidationError::InvalidPrice),
    }
}

fn check_quantity(quantity: Option<&Value>) -> Result<(), ValidationError> {
    match quantity.and_then(Value::as_i64) {
        Some(q) if q >= 0 => Ok(()),
        _ => Err(ValidationError::InvalidQuantity),
    }
}

fn check_no_id(values: &ContentValues) -> Result<(), ValidationError> {
    if values.contains_key(Column::Id) {
        return Err(ValidationError::ImmutableId);
    }
    Ok(())
}
