use inventory_contract::Column;
use serde::Serialize;
use url::Url;

use crate::db::Product;
use crate::values::Value;

/// Result of a query, tagged with the address it was produced for so a
/// consumer knows what to subscribe to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowSet {
    address: Url,
    columns: Vec<Column>,
    rows: Vec<Vec<Value>>,
}

impl RowSet {
    pub(crate) fn new(address: Url, columns: Vec<Column>, rows: Vec<Vec<Value>>) -> Self {
        Self {
            address,
            columns,
            rows,
        }
    }

    pub fn address(&self) -> &Url {
        &self.address
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Value]> {
        self.rows.iter().map(Vec::as_slice)
    }

    pub fn column_index(&self, column: Column) -> Option<usize> {
        self.columns.iter().position(|c| *c == column)
    }

    /// Cell at `row` for `column`; `None` if out of range or not projected.
    pub fn get(&self, row: usize, column: Column) -> Option<&Value> {
        let idx = self.column_index(column)?;
        self.rows.get(row)?.get(idx)
    }

    /// Typed view of every row. `None` when a non-nullable column was not
    /// projected or holds something that is not an integer/text.
    pub fn products(&self) -> Option<Vec<Product>> {
        (0..self.rows.len())
            .map(|row| {
                let int = |c| self.get(row, c).and_then(Value::as_i64);
                let text = |c| self.get(row, c).and_then(Value::as_text);
                let optional_text = |c| self.column_index(c).map(|_| text(c));
                let optional_int = |c| self.column_index(c).map(|_| int(c));

                Some(Product {
                    id: int(Column::Id)?,
                    name: text(Column::Name)?,
                    description: optional_text(Column::Description)?,
                    price: optional_int(Column::Price)?,
                    quantity: int(Column::Quantity)?,
                    picture: optional_text(Column::Picture)?,
                    sold_quantity: int(Column::SoldQuantity)?,
                    sold_profit: int(Column::SoldProfit)?,
                })
            })
            .collect()
    }
}
