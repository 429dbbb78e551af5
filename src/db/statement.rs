//! Dynamic SQL for the `products` table.
//!
//! Column names always come from the contract, never from callers; caller
//! input reaches SQL only through the `WHERE` fragment of a `Selection` and
//! through bound arguments.

use inventory_contract::{Column, TABLE_NAME};
use sqlx::Sqlite;
use sqlx::query::Query;
use sqlx::sqlite::SqliteArguments;
use std::fmt::Write as _;

use crate::error::ValidationError;
use crate::values::{ContentValues, Selection, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderTerm {
    pub column: Column,
    pub direction: Direction,
}

/// Parses `column [ASC|DESC], ...`. A blank string means "no ordering".
pub fn parse_order(order: &str) -> Result<Vec<OrderTerm>, ValidationError> {
    if order.trim().is_empty() {
        return Ok(Vec::new());
    }

    order
        .split(',')
        .map(|term| {
            let invalid = || ValidationError::InvalidSortOrder(order.to_string());
            let mut parts = term.split_whitespace();
            let column = parts
                .next()
                .and_then(Column::from_name)
                .ok_or_else(invalid)?;
            let direction = match parts.next() {
                None => Direction::Asc,
                Some(d) if d.eq_ignore_ascii_case("asc") => Direction::Asc,
                Some(d) if d.eq_ignore_ascii_case("desc") => Direction::Desc,
                Some(_) => return Err(invalid()),
            };
            if parts.next().is_some() {
                return Err(invalid());
            }
            Ok(OrderTerm { column, direction })
        })
        .collect()
}

/// A SQL string and its positional arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub sql: String,
    pub args: Vec<Value>,
}

impl Statement {
    pub fn select(projection: &[Column], selection: &Selection, order: &[OrderTerm]) -> Self {
        let columns = projection
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let mut sql = format!("SELECT {columns} FROM {TABLE_NAME}");
        push_where(&mut sql, selection);

        if !order.is_empty() {
            let terms = order
                .iter()
                .map(|t| match t.direction {
                    Direction::Asc => format!("{} ASC", t.column),
                    Direction::Desc => format!("{} DESC", t.column),
                })
                .collect::<Vec<_>>()
                .join(", ");
            let _ = write!(sql, " ORDER BY {terms}");
        }

        Self {
            sql,
            args: selection.args.clone(),
        }
    }

    pub fn count(selection: &Selection) -> Self {
        let mut sql = format!("SELECT COUNT(*) FROM {TABLE_NAME}");
        push_where(&mut sql, selection);
        Self {
            sql,
            args: selection.args.clone(),
        }
    }

    pub fn insert(values: &ContentValues) -> Self {
        if values.is_empty() {
            return Self {
                sql: format!("INSERT INTO {TABLE_NAME} DEFAULT VALUES"),
                args: Vec::new(),
            };
        }

        let (columns, args): (Vec<_>, Vec<_>) =
            values.iter().map(|(c, v)| (c.as_str(), v.clone())).unzip();
        let placeholders = vec!["?"; columns.len()].join(", ");
        Self {
            sql: format!(
                "INSERT INTO {TABLE_NAME} ({}) VALUES ({placeholders})",
                columns.join(", ")
            ),
            args,
        }
    }

    /// Caller guarantees `values` is non-empty.
    pub fn update(values: &ContentValues, selection: &Selection) -> Self {
        let assignments = values
            .iter()
            .map(|(c, _)| format!("{c} = ?"))
            .collect::<Vec<_>>()
            .join(", ");
        let mut sql = format!("UPDATE {TABLE_NAME} SET {assignments}");
        push_where(&mut sql, selection);

        let mut args: Vec<Value> = values.iter().map(|(_, v)| v.clone()).collect();
        args.extend(selection.args.iter().cloned());
        Self { sql, args }
    }

    pub fn delete(selection: &Selection) -> Self {
        let mut sql = format!("DELETE FROM {TABLE_NAME}");
        push_where(&mut sql, selection);
        Self {
            sql,
            args: selection.args.clone(),
        }
    }

    /// One unit sold, applied in a single statement. The guard skips rows that
    /// are out of stock or whose sold totals would pass `i64::MAX`; SQLite
    /// widens such a sum to REAL instead of failing.
    pub fn sell(id: i64) -> Self {
        let (qty, sold, profit, price) = (
            Column::Quantity,
            Column::SoldQuantity,
            Column::SoldProfit,
            Column::Price,
        );
        let max = i64::MAX;
        Self {
            sql: format!(
                "UPDATE {TABLE_NAME} SET {qty} = {qty} - 1, {sold} = {sold} + 1, \
                 {profit} = {profit} + COALESCE({price}, 0) \
                 WHERE {id_col} = ? AND {qty} > 0 AND {sold} < {max} \
                 AND COALESCE({price}, 0) >= 0 AND {profit} <= {max} - COALESCE({price}, 0)",
                id_col = Column::Id,
            ),
            args: vec![Value::Integer(id)],
        }
    }

    /// Builds the sqlx query with every argument bound in order.
    pub fn query(&self) -> Query<'_, Sqlite, SqliteArguments<'_>> {
        self.args
            .iter()
            .fold(sqlx::query::<Sqlite>(self.sql.as_str()), |q, arg| match arg {
                Value::Null => q.bind(None::<i64>),
                Value::Integer(v) => q.bind(*v),
                Value::Text(s) => q.bind(s.as_str()),
            })
    }
}

fn push_where(sql: &mut String, selection: &Selection) {
    if let Some(clause) = selection.clause.as_deref().filter(|_| !selection.is_all()) {
        let _ = write!(sql, " WHERE ({clause})");
    }
}
