use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, FromRow)]
pub struct Product {
    #[serde(rename = "_id")]
    #[sqlx(rename = "_id")]
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    /// Smallest currency unit; `None` until the seller sets one.
    pub price: Option<i64>,
    pub quantity: i64,
    /// Opaque URI string of the product photo.
    pub picture: Option<String>,
    #[serde(rename = "soldQuantity")]
    #[sqlx(rename = "soldQuantity")]
    pub sold_quantity: i64,
    #[serde(rename = "soldProfit")]
    #[sqlx(rename = "soldProfit")]
    pub sold_profit: i64,
}
