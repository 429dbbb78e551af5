//! Identifiers shared by every layer that touches product data.
//!
//! Nothing here performs I/O: the crate only names the resource namespace,
//! the table and its columns, and the MIME types handed out for list and
//! item responses.

use serde::{Deserialize, Serialize};
use std::{fmt, sync::LazyLock};
use url::Url;

pub const CONTENT_SCHEME: &str = "content";
pub const CONTENT_AUTHORITY: &str = "xyz.kbalto.inventory";
pub const PATH_PRODUCTS: &str = "products";

/// `content://xyz.kbalto.inventory`
pub static BASE_CONTENT_URI: LazyLock<Url> = LazyLock::new(|| {
    Url::parse(&format!("{CONTENT_SCHEME}://{CONTENT_AUTHORITY}"))
        .expect("valid base content URI")
});

/// Collection address: `content://xyz.kbalto.inventory/products`
pub static CONTENT_URI: LazyLock<Url> = LazyLock::new(|| {
    Url::parse(&format!(
        "{CONTENT_SCHEME}://{CONTENT_AUTHORITY}/{PATH_PRODUCTS}"
    ))
    .expect("valid products content URI")
});

/// MIME type for a response covering the whole collection.
pub const CONTENT_LIST_TYPE: &str = "vnd.android.cursor.dir/xyz.kbalto.inventory/products";

/// MIME type for a response covering a single product.
pub const CONTENT_ITEM_TYPE: &str = "vnd.android.cursor.item/xyz.kbalto.inventory/products";

pub const TABLE_NAME: &str = "products";

/// Address of a single product: collection address + `/` + id.
pub fn item_address(id: i64) -> Url {
    let mut url = CONTENT_URI.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().push(&id.to_string());
    }
    url
}

/// Reads the trailing id segment of an item address, if any.
pub fn parse_id(address: &Url) -> Option<i64> {
    address
        .path_segments()?
        .next_back()
        .and_then(|segment| segment.parse::<i64>().ok())
}

/// SQL storage class of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Column {
    #[serde(rename = "_id")]
    Id,
    #[serde(rename = "name")]
    Name,
    #[serde(rename = "description")]
    Description,
    /// Smallest currency unit.
    #[serde(rename = "price")]
    Price,
    #[serde(rename = "quantity")]
    Quantity,
    /// Opaque URI string of the product photo.
    #[serde(rename = "picture")]
    Picture,
    #[serde(rename = "soldQuantity")]
    SoldQuantity,
    #[serde(rename = "soldProfit")]
    SoldProfit,
}

impl Column {
    /// Every column, in table order.
    pub const ALL: [Column; 8] = [
        Column::Id,
        Column::Name,
        Column::Description,
        Column::Price,
        Column::Quantity,
        Column::Picture,
        Column::SoldQuantity,
        Column::SoldProfit,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Column::Id => "_id",
            Column::Name => "name",
            Column::Description => "description",
            Column::Price => "price",
            Column::Quantity => "quantity",
            Column::Picture => "picture",
            Column::SoldQuantity => "soldQuantity",
            Column::SoldProfit => "soldProfit",
        }
    }

    /// Case-sensitive lookup by column name.
    pub fn from_name(name: &str) -> Option<Column> {
        Column::ALL.into_iter().find(|c| c.as_str() == name)
    }

    pub const fn kind(self) -> ColumnKind {
        match self {
            Column::Name | Column::Description | Column::Picture => ColumnKind::Text,
            Column::Id
            | Column::Price
            | Column::Quantity
            | Column::SoldQuantity
            | Column::SoldProfit => ColumnKind::Integer,
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_address_is_stable() {
        assert_eq!(
            CONTENT_URI.as_str(),
            "content://xyz.kbalto.inventory/products"
        );
        assert_eq!(BASE_CONTENT_URI.host_str(), Some(CONTENT_AUTHORITY));
    }

    #[test]
    fn item_address_appends_id() {
        let url = item_address(42);
        assert_eq!(url.as_str(), "content://xyz.kbalto.inventory/products/42");
        assert_eq!(parse_id(&url), Some(42));
        assert_eq!(parse_id(&CONTENT_URI), None);
    }

    #[test]
    fn column_names_round_trip() {
        for column in Column::ALL {
            assert_eq!(Column::from_name(column.as_str()), Some(column));
        }
        assert_eq!(Column::from_name("Name"), None);
        assert_eq!(Column::SoldProfit.to_string(), "soldProfit");
    }

    #[test]
    fn column_serializes_as_its_sql_name() {
        let json = serde_json::to_string(&Column::SoldQuantity).unwrap();
        assert_eq!(json, "\"soldQuantity\"");
    }
}
