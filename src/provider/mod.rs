//! The single entry point for product reads and writes.
//!
//! Every operation takes a resource address, matches it against the
//! collection/item patterns, validates the payload, hands one statement to
//! the `DbActor`, and publishes a change notification when rows moved.

pub mod address;
pub mod notify;
pub mod rowset;
pub mod validate;

pub use crate::values::{ContentValues, Selection, Value};
pub use address::{AddressMatch, match_address};
pub use notify::{ChangeEvent, ChangeNotifier, Subscription};
pub use rowset::RowSet;

use inventory_contract::{CONTENT_ITEM_TYPE, CONTENT_LIST_TYPE, Column, item_address};
use tracing::{debug, warn};
use url::Url;

use crate::config::StorageConfig;
use crate::db::{self, DbActorHandle, Product, QueryPlan};
use crate::error::{InventoryError, ValidationError};
use crate::utils::logging::debug_payload;

#[derive(Clone)]
pub struct ProductProvider {
    db: DbActorHandle,
    notifier: ChangeNotifier,
}

impl ProductProvider {
    /// Open the store described by `settings` and start its `DbActor`.
    pub async fn open(settings: &StorageConfig) -> Result<Self, InventoryError> {
        let db = db::spawn(settings).await?;
        Ok(Self::with_handle(db, ChangeNotifier::new()))
    }

    pub fn with_handle(db: DbActorHandle, notifier: ChangeNotifier) -> Self {
        Self { db, notifier }
    }

    pub fn notifier(&self) -> &ChangeNotifier {
        &self.notifier
    }

    /// Register for changes issued against exactly `address`.
    pub fn subscribe(&self, address: &Url) -> Subscription {
        self.notifier.subscribe(address)
    }

    /// Register for changes against `address` and its items.
    pub fn subscribe_descendants(&self, address: &Url) -> Subscription {
        self.notifier.subscribe_descendants(address)
    }

    pub fn resolve_type(&self, address: &Url) -> Result<&'static str, InventoryError> {
        match match_address(address) {
            Some(AddressMatch::Collection) => Ok(CONTENT_LIST_TYPE),
            Some(AddressMatch::Item(_)) => Ok(CONTENT_ITEM_TYPE),
            None => Err(InventoryError::UnsupportedAddress(address.to_string())),
        }
    }

    /// Read rows. An item address replaces `selection` with an id match.
    /// `projection` of `None` selects every column; `order` is
    /// `column [ASC|DESC], ...`.
    pub async fn query(
        &self,
        address: &Url,
        projection: Option<&[Column]>,
        selection: Selection,
        order: Option<&str>,
    ) -> Result<RowSet, InventoryError> {
        let selection = match match_address(address) {
            Some(AddressMatch::Collection) => selection,
            Some(AddressMatch::Item(id)) => Selection::by_id(id),
            None => return Err(InventoryError::UnsupportedAddress(address.to_string())),
        };

        let projection = match projection {
            Some(columns) if !columns.is_empty() => columns.to_vec(),
            _ => Column::ALL.to_vec(),
        };
        let order = db::parse_order(order.unwrap_or_default())?;

        let rows = self
            .db
            .query(QueryPlan {
                projection: projection.clone(),
                selection,
                order,
            })
            .await?;

        Ok(RowSet::new(address.clone(), projection, rows))
    }

    /// Number of rows `query` would return for the same address and selection.
    pub async fn count(&self, address: &Url, selection: Selection) -> Result<u64, InventoryError> {
        let selection = match match_address(address) {
            Some(AddressMatch::Collection) => selection,
            Some(AddressMatch::Item(id)) => Selection::by_id(id),
            None => return Err(InventoryError::UnsupportedAddress(address.to_string())),
        };
        self.db.count(selection).await
    }

    /// Create a product. Only the collection address accepts inserts.
    ///
    /// Returns the new item address, or `Ok(None)` when SQLite refused the
    /// row; callers must check for the latter.
    pub async fn insert(
        &self,
        address: &Url,
        values: ContentValues,
    ) -> Result<Option<Url>, InventoryError> {
        match match_address(address) {
            Some(AddressMatch::Collection) => {}
            Some(AddressMatch::Item(_)) | None => {
                return Err(InventoryError::unsupported_operation("Insertion", address));
            }
        }

        validate::validate_insert(&values).inspect_err(|e| log_rejected("insert", address, e))?;
        debug_payload("insert", address, &values);

        let Some(id) = self.db.insert(values).await? else {
            warn!(address = %address, "failed to insert row");
            return Ok(None);
        };

        self.notifier.notify_change(address);
        Ok(Some(item_address(id)))
    }

    /// Partial update. On an item address the caller's selection is ignored.
    pub async fn update(
        &self,
        address: &Url,
        values: ContentValues,
        selection: Selection,
    ) -> Result<u64, InventoryError> {
        let selection = match match_address(address) {
            Some(AddressMatch::Collection) => selection,
            Some(AddressMatch::Item(id)) => Selection::by_id(id),
            None => return Err(InventoryError::unsupported_operation("Update", address)),
        };

        validate::validate_update(&values).inspect_err(|e| log_rejected("update", address, e))?;
        debug_payload("update", address, &values);

        let affected = self.db.update(values, selection).await?;
        if affected > 0 {
            self.notifier.notify_change(address);
        }
        Ok(affected)
    }

    /// Physical delete. A collection address without a clause removes every row.
    pub async fn delete(&self, address: &Url, selection: Selection) -> Result<u64, InventoryError> {
        let selection = match match_address(address) {
            Some(AddressMatch::Collection) => selection,
            Some(AddressMatch::Item(id)) => Selection::by_id(id),
            None => return Err(InventoryError::unsupported_operation("Deletion", address)),
        };

        let affected = self.db.delete(selection).await?;
        if affected > 0 {
            self.notifier.notify_change(address);
        }
        Ok(affected)
    }

    /// Typed read of one product.
    pub async fn get(&self, id: i64) -> Result<Option<Product>, InventoryError> {
        self.db.get_product(id).await
    }

    /// Record one unit sold: quantity down by one, sold quantity up by one,
    /// price added to the sold profit, all in one statement. Returns rows
    /// affected (0 if the product does not exist). Fails with
    /// `InvalidQuantity` when the product is out of stock.
    pub async fn sell(&self, id: i64) -> Result<u64, InventoryError> {
        let address = item_address(id);
        let affected = self
            .db
            .sell(id)
            .await
            .inspect_err(|e| {
                if let InventoryError::Validation(v) = e {
                    log_rejected("sell", &address, v);
                }
            })?;
        if affected > 0 {
            self.notifier.notify_change(&address);
        }
        Ok(affected)
    }

    /// Version stamped in the store, for diagnostics.
    pub async fn schema_version(&self) -> Result<i64, InventoryError> {
        self.db.schema_version().await
    }
}

fn log_rejected(action: &str, address: &Url, error: &ValidationError) {
    debug!(address = %address, error = %error, "{action} rejected");
}
