mod common;

use common::{TempDb, product, widget};
use inventory::contract::{CONTENT_URI, Column, item_address};
use inventory::{
    ContentValues, ErrorKind, InventoryError, ProductProvider, Selection, ValidationError,
};
use url::Url;

#[tokio::test]
async fn test_item_update_ignores_caller_filter() {
    let db = TempDb::new("item_update_filter");
    let provider = db.provider().await;
    provider.insert(&CONTENT_URI, product("first", 1)).await.unwrap();
    provider.insert(&CONTENT_URI, product("second", 2)).await.unwrap();

    let values = ContentValues::new().with(Column::Description, "touched");
    let affected = provider
        .update(
            &item_address(1),
            values,
            Selection::new("_id = ?", [2]),
        )
        .await
        .unwrap();
    assert_eq!(affected, 1);

    let first = provider.get(1).await.unwrap().unwrap();
    let second = provider.get(2).await.unwrap().unwrap();
    assert_eq!(first.description.as_deref(), Some("touched"));
    assert_eq!(second.description, None);
}

#[tokio::test]
async fn test_collection_update_uses_filter() {
    let db = TempDb::new("collection_update");
    let provider = db.provider().await;
    for (name, qty) in [("a", 0), ("b", 0), ("c", 5)] {
        provider.insert(&CONTENT_URI, product(name, qty)).await.unwrap();
    }

    let restock = ContentValues::new().with(Column::Quantity, 20);
    let affected = provider
        .update(&CONTENT_URI, restock, Selection::new("quantity = ?", [0]))
        .await
        .unwrap();
    assert_eq!(affected, 2);

    let rows = provider
        .query(
            &CONTENT_URI,
            Some(&[Column::Quantity]),
            Selection::all(),
            Some("_id"),
        )
        .await
        .unwrap();
    let quantities: Vec<_> = rows.rows().map(|r| r[0].as_i64().unwrap()).collect();
    assert_eq!(quantities, vec![20, 20, 5]);
}

#[tokio::test]
async fn test_negative_quantity_update_leaves_row_alone() {
    let db = TempDb::new("negative_update");
    let provider = db.provider().await;
    provider.insert(&CONTENT_URI, widget()).await.unwrap();
    let mut changes = provider.subscribe(&item_address(1));

    let values = ContentValues::new().with(Column::Quantity, -1);
    let err = provider
        .update(&item_address(1), values, Selection::all())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        InventoryError::Validation(ValidationError::InvalidQuantity)
    ));

    let stored = provider.get(1).await.unwrap().unwrap();
    assert_eq!(stored.quantity, 10);
    assert_eq!(changes.try_changed(), None);
}

#[tokio::test]
async fn test_update_validation_is_partial() {
    let db = TempDb::new("partial_update");
    let provider = db.provider().await;
    provider.insert(&CONTENT_URI, widget()).await.unwrap();

    let mut null_name = ContentValues::new();
    null_name.put_null(Column::Name);
    let err = provider
        .update(&item_address(1), null_name, Selection::all())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        InventoryError::Validation(ValidationError::NameRequired)
    ));

    let bad_price = ContentValues::new().with(Column::Price, -5);
    let err = provider
        .update(&item_address(1), bad_price, Selection::all())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        InventoryError::Validation(ValidationError::InvalidPrice)
    ));

    // Price may be cleared.
    let mut clear_price = ContentValues::new();
    clear_price.put_null(Column::Price);
    assert_eq!(
        provider
            .update(&item_address(1), clear_price, Selection::all())
            .await
            .unwrap(),
        1
    );
    assert_eq!(provider.get(1).await.unwrap().unwrap().price, None);
}

#[tokio::test]
async fn test_update_unknown_address() {
    let db = TempDb::new("update_unknown");
    let provider = db.provider().await;

    let address = Url::parse("content://xyz.kbalto.inventory/products/abc").unwrap();
    let err = provider
        .update(&address, widget(), Selection::all())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedOperation);
}

#[tokio::test]
async fn test_update_notifies_only_when_rows_change() {
    let db = TempDb::new("update_notifies");
    let provider = db.provider().await;
    provider.insert(&CONTENT_URI, widget()).await.unwrap();
    let mut item = provider.subscribe(&item_address(1));
    let mut missing = provider.subscribe(&item_address(99));

    let values = ContentValues::new().with(Column::Quantity, 4);
    assert_eq!(
        provider
            .update(&item_address(1), values.clone(), Selection::all())
            .await
            .unwrap(),
        1
    );
    assert_eq!(item.drain(), 1);

    assert_eq!(
        provider
            .update(&item_address(99), values, Selection::all())
            .await
            .unwrap(),
        0
    );
    assert_eq!(missing.drain(), 0);
}

#[tokio::test]
async fn test_delete_collection_removes_everything() {
    let db = TempDb::new("delete_all");
    let provider = db.provider().await;
    for i in 0..3 {
        provider
            .insert(&CONTENT_URI, product(&format!("p{i}"), 1))
            .await
            .unwrap();
    }
    let mut changes = provider.subscribe(&CONTENT_URI);

    assert_eq!(
        provider.delete(&CONTENT_URI, Selection::all()).await.unwrap(),
        3
    );
    assert_eq!(changes.drain(), 1);

    let rows = provider
        .query(&CONTENT_URI, None, Selection::all(), None)
        .await
        .unwrap();
    assert!(rows.is_empty());

    // Nothing left: no rows, no notification.
    assert_eq!(
        provider.delete(&CONTENT_URI, Selection::all()).await.unwrap(),
        0
    );
    assert_eq!(changes.drain(), 0);
}

#[tokio::test]
async fn test_collection_delete_does_not_fall_through() {
    let db = TempDb::new("delete_no_fallthrough");
    let provider = db.provider().await;
    provider.insert(&CONTENT_URI, widget()).await.unwrap();

    let deleted = provider
        .delete(&CONTENT_URI, Selection::new("name = ?", ["Gadget"]))
        .await
        .unwrap();
    assert_eq!(deleted, 0);
    assert_eq!(
        provider.count(&CONTENT_URI, Selection::all()).await.unwrap(),
        1
    );
}

#[tokio::test]
async fn test_item_delete_targets_one_row() {
    let db = TempDb::new("delete_item");
    let provider = db.provider().await;
    provider.insert(&CONTENT_URI, product("keep", 1)).await.unwrap();
    provider.insert(&CONTENT_URI, product("drop", 1)).await.unwrap();
    let mut item = provider.subscribe(&item_address(2));

    let deleted = provider
        .delete(&item_address(2), Selection::new("_id = ?", [1]))
        .await
        .unwrap();
    assert_eq!(deleted, 1);
    assert_eq!(item.drain(), 1);

    assert!(provider.get(2).await.unwrap().is_none());
    assert_eq!(provider.get(1).await.unwrap().unwrap().name, "keep");

    assert_eq!(
        provider
            .delete(&item_address(2), Selection::all())
            .await
            .unwrap(),
        0
    );
    assert_eq!(item.drain(), 0);
}

#[tokio::test]
async fn test_delete_unknown_address() {
    let db = TempDb::new("delete_unknown");
    let provider = db.provider().await;

    let address = Url::parse("content://other.app/products").unwrap();
    let err = provider
        .delete(&address, Selection::all())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedOperation);
}

#[tokio::test]
async fn test_sell_moves_stock_to_sold() {
    let db = TempDb::new("sell");
    let provider = db.provider().await;
    provider.insert(&CONTENT_URI, widget()).await.unwrap();
    let mut list = provider.subscribe_descendants(&CONTENT_URI);

    assert_eq!(provider.sell(1).await.unwrap(), 1);
    assert_eq!(provider.sell(1).await.unwrap(), 1);
    assert_eq!(list.drain(), 2);

    let stored = provider.get(1).await.unwrap().unwrap();
    assert_eq!(stored.quantity, 8);
    assert_eq!(stored.sold_quantity, 2);
    assert_eq!(stored.sold_profit, 1000);

    assert_eq!(provider.sell(42).await.unwrap(), 0);
}

#[tokio::test]
async fn test_sell_out_of_stock_fails() {
    let db = TempDb::new("sell_empty");
    let provider = db.provider().await;
    provider.insert(&CONTENT_URI, product("rare", 0)).await.unwrap();

    let err = provider.sell(1).await.unwrap_err();
    assert!(matches!(
        err,
        InventoryError::Validation(ValidationError::InvalidQuantity)
    ));
    let stored = provider.get(1).await.unwrap().unwrap();
    assert_eq!(stored.sold_quantity, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_sells_are_all_recorded() {
    let db = TempDb::new("sell_concurrent");
    let provider = db.provider().await;
    provider.insert(&CONTENT_URI, widget()).await.unwrap();

    for result in sell_concurrently(&provider, 5).await {
        assert_eq!(result.unwrap(), 1);
    }

    let stored = provider.get(1).await.unwrap().unwrap();
    assert_eq!(stored.quantity, 5);
    assert_eq!(stored.sold_quantity, 5);
    assert_eq!(stored.sold_profit, 2500);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_sell_stops_at_zero_under_contention() {
    let db = TempDb::new("sell_contention");
    let provider = db.provider().await;
    provider.insert(&CONTENT_URI, product("last", 2)).await.unwrap();

    let results = sell_concurrently(&provider, 4).await;
    assert_eq!(results.iter().filter(|r| matches!(r, Ok(1))).count(), 2);
    assert!(results.iter().filter(|r| r.is_err()).all(|r| matches!(
        r,
        Err(InventoryError::Validation(ValidationError::InvalidQuantity))
    )));

    let stored = provider.get(1).await.unwrap().unwrap();
    assert_eq!(stored.quantity, 0);
    assert_eq!(stored.sold_quantity, 2);
}

async fn sell_concurrently(
    provider: &ProductProvider,
    n: usize,
) -> Vec<Result<u64, InventoryError>> {
    let handles: Vec<_> = (0..n)
        .map(|_| {
            let provider = provider.clone();
            tokio::spawn(async move { provider.sell(1).await })
        })
        .collect();
    let mut results = Vec::with_capacity(n);
    for handle in handles {
        results.push(handle.await.unwrap());
    }
    results
}

#[tokio::test]
async fn test_sell_refuses_totals_past_i64_max() {
    let db = TempDb::new("sell_overflow");
    let provider = db.provider().await;
    provider
        .insert(&CONTENT_URI, widget().with(Column::SoldQuantity, i64::MAX))
        .await
        .unwrap();
    provider
        .insert(
            &CONTENT_URI,
            widget().with(Column::SoldProfit, i64::MAX - 100),
        )
        .await
        .unwrap();
    let mut changes = provider.subscribe_descendants(&CONTENT_URI);

    for id in [1, 2] {
        let err = provider.sell(id).await.unwrap_err();
        assert!(matches!(
            err,
            InventoryError::Validation(ValidationError::SoldTotalsOverflow)
        ));
    }
    assert_eq!(changes.drain(), 0);

    let first = provider.get(1).await.unwrap().unwrap();
    assert_eq!(first.quantity, 10);
    assert_eq!(first.sold_quantity, i64::MAX);
    let second = provider.get(2).await.unwrap().unwrap();
    assert_eq!(second.sold_profit, i64::MAX - 100);
}

#[tokio::test]
async fn test_collection_delete_reaches_item_subscribers() {
    let db = TempDb::new("delete_all_items_hear");
    let provider = db.provider().await;
    provider.insert(&CONTENT_URI, widget()).await.unwrap();
    let mut item = provider.subscribe(&item_address(1));

    assert_eq!(
        provider.delete(&CONTENT_URI, Selection::all()).await.unwrap(),
        1
    );
    assert_eq!(
        item.try_changed().map(|e| e.address),
        Some(CONTENT_URI.clone())
    );
}
