use inventory::config::Config;
use inventory::contract::CONTENT_URI;
use inventory::db::Product;
use inventory::{ProductProvider, Selection};
use mimalloc::MiMalloc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Config::from_optional_toml()?;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cfg.basic.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        database_url = %cfg.storage.database_url,
        loglevel = %cfg.basic.loglevel,
        busy_timeout_secs = cfg.storage.busy_timeout_secs
    );

    let provider = ProductProvider::open(&cfg.storage).await?;
    info!(schema_version = provider.schema_version().await?, "store opened");

    let rows = provider
        .query(&CONTENT_URI, None, Selection::all(), Some("name ASC"))
        .await?;
    let Some(products) = rows.products() else {
        warn!("stock report skipped: rows could not be read as products");
        return Ok(());
    };

    for p in &products {
        info!(
            id = p.id,
            name = %p.name,
            quantity = p.quantity,
            price = ?p.price,
            sold = p.sold_quantity,
            profit = p.sold_profit
        );
    }
    let (units, sold, profit) = stock_totals(&products);
    info!(
        products = products.len(),
        units_in_stock = units,
        units_sold = sold,
        sold_profit = profit,
        "stock report"
    );
    Ok(())
}

/// Units in stock, units sold and sold profit across `products`. Stored
/// totals are unchecked, so the sums saturate.
fn stock_totals(products: &[Product]) -> (i64, i64, i64) {
    products.iter().fold((0, 0, 0), |(units, sold, profit), p| {
        (
            units.saturating_add(p.quantity),
            sold.saturating_add(p.sold_quantity),
            profit.saturating_add(p.sold_profit),
        )
    })
}
