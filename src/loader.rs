//! Background loader: keeps the latest `RowSet` for one query and re-runs the
//! query whenever the provider reports a change under its address.

use inventory_contract::Column;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use url::Url;

use crate::provider::{ProductProvider, RowSet, Selection};

pub struct ProductLoader {
    provider: ProductProvider,
    address: Url,
    projection: Option<Vec<Column>>,
    selection: Selection,
    order: Option<String>,
}

impl ProductLoader {
    pub fn new(provider: ProductProvider, address: Url) -> Self {
        Self {
            provider,
            address,
            projection: None,
            selection: Selection::all(),
            order: None,
        }
    }

    #[must_use]
    pub fn projection(mut self, columns: &[Column]) -> Self {
        self.projection = Some(columns.to_vec());
        self
    }

    #[must_use]
    pub fn selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    #[must_use]
    pub fn order(mut self, order: impl Into<String>) -> Self {
        self.order = Some(order.into());
        self
    }

    /// Subscribe, run the first load, and keep re-loading on every change
    /// until the returned handle is dropped.
    pub fn spawn(self) -> LoaderHandle {
        let (tx, rx) = watch::channel(None);
        // Registered before the first query so no change can slip in between.
        let mut changes = self.provider.subscribe_descendants(&self.address);

        let task = tokio::spawn(async move {
            loop {
                match self.load().await {
                    Ok(rows) => {
                        debug!(address = %self.address, rows = rows.len(), "loader refreshed");
                        if tx.send(Some(Arc::new(rows))).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        warn!(address = %self.address, error = %e, "loader query failed");
                    }
                }

                tokio::select! {
                    () = tx.closed() => break,
                    event = changes.changed() => {
                        if event.is_none() {
                            break;
                        }
                        // Several writes in a burst collapse into one re-query.
                        changes.drain();
                    }
                }
            }
        });

        LoaderHandle { rx, task }
    }

    async fn load(&self) -> Result<RowSet, crate::error::InventoryError> {
        self.provider
            .query(
                &self.address,
                self.projection.as_deref(),
                self.selection.clone(),
                self.order.as_deref(),
            )
            .await
    }
}

/// Latest result of a running loader. Dropping it stops the loader.
pub struct LoaderHandle {
    rx: watch::Receiver<Option<Arc<RowSet>>>,
    task: JoinHandle<()>,
}

impl LoaderHandle {
    /// Most recent successful load, if any.
    pub fn current(&self) -> Option<Arc<RowSet>> {
        self.rx.borrow().clone()
    }

    /// Wait for the next successful load. `None` once the loader stopped.
    pub async fn changed(&mut self) -> Option<Arc<RowSet>> {
        self.rx.changed().await.ok()?;
        self.rx.borrow_and_update().clone()
    }
}

impl Drop for LoaderHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
