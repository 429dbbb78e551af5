use crate::config::StorageConfig;
use crate::db::models::Product;
use crate::db::schema::{SCHEMA_VERSION, SQLITE_INIT};
use crate::db::statement::{OrderTerm, Statement};
use crate::error::{InventoryError, ValidationError};
use crate::values::{ContentValues, Selection, Value};
use inventory_contract::{Column, ColumnKind};
use ractor::{Actor, ActorProcessingErr, ActorRef, RpcReplyPort};
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteRow, SqliteSynchronous,
};
use sqlx::{Row, SqlitePool};
use std::cmp::Ordering;
use std::str::FromStr;
use tracing::{debug, error, info};

/// A fully resolved read: the provider has already matched the address and
/// parsed the sort order.
#[derive(Debug, Clone)]
pub struct QueryPlan {
    pub projection: Vec<Column>,
    pub selection: Selection,
    pub order: Vec<OrderTerm>,
}

#[derive(Debug)]
pub enum DbActorMessage {
    /// Run a read and return rows laid out in projection order.
    Query(QueryPlan, RpcReplyPort<Result<Vec<Vec<Value>>, InventoryError>>),

    /// Insert one product. `Ok(None)` when SQLite rejected the row.
    Insert(ContentValues, RpcReplyPort<Result<Option<i64>, InventoryError>>),

    /// Update matching rows and return how many changed.
    Update(
        ContentValues,
        Selection,
        RpcReplyPort<Result<u64, InventoryError>>,
    ),

    /// Delete matching rows and return how many went away.
    Delete(Selection, RpcReplyPort<Result<u64, InventoryError>>),

    /// Count matching rows.
    Count(Selection, RpcReplyPort<Result<u64, InventoryError>>),

    /// Record one unit sold on a product. Returns rows affected.
    Sell(i64, RpcReplyPort<Result<u64, InventoryError>>),

    /// Fetch a typed product by id.
    GetProduct(i64, RpcReplyPort<Result<Option<Product>, InventoryError>>),

    /// Read the stored `user_version`.
    SchemaVersion(RpcReplyPort<Result<i64, InventoryError>>),
}

#[derive(Clone)]
pub struct DbActorHandle {
    actor: ActorRef<DbActorMessage>,
}

impl DbActorHandle {
    pub async fn query(&self, plan: QueryPlan) -> Result<Vec<Vec<Value>>, InventoryError> {
        ractor::call!(self.actor, DbActorMessage::Query, plan)
            .map_err(|e| InventoryError::RactorError(format!("DbActor Query RPC failed: {e}")))?
    }

    pub async fn insert(&self, values: ContentValues) -> Result<Option<i64>, InventoryError> {
        ractor::call!(self.actor, DbActorMessage::Insert, values)
            .map_err(|e| InventoryError::RactorError(format!("DbActor Insert RPC failed: {e}")))?
    }

    pub async fn update(
        &self,
        values: ContentValues,
        selection: Selection,
    ) -> Result<u64, InventoryError> {
        ractor::call!(self.actor, DbActorMessage::Update, values, selection)
            .map_err(|e| InventoryError::RactorError(format!("DbActor Update RPC failed: {e}")))?
    }

    pub async fn delete(&self, selection: Selection) -> Result<u64, InventoryError> {
        ractor::call!(self.actor, DbActorMessage::Delete, selection)
            .map_err(|e| InventoryError::RactorError(format!("DbActor Delete RPC failed: {e}")))?
    }

    pub async fn count(&self, selection: Selection) -> Result<u64, InventoryError> {
        ractor::call!(self.actor, DbActorMessage::Count, selection)
            .map_err(|e| InventoryError::RactorError(format!("DbActor Count RPC failed: {e}")))?
    }

    pub async fn sell(&self, id: i64) -> Result<u64, InventoryError> {
        ractor::call!(self.actor, DbActorMessage::Sell, id)
            .map_err(|e| InventoryError::RactorError(format!("DbActor Sell RPC failed: {e}")))?
    }

    pub async fn get_product(&self, id: i64) -> Result<Option<Product>, InventoryError> {
        ractor::call!(self.actor, DbActorMessage::GetProduct, id).map_err(|e| {
            InventoryError::RactorError(format!("DbActor GetProduct RPC failed: {e}"))
        })?
    }

    pub async fn schema_version(&self) -> Result<i64, InventoryError> {
        ractor::call!(self.actor, DbActorMessage::SchemaVersion).map_err(|e| {
            InventoryError::RactorError(format!("DbActor SchemaVersion RPC failed: {e}"))
        })?
    }
}

struct DbActorState {
    pool: SqlitePool,
}

struct DbActor;

#[ractor::async_trait]
impl Actor for DbActor {
    type Msg = DbActorMessage;
    type State = DbActorState;
    type Arguments = SqlitePool;

    async fn pre_start(
        &self,
        _myself: ActorRef<Self::Msg>,
        pool: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        info!("DbActor initialized");
        Ok(DbActorState { pool })
    }

    async fn post_stop(
        &self,
        _myself: ActorRef<Self::Msg>,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        state.pool.close().await;
        debug!("DbActor pool closed");
        Ok(())
    }

    async fn handle(
        &self,
        _myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            DbActorMessage::Query(plan, reply) => {
                let res = self.query(&state.pool, &plan).await;
                let _ = reply.send(res);
            }
            DbActorMessage::Insert(values, reply) => {
                let res = self.insert(&state.pool, &values).await;
                let _ = reply.send(res);
            }
            DbActorMessage::Update(values, selection, reply) => {
                let res = self.update(&state.pool, &values, &selection).await;
                let _ = reply.send(res);
            }
            DbActorMessage::Delete(selection, reply) => {
                let res = self.delete(&state.pool, &selection).await;
                let _ = reply.send(res);
            }
            DbActorMessage::Count(selection, reply) => {
                let res = self.count(&state.pool, &selection).await;
                let _ = reply.send(res);
            }
            DbActorMessage::Sell(id, reply) => {
                let res = self.sell(&state.pool, id).await;
                let _ = reply.send(res);
            }
            DbActorMessage::GetProduct(id, reply) => {
                let res = self.get_product(&state.pool, id).await;
                let _ = reply.send(res);
            }
            DbActorMessage::SchemaVersion(reply) => {
                let res = read_user_version(&state.pool).await;
                let _ = reply.send(res);
            }
        }
        Ok(())
    }
}

impl DbActor {
    async fn query(
        &self,
        pool: &SqlitePool,
        plan: &QueryPlan,
    ) -> Result<Vec<Vec<Value>>, InventoryError> {
        let stmt = Statement::select(&plan.projection, &plan.selection, &plan.order);
        let rows = stmt.query().fetch_all(pool).await?;

        rows.iter()
            .map(|row| decode_row(row, &plan.projection))
            .collect::<Result<Vec<_>, _>>()
            .map_err(InventoryError::from)
    }

    async fn insert(
        &self,
        pool: &SqlitePool,
        values: &ContentValues,
    ) -> Result<Option<i64>, InventoryError> {
        let stmt = Statement::insert(values);
        match stmt.query().execute(pool).await {
            Ok(res) if res.rows_affected() == 1 => {
                let id = res.last_insert_rowid();
                debug!(table = "products", id, "db insert applied");
                Ok(Some(id))
            }
            Ok(res) => {
                error!(
                    table = "products",
                    affected = res.rows_affected(),
                    "db insert wrote no row"
                );
                Ok(None)
            }
            Err(sqlx::Error::Database(e)) => {
                error!(table = "products", error = %e, "db insert rejected");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn update(
        &self,
        pool: &SqlitePool,
        values: &ContentValues,
        selection: &Selection,
    ) -> Result<u64, InventoryError> {
        let stmt = Statement::update(values, selection);
        let res = stmt.query().execute(pool).await?;

        let affected = res.rows_affected();
        debug!(
            table = "products",
            affected,
            columns = values.len(),
            "db update applied"
        );
        Ok(affected)
    }

    async fn delete(&self, pool: &SqlitePool, selection: &Selection) -> Result<u64, InventoryError> {
        let stmt = Statement::delete(selection);
        let res = stmt.query().execute(pool).await?;

        let affected = res.rows_affected();
        debug!(table = "products", affected, "db delete applied");
        Ok(affected)
    }

    async fn count(&self, pool: &SqlitePool, selection: &Selection) -> Result<u64, InventoryError> {
        let stmt = Statement::count(selection);
        let row = stmt.query().fetch_one(pool).await?;
        let count: i64 = row.try_get(0)?;
        Ok(u64::try_from(count).unwrap_or_default())
    }

    async fn sell(&self, pool: &SqlitePool, id: i64) -> Result<u64, InventoryError> {
        let res = Statement::sell(id).query().execute(pool).await?;
        let affected = res.rows_affected();
        if affected > 0 {
            debug!(table = "products", id, "db sale applied");
            return Ok(affected);
        }

        // Messages are handled one at a time, so this sees the row the guard skipped.
        let Some(product) = self.get_product(pool, id).await? else {
            return Ok(0);
        };
        let reason = if product.quantity <= 0 {
            ValidationError::InvalidQuantity
        } else if product.price.is_some_and(|p| p < 0) {
            ValidationError::InvalidPrice
        } else {
            ValidationError::SoldTotalsOverflow
        };
        debug!(table = "products", id, error = %reason, "db sale refused");
        Err(reason.into())
    }

    async fn get_product(
        &self,
        pool: &SqlitePool,
        id: i64,
    ) -> Result<Option<Product>, InventoryError> {
        let row = sqlx::query_as::<_, Product>(
            r#"
        SELECT _id, name, description, price, quantity, picture, soldQuantity, soldProfit
        FROM products
        WHERE _id = ?
        "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(row)
    }
}

/// Integer columns may still hold text written by hand; fall back to text
/// rather than failing the whole read.
fn decode_row(row: &SqliteRow, projection: &[Column]) -> Result<Vec<Value>, sqlx::Error> {
    projection
        .iter()
        .enumerate()
        .map(|(idx, column)| match column.kind() {
            ColumnKind::Integer => match row.try_get::<Option<i64>, _>(idx) {
                Ok(v) => Ok(v.into()),
                Err(_) => row.try_get::<Option<String>, _>(idx).map(Value::from),
            },
            ColumnKind::Text => row.try_get::<Option<String>, _>(idx).map(Value::from),
        })
        .collect()
}

/// Open (creating if missing) the database described by `settings` and
/// bring its schema up to `SCHEMA_VERSION`.
pub async fn open(settings: &StorageConfig) -> Result<SqlitePool, InventoryError> {
    let connect_opts = SqliteConnectOptions::from_str(settings.database_url.as_str())?
        .create_if_missing(true)
        .busy_timeout(settings.busy_timeout())
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal);

    let pool = SqlitePoolOptions::new()
        .max_connections(settings.max_connections.max(1))
        .connect_with(connect_opts)
        .await?;

    apply_schema(&pool).await?;
    Ok(pool)
}

/// Spawn the database actor over an opened store and return a cloneable handle.
pub async fn spawn(settings: &StorageConfig) -> Result<DbActorHandle, InventoryError> {
    let pool = open(settings).await?;
    let (actor, _jh) = ractor::Actor::spawn(None, DbActor, pool)
        .await
        .map_err(|e| InventoryError::RactorError(format!("failed to spawn DbActor: {e}")))?;

    Ok(DbActorHandle { actor })
}

async fn read_user_version(pool: &SqlitePool) -> Result<i64, InventoryError> {
    let version: i64 = sqlx::query_scalar("PRAGMA user_version")
        .fetch_one(pool)
        .await?;
    Ok(version)
}

async fn apply_schema(pool: &SqlitePool) -> Result<(), InventoryError> {
    let found = read_user_version(pool).await?;

    match found.cmp(&SCHEMA_VERSION) {
        Ordering::Equal => return Ok(()),
        Ordering::Greater => {
            return Err(InventoryError::SchemaDowngrade {
                found,
                supported: SCHEMA_VERSION,
            });
        }
        Ordering::Less => {}
    }

    let mut tx = pool.begin().await?;
    if found == 0 {
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&mut *tx).await?;
        }
        info!(version = SCHEMA_VERSION, "database schema created");
    } else {
        upgrade(&mut tx, found, SCHEMA_VERSION).await?;
    }
    sqlx::query(&format!("PRAGMA user_version = {SCHEMA_VERSION}"))
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(())
}

/// Migrates a store written by an older release. Only one schema version has
/// shipped so far, so there is nothing to do yet.
async fn upgrade(
    _tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    old_version: i64,
    new_version: i64,
) -> Result<(), InventoryError> {
    info!(old_version, new_version, "database schema upgrade (no changes)");
    Ok(())
}
