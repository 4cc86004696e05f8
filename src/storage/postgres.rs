//! PostgreSQL row store
//!
//! Serves the engine's two reads from the `"Sales"` table through an
//! `sqlx::PgPool`, running the statements built by `SqlCompiler`.
//!
//! The store traits are synchronous; each read blocks on the runtime the
//! pool was created on. Call them from a blocking context (the HTTP layer
//! uses `spawn_blocking`, the CLI calls from its main thread), never from
//! inside an async task.

use std::sync::{Mutex, MutexGuard};

use rust_decimal::Decimal;
use sqlx::pool::PoolConnection;
use sqlx::postgres::{PgConnection, PgPoolOptions, PgRow};
use sqlx::{PgPool, Postgres, Row, Transaction};
use tokio::runtime::Handle;
use tracing::{debug, info, warn};

use crate::planner::{OrderSpec, Predicate};
use crate::schema::{columns, SaleRecord};

use super::errors::{StorageError, StorageResult};
use super::sql::SqlCompiler;
use super::{SalesStore, StoreRead, Totals, Window, WindowedRows};

/// Pool size used by `PgStore::connect`
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Shared PostgreSQL-backed store
pub struct PgStore {
    pool: PgPool,
    runtime: Handle,
}

impl PgStore {
    /// Connects a pool to `url`. `runtime` drives every later read.
    pub async fn connect(url: &str, runtime: Handle) -> StorageResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(DEFAULT_MAX_CONNECTIONS)
            .connect(url)
            .await
            .map_err(|e| StorageError::connect_failed("Failed to connect to database", e))?;

        info!(max_connections = DEFAULT_MAX_CONNECTIONS, "database pool connected");
        Ok(Self::from_pool(pool, runtime))
    }

    /// Wraps an existing pool
    pub fn from_pool(pool: PgPool, runtime: Handle) -> Self {
        Self { pool, runtime }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn acquire(&self) -> StorageResult<PoolConnection<Postgres>> {
        self.runtime
            .block_on(self.pool.acquire())
            .map_err(|e| StorageError::connect_failed("Failed to acquire connection", e))
    }
}

impl StoreRead for PgStore {
    fn fetch_window(
        &self,
        predicate: &Predicate,
        order: &OrderSpec,
        window: Window,
    ) -> StorageResult<WindowedRows> {
        let mut conn = self.acquire()?;
        self.runtime
            .block_on(read_window(&mut conn, predicate, order, window))
            .map_err(|e| StorageError::query_failed("Windowed read failed", e))
    }

    fn aggregate(&self, predicate: &Predicate) -> StorageResult<Totals> {
        let mut conn = self.acquire()?;
        self.runtime
            .block_on(read_totals(&mut conn, predicate))
            .map_err(|e| StorageError::query_failed("Aggregate read failed", e))
    }
}

impl SalesStore for PgStore {
    /// Opens a `REPEATABLE READ, READ ONLY` transaction; both reads of a
    /// query then see the same committed state.
    fn snapshot(&self) -> StorageResult<Box<dyn StoreRead + Send + '_>> {
        let tx = self
            .runtime
            .block_on(async {
                let mut tx = self.pool.begin().await?;
                sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
                    .execute(&mut *tx)
                    .await?;
                Ok::<_, sqlx::Error>(tx)
            })
            .map_err(|e| StorageError::connect_failed("Failed to open snapshot", e))?;

        debug!("snapshot transaction opened");
        Ok(Box::new(PgSnapshot {
            tx: Mutex::new(Some(tx)),
            runtime: self.runtime.clone(),
        }))
    }

    fn len(&self) -> StorageResult<usize> {
        let mut conn = self.acquire()?;
        let count = self
            .runtime
            .block_on(read_count(&mut conn, &Predicate::always()))
            .map_err(|e| StorageError::query_failed("Row count failed", e))?;
        Ok(usize::try_from(count).unwrap_or(usize::MAX))
    }
}

/// Reads pinned to one read-only transaction. Dropping it rolls back.
pub struct PgSnapshot {
    tx: Mutex<Option<Transaction<'static, Postgres>>>,
    runtime: Handle,
}

impl PgSnapshot {
    fn lock(&self) -> StorageResult<MutexGuard<'_, Option<Transaction<'static, Postgres>>>> {
        self.tx
            .lock()
            .map_err(|_| StorageError::unavailable("Snapshot lock poisoned"))
    }
}

impl StoreRead for PgSnapshot {
    fn fetch_window(
        &self,
        predicate: &Predicate,
        order: &OrderSpec,
        window: Window,
    ) -> StorageResult<WindowedRows> {
        let mut guard = self.lock()?;
        let tx = guard
            .as_mut()
            .ok_or_else(|| StorageError::unavailable("Snapshot already closed"))?;

        self.runtime
            .block_on(read_window(&mut **tx, predicate, order, window))
            .map_err(|e| StorageError::query_failed("Windowed read failed", e))
    }

    fn aggregate(&self, predicate: &Predicate) -> StorageResult<Totals> {
        let mut guard = self.lock()?;
        let tx = guard
            .as_mut()
            .ok_or_else(|| StorageError::unavailable("Snapshot already closed"))?;

        self.runtime
            .block_on(read_totals(&mut **tx, predicate))
            .map_err(|e| StorageError::query_failed("Aggregate read failed", e))
    }
}

impl Drop for PgSnapshot {
    fn drop(&mut self) {
        let tx = match self.tx.get_mut() {
            Ok(tx) => tx.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };

        if let Some(tx) = tx {
            if let Err(e) = self.runtime.block_on(tx.rollback()) {
                warn!(error = %e, "snapshot rollback failed");
            }
        }
    }
}

async fn read_window(
    conn: &mut PgConnection,
    predicate: &Predicate,
    order: &OrderSpec,
    window: Window,
) -> Result<WindowedRows, sqlx::Error> {
    let mut page = SqlCompiler::page(predicate, order, window).into_builder();
    let rows = page.build().fetch_all(&mut *conn).await?;
    let rows = rows.iter().map(decode_record).collect::<Result<Vec<_>, _>>()?;

    let total_count = read_count(conn, predicate).await?;

    Ok(WindowedRows {
        rows,
        total_count: u64::try_from(total_count).unwrap_or(0),
    })
}

async fn read_count(conn: &mut PgConnection, predicate: &Predicate) -> Result<i64, sqlx::Error> {
    let mut count = SqlCompiler::count(predicate).into_builder();
    count.build_query_scalar::<i64>().fetch_one(conn).await
}

async fn read_totals(conn: &mut PgConnection, predicate: &Predicate) -> Result<Totals, sqlx::Error> {
    let mut totals = SqlCompiler::totals(predicate).into_builder();
    let (final_amount, total_amount): (Decimal, Decimal) =
        totals.build_query_as().fetch_one(conn).await?;

    Ok(Totals {
        final_amount,
        total_amount,
    })
}

/// Maps one `"Sales"` row. Integer columns are `INTEGER` in the table.
fn decode_record(row: &PgRow) -> Result<SaleRecord, sqlx::Error> {
    Ok(SaleRecord {
        id: i64::from(row.try_get::<i32, _>("id")?),
        transaction_id: row.try_get("transactionId")?,
        date: row.try_get(columns::DATE)?,
        payment_method: row.try_get("paymentMethod")?,
        order_status: row.try_get("orderStatus")?,
        delivery_type: row.try_get("deliveryType")?,
        store_id: row.try_get("storeId")?,
        store_location: row.try_get("storeLocation")?,
        salesperson_id: row.try_get("salespersonId")?,
        employee_name: row.try_get("employeeName")?,
        customer_id: row.try_get("customerId")?,
        customer_name: row.try_get("customerName")?,
        phone_number: row.try_get("phoneNumber")?,
        gender: row.try_get("gender")?,
        age: row.try_get::<Option<i32>, _>(columns::AGE)?.map(i64::from),
        customer_region: row.try_get("customerRegion")?,
        customer_type: row.try_get("customerType")?,
        product_id: row.try_get("productId")?,
        product_name: row.try_get("productName")?,
        brand: row.try_get("brand")?,
        product_category: row.try_get("productCategory")?,
        tags: row.try_get("tags")?,
        quantity: i64::from(row.try_get::<i32, _>("quantity")?),
        price_per_unit: row.try_get("pricePerUnit")?,
        discount_percentage: row.try_get("discountPercentage")?,
        total_amount: row.try_get(columns::TOTAL_AMOUNT)?,
        final_amount: row.try_get(columns::FINAL_AMOUNT)?,
    })
}
