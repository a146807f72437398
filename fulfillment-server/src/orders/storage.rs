//! redb-based storage layer for orders and return requests
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `orders` | `order_id` | `Order` | Authoritative order records |
//! | `active_orders` | `order_id` | `()` | Not-yet-SERVED index |
//! | `returns` | `return_id` | `ReturnRequest` | Return request records |
//! | `open_returns` | `order_id` | `return_id` | Non-terminal return per order |
//! | `counters` | `()` | `u64` | Daily order number counter |
//!
//! # Durability
//!
//! redb commits with `Durability::Immediate` by default: copy-on-write with
//! an atomic pointer swap, so the file stays consistent across power loss.
//! redb also admits a single write transaction at a time, which is the
//! per-entity critical section the workflow relies on: the commit of a
//! status change is its linearization point.

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition, WriteTransaction};
use shared::order::Order;
use shared::returns::ReturnRequest;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Table for order records: key = order_id, value = JSON-serialized Order
const ORDERS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("orders");

/// Table for tracking active orders: key = order_id, value = empty (existence check)
const ACTIVE_ORDERS_TABLE: TableDefinition<&str, ()> = TableDefinition::new("active_orders");

/// Table for return requests: key = return_id, value = JSON-serialized ReturnRequest
const RETURNS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("returns");

/// Table mapping order_id -> return_id for the order's open (non-terminal)
/// return, enforcing at most one open return per order
const OPEN_RETURNS_TABLE: TableDefinition<&str, &str> = TableDefinition::new("open_returns");

/// Table for counters: key = counter name, value = u64
const COUNTERS_TABLE: TableDefinition<&str, u64> = TableDefinition::new("counters");

const ORDER_COUNT_KEY: &str = "order_count";

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Order store backed by redb
#[derive(Clone)]
pub struct OrderStore {
    db: Arc<Database>,
}

impl OrderStore {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        let store = Self { db: Arc::new(db) };
        store.init_tables()?;
        Ok(store)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        let store = Self { db: Arc::new(db) };
        store.init_tables()?;
        Ok(store)
    }

    /// Create all tables if they don't exist
    fn init_tables(&self) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let _ = write_txn.open_table(ORDERS_TABLE)?;
            let _ = write_txn.open_table(ACTIVE_ORDERS_TABLE)?;
            let _ = write_txn.open_table(RETURNS_TABLE)?;
            let _ = write_txn.open_table(OPEN_RETURNS_TABLE)?;

            let mut counters = write_txn.open_table(COUNTERS_TABLE)?;
            if counters.get(ORDER_COUNT_KEY)?.is_none() {
                counters.insert(ORDER_COUNT_KEY, 0u64)?;
            }
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Begin a write transaction
    ///
    /// Blocks until it is the sole writer; the caller commits.
    pub fn begin_write(&self) -> StorageResult<WriteTransaction> {
        Ok(self.db.begin_write()?)
    }

    /// Cheap storage liveness check (used by health endpoints)
    pub fn health(&self) -> StorageResult<()> {
        let _ = self.db.begin_read()?;
        Ok(())
    }

    // ========== Order Counter ==========

    /// Get and increment the order counter atomically, returning the new count
    pub fn next_order_count(&self) -> StorageResult<u64> {
        let txn = self.db.begin_write()?;
        let mut table = txn.open_table(COUNTERS_TABLE)?;
        let current = table.get(ORDER_COUNT_KEY)?.map(|g| g.value()).unwrap_or(0);
        let next = current + 1;
        table.insert(ORDER_COUNT_KEY, next)?;
        drop(table);
        txn.commit()?;
        Ok(next)
    }

    // ========== Order Operations (within transaction) ==========

    /// Persist an order and maintain the active index
    pub fn put_order(&self, txn: &WriteTransaction, order: &Order) -> StorageResult<()> {
        let value = serde_json::to_vec(order)?;
        let mut table = txn.open_table(ORDERS_TABLE)?;
        table.insert(order.id.as_str(), value.as_slice())?;
        drop(table);

        let mut active = txn.open_table(ACTIVE_ORDERS_TABLE)?;
        if order.is_served() {
            active.remove(order.id.as_str())?;
        } else {
            active.insert(order.id.as_str(), ())?;
        }
        Ok(())
    }

    /// Load an order inside a write transaction
    pub fn get_order_txn(
        &self,
        txn: &WriteTransaction,
        order_id: &str,
    ) -> StorageResult<Option<Order>> {
        let table = txn.open_table(ORDERS_TABLE)?;
        match table.get(order_id)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    // ========== Order Operations (read-only) ==========

    /// Load an order
    pub fn get_order(&self, order_id: &str) -> StorageResult<Option<Order>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;
        match table.get(order_id)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    /// All orders not yet SERVED, via the active index
    pub fn list_active_orders(&self) -> StorageResult<Vec<Order>> {
        let read_txn = self.db.begin_read()?;
        let active = read_txn.open_table(ACTIVE_ORDERS_TABLE)?;
        let orders_table = read_txn.open_table(ORDERS_TABLE)?;

        let mut orders = Vec::new();
        for entry in active.iter()? {
            let (key, _) = entry?;
            if let Some(guard) = orders_table.get(key.value())? {
                let order: Order = serde_json::from_slice(guard.value())?;
                orders.push(order);
            }
        }
        Ok(orders)
    }

    // ========== Return Operations (within transaction) ==========

    /// Persist a return request and maintain the open-return index
    pub fn put_return(&self, txn: &WriteTransaction, request: &ReturnRequest) -> StorageResult<()> {
        let value = serde_json::to_vec(request)?;
        let mut table = txn.open_table(RETURNS_TABLE)?;
        table.insert(request.id.as_str(), value.as_slice())?;
        drop(table);

        let mut open = txn.open_table(OPEN_RETURNS_TABLE)?;
        if request.is_open() {
            open.insert(request.order_ref.as_str(), request.id.as_str())?;
        } else {
            open.remove(request.order_ref.as_str())?;
        }
        Ok(())
    }

    /// Load a return request inside a write transaction
    pub fn get_return_txn(
        &self,
        txn: &WriteTransaction,
        return_id: &str,
    ) -> StorageResult<Option<ReturnRequest>> {
        let table = txn.open_table(RETURNS_TABLE)?;
        match table.get(return_id)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    /// The id of the order's open return, if any (within transaction)
    pub fn open_return_for_order_txn(
        &self,
        txn: &WriteTransaction,
        order_id: &str,
    ) -> StorageResult<Option<String>> {
        let table = txn.open_table(OPEN_RETURNS_TABLE)?;
        Ok(table.get(order_id)?.map(|g| g.value().to_string()))
    }

    // ========== Return Operations (read-only) ==========

    /// Load a return request
    pub fn get_return(&self, return_id: &str) -> StorageResult<Option<ReturnRequest>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(RETURNS_TABLE)?;
        match table.get(return_id)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    /// All non-terminal return requests, via the open-return index
    pub fn list_open_returns(&self) -> StorageResult<Vec<ReturnRequest>> {
        let read_txn = self.db.begin_read()?;
        let open = read_txn.open_table(OPEN_RETURNS_TABLE)?;
        let returns_table = read_txn.open_table(RETURNS_TABLE)?;

        let mut requests = Vec::new();
        for entry in open.iter()? {
            let (_, return_id) = entry?;
            if let Some(guard) = returns_table.get(return_id.value())? {
                let request: ReturnRequest = serde_json::from_slice(guard.value())?;
                requests.push(request);
            }
        }
        Ok(requests)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::order::{Location, LocationKind, OrderLineItem, OrderStatus, Station};
    use std::collections::BTreeSet;

    fn sample_order(id: &str) -> Order {
        Order::new(
            id.to_string(),
            "ORD2026080710001".to_string(),
            Location {
                kind: LocationKind::Table,
                identifier: "T1".to_string(),
            },
            vec![OrderLineItem {
                id: "item-1".to_string(),
                menu_item_ref: "menu:1".to_string(),
                name: "Mojito".to_string(),
                quantity: 1,
                unit_price_snapshot: 9.0,
                preparation_station: Station::Bar,
            }],
        )
    }

    #[test]
    fn test_order_roundtrip() {
        let store = OrderStore::open_in_memory().unwrap();
        let order = sample_order("order-1");

        let txn = store.begin_write().unwrap();
        store.put_order(&txn, &order).unwrap();
        txn.commit().unwrap();

        let loaded = store.get_order("order-1").unwrap().unwrap();
        assert_eq!(loaded, order);
        assert_eq!(store.get_order("missing").unwrap(), None);
    }

    #[test]
    fn test_active_index_tracks_served() {
        let store = OrderStore::open_in_memory().unwrap();
        let mut order = sample_order("order-1");

        let txn = store.begin_write().unwrap();
        store.put_order(&txn, &order).unwrap();
        txn.commit().unwrap();
        assert_eq!(store.list_active_orders().unwrap().len(), 1);

        order.status = OrderStatus::Served;
        let txn = store.begin_write().unwrap();
        store.put_order(&txn, &order).unwrap();
        txn.commit().unwrap();

        assert!(store.list_active_orders().unwrap().is_empty());
        // The record itself is never deleted
        assert!(store.get_order("order-1").unwrap().is_some());
    }

    #[test]
    fn test_open_return_index() {
        let store = OrderStore::open_in_memory().unwrap();
        let mut request = ReturnRequest::new(
            "ret-1".to_string(),
            "order-1".to_string(),
            "cold food".to_string(),
            BTreeSet::from([Station::Kitchen]),
            "waiter-1".to_string(),
        );

        let txn = store.begin_write().unwrap();
        store.put_return(&txn, &request).unwrap();
        let open = store.open_return_for_order_txn(&txn, "order-1").unwrap();
        assert_eq!(open.as_deref(), Some("ret-1"));
        txn.commit().unwrap();

        assert_eq!(store.list_open_returns().unwrap().len(), 1);

        // Reaching a terminal state clears the index entry
        request.status = shared::returns::ReturnStatus::Rejected;
        let txn = store.begin_write().unwrap();
        store.put_return(&txn, &request).unwrap();
        assert!(
            store
                .open_return_for_order_txn(&txn, "order-1")
                .unwrap()
                .is_none()
        );
        txn.commit().unwrap();

        assert!(store.list_open_returns().unwrap().is_empty());
        assert!(store.get_return("ret-1").unwrap().is_some());
    }

    #[test]
    fn test_order_counter_increments() {
        let store = OrderStore::open_in_memory().unwrap();
        assert_eq!(store.next_order_count().unwrap(), 1);
        assert_eq!(store.next_order_count().unwrap(), 2);
        assert_eq!(store.next_order_count().unwrap(), 3);
    }
}
