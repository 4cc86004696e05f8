//! In-memory row store
//!
//! Holds the dataset as an `Arc<Vec<SaleRecord>>` behind a `RwLock`. Each
//! read clones the `Arc`, so a read never blocks a dataset swap and a
//! `MemorySnapshot` keeps seeing the rows it was taken from.

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::{Arc, RwLock};

use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::planner::{OrderSpec, Predicate};
use crate::schema::SaleRecord;

use super::errors::{StorageError, StorageResult};
use super::filters::PredicateFilter;
use super::sorter::ResultSorter;
use super::{SalesStore, StoreRead, Totals, Window, WindowedRows};

/// Shared in-memory store
pub struct MemoryStore {
    rows: RwLock<Arc<Vec<SaleRecord>>>,
}

impl MemoryStore {
    /// Creates a store with no records
    pub fn empty() -> Self {
        Self {
            rows: RwLock::new(Arc::new(Vec::new())),
        }
    }

    /// Creates a store holding `records`.
    ///
    /// Fails if two records share a transaction id.
    pub fn from_records(records: Vec<SaleRecord>) -> StorageResult<Self> {
        let store = Self::empty();
        store.replace_all(records)?;
        Ok(store)
    }

    /// Opens a dataset file holding a JSON array of records.
    pub fn open(path: &Path) -> StorageResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            StorageError::io_error(format!("Failed to read dataset {}", path.display()), e)
        })?;

        let records: Vec<SaleRecord> = serde_json::from_str(&content)
            .map_err(|e| StorageError::invalid_dataset(format!("Invalid dataset JSON: {}", e)))?;

        let store = Self::from_records(records)?;
        info!(path = %path.display(), records = store.len()?, "dataset opened");
        Ok(store)
    }

    /// Swaps the whole dataset. Readers holding a snapshot keep the old rows.
    pub fn replace_all(&self, records: Vec<SaleRecord>) -> StorageResult<()> {
        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            if !seen.insert(record.transaction_id.as_str()) {
                return Err(StorageError::duplicate_transaction(&record.transaction_id));
            }
        }

        let count = records.len();
        let mut guard = self
            .rows
            .write()
            .map_err(|_| StorageError::unavailable("Dataset lock poisoned"))?;
        *guard = Arc::new(records);

        debug!(records = count, "dataset replaced");
        Ok(())
    }

    fn current(&self) -> StorageResult<MemorySnapshot> {
        let guard = self
            .rows
            .read()
            .map_err(|_| StorageError::unavailable("Dataset lock poisoned"))?;
        Ok(MemorySnapshot {
            rows: Arc::clone(&guard),
        })
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::empty()
    }
}

impl StoreRead for MemoryStore {
    fn fetch_window(
        &self,
        predicate: &Predicate,
        order: &OrderSpec,
        window: Window,
    ) -> StorageResult<WindowedRows> {
        self.current()?.fetch_window(predicate, order, window)
    }

    fn aggregate(&self, predicate: &Predicate) -> StorageResult<Totals> {
        self.current()?.aggregate(predicate)
    }
}

impl SalesStore for MemoryStore {
    fn snapshot(&self) -> StorageResult<Box<dyn StoreRead + Send + '_>> {
        Ok(Box::new(self.current()?))
    }

    fn len(&self) -> StorageResult<usize> {
        Ok(self.current()?.rows.len())
    }
}

/// A fixed view of the dataset at the moment it was taken
#[derive(Debug, Clone)]
pub struct MemorySnapshot {
    rows: Arc<Vec<SaleRecord>>,
}

impl MemorySnapshot {
    /// Matching rows in dataset order
    fn matching<'a>(&'a self, predicate: &Predicate) -> Vec<&'a SaleRecord> {
        self.rows
            .iter()
            .filter(|record| PredicateFilter::matches(record, predicate))
            .collect()
    }
}

impl StoreRead for MemorySnapshot {
    fn fetch_window(
        &self,
        predicate: &Predicate,
        order: &OrderSpec,
        window: Window,
    ) -> StorageResult<WindowedRows> {
        let mut matching = self.matching(predicate);
        let total_count = matching.len() as u64;

        ResultSorter::sort(&mut matching, order);

        let offset = usize::try_from(window.offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(window.limit).unwrap_or(usize::MAX);
        let rows = matching
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect();

        Ok(WindowedRows { rows, total_count })
    }

    fn aggregate(&self, predicate: &Predicate) -> StorageResult<Totals> {
        let mut totals = Totals::default();

        for record in self.matching(predicate) {
            totals.final_amount = checked_sum(totals.final_amount, record.final_amount)?;
            totals.total_amount = checked_sum(totals.total_amount, record.total_amount)?;
        }

        Ok(totals)
    }
}

fn checked_sum(acc: Decimal, value: Decimal) -> StorageResult<Decimal> {
    acc.checked_add(value)
        .ok_or_else(|| StorageError::read_failed("Amount sum overflowed"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::{Clause, Condition, SortKey};
    use crate::schema::TextColumn;
    use chrono::NaiveDate;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn make(id: i64, region: &str, final_amount: i64, total_amount: i64) -> SaleRecord {
        let date = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap() + chrono::Days::new(id as u64);
        SaleRecord::new(id, format!("T-{}", id), date)
            .with_customer(format!("Customer {}", id), "000")
            .with_region(region)
            .with_amounts(Decimal::from(total_amount), Decimal::from(final_amount))
    }

    fn region(value: &str) -> Predicate {
        Predicate::always().and(Clause::single(Condition::OneOf {
            column: TextColumn::CustomerRegion,
            values: vec![value.to_string()],
        }))
    }

    fn store() -> MemoryStore {
        MemoryStore::from_records(vec![
            make(1, "East", 100, 120),
            make(2, "West", 50, 50),
            make(3, "East", 200, 250),
        ])
        .unwrap()
    }

    #[test]
    fn test_window_counts_whole_match_set() {
        let store = store();
        let window = Window {
            offset: 0,
            limit: 1,
        };
        let result = store
            .fetch_window(&region("East"), &OrderSpec::asc(SortKey::Date), window)
            .unwrap();

        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.rows[0].id, 1);
        assert_eq!(result.total_count, 2);
    }

    #[test]
    fn test_window_past_end_is_empty() {
        let store = store();
        let window = Window {
            offset: 10,
            limit: 10,
        };
        let result = store
            .fetch_window(&Predicate::always(), &OrderSpec::asc(SortKey::Date), window)
            .unwrap();

        assert!(result.rows.is_empty());
        assert_eq!(result.total_count, 3);
    }

    #[test]
    fn test_aggregate_sums_matches() {
        let totals = store().aggregate(&region("East")).unwrap();
        assert_eq!(totals.final_amount, Decimal::from(300));
        assert_eq!(totals.total_amount, Decimal::from(370));
    }

    #[test]
    fn test_aggregate_no_matches_is_zero() {
        let totals = store().aggregate(&region("North")).unwrap();
        assert_eq!(totals, Totals::default());
    }

    #[test]
    fn test_duplicate_transaction_rejected() {
        let result = MemoryStore::from_records(vec![make(1, "East", 1, 1), make(1, "West", 2, 2)]);
        let err = result.err().unwrap();
        assert_eq!(err.code().code(), "SALES_STORAGE_INVALID_DATASET");
    }

    #[test]
    fn test_snapshot_survives_replace() {
        let store = store();
        let snapshot = store.snapshot().unwrap();

        store.replace_all(vec![make(9, "East", 1, 1)]).unwrap();

        let pinned = snapshot.aggregate(&Predicate::always()).unwrap();
        assert_eq!(pinned.final_amount, Decimal::from(350));

        let live = store.aggregate(&Predicate::always()).unwrap();
        assert_eq!(live.final_amount, Decimal::from(1));
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn test_open_dataset_file() {
        let records = vec![make(1, "East", 10, 12), make(2, "West", 20, 20)];
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(serde_json::to_string(&records).unwrap().as_bytes())
            .unwrap();

        let store = MemoryStore::open(file.path()).unwrap();
        assert_eq!(store.len().unwrap(), 2);
        assert!(!store.is_empty().unwrap());
    }

    #[test]
    fn test_open_missing_file() {
        let err = MemoryStore::open(Path::new("/nonexistent/sales.json"))
            .err()
            .unwrap();
        assert_eq!(err.code().code(), "SALES_STORAGE_IO_ERROR");
    }
}
