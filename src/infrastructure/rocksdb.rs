use crate::domain::ports::RecordStore;
use crate::domain::record::{SpendingRecord, UserId};
use crate::error::{Result, SpendingError};
use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, DB, Options};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Column Family for storing spending records, keyed by big-endian user id.
pub const CF_RECORDS: &str = "records";

/// A persistent record store implementation using RocksDB.
///
/// Records are stored as JSON under their user id. `create` runs its
/// existence check and write under `create_lock`, which makes it atomic
/// for every handle cloned from the same `open` call.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBRecordStore {
    db: Arc<DB>,
    create_lock: Arc<Mutex<()>>,
}

impl RocksDBRecordStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that the "records" column family exists.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_records = ColumnFamilyDescriptor::new(CF_RECORDS, Options::default());
        let db = DB::open_cf_descriptors(&opts, path.as_ref(), vec![cf_records])?;
        tracing::info!(path = %path.as_ref().display(), "opened record store");

        Ok(Self {
            db: Arc::new(db),
            create_lock: Arc::new(Mutex::new(())),
        })
    }

    fn records_cf(&self) -> Result<&rocksdb::ColumnFamily> {
        self.db
            .cf_handle(CF_RECORDS)
            .ok_or_else(|| SpendingError::Storage("Records column family not found".to_string()))
    }

    fn decode(bytes: &[u8]) -> Result<SpendingRecord> {
        serde_json::from_slice(bytes)
            .map_err(|e| SpendingError::Storage(format!("Deserialization error: {}", e)))
    }
}

#[async_trait]
impl RecordStore for RocksDBRecordStore {
    async fn get(&self, user_id: UserId) -> Result<Option<SpendingRecord>> {
        let cf = self.records_cf()?;
        let key = user_id.value().to_be_bytes();

        match self.db.get_pinned_cf(cf, key)? {
            Some(bytes) => Ok(Some(Self::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn scan_all(&self) -> Result<Vec<SpendingRecord>> {
        let cf = self.records_cf()?;

        let mut records = Vec::new();
        for item in self.db.iterator_cf(cf, rocksdb::IteratorMode::Start) {
            let (_key, value) = item?;
            records.push(Self::decode(&value)?);
        }

        Ok(records)
    }

    async fn create(&self, record: SpendingRecord) -> Result<()> {
        let key = record.user_id.value().to_be_bytes();
        let value = serde_json::to_vec(&record)
            .map_err(|e| SpendingError::Storage(format!("Serialization error: {}", e)))?;

        let _guard = self.create_lock.lock().await;
        let cf = self.records_cf()?;
        if self.db.get_pinned_cf(cf, key)?.is_some() {
            return Err(SpendingError::Conflict {
                user_id: record.user_id.value(),
            });
        }
        self.db.put_cf(cf, key, value)?;

        Ok(())
    }
}
