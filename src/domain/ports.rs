use super::record::{SpendingRecord, UserId};
use crate::error::Result;
use async_trait::async_trait;

/// Keyed storage of spending records.
///
/// Implementations must make `create` atomic and linearizable per `user_id`:
/// of two concurrent creates for the same id exactly one succeeds and the
/// other fails with `SpendingError::Conflict`.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn get(&self, user_id: UserId) -> Result<Option<SpendingRecord>>;
    /// Snapshot of every record, in no particular order.
    async fn scan_all(&self) -> Result<Vec<SpendingRecord>>;
    async fn create(&self, record: SpendingRecord) -> Result<()>;
}

pub type RecordStoreBox = Box<dyn RecordStore>;
pub type RecordStoreFactory = Box<dyn Fn() -> RecordStoreBox + Send + Sync>;
