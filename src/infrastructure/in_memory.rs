use crate::domain::ports::RecordStore;
use crate::domain::record::{SpendingRecord, UserId};
use crate::error::{Result, SpendingError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory record store.
///
/// Uses `Arc<RwLock<HashMap<UserId, SpendingRecord>>>` to allow shared concurrent access.
/// `create` checks and inserts under a single write guard, so duplicate
/// registrations racing each other resolve to one success and one conflict.
#[derive(Default, Clone)]
pub struct InMemoryRecordStore {
    records: Arc<RwLock<HashMap<UserId, SpendingRecord>>>,
}

impl InMemoryRecordStore {
    /// Creates a new, empty in-memory record store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn get(&self, user_id: UserId) -> Result<Option<SpendingRecord>> {
        let records = self.records.read().await;
        Ok(records.get(&user_id).cloned())
    }

    async fn scan_all(&self) -> Result<Vec<SpendingRecord>> {
        let records = self.records.read().await;
        Ok(records.values().cloned().collect())
    }

    async fn create(&self, record: SpendingRecord) -> Result<()> {
        let mut records = self.records.write().await;
        match records.entry(record.user_id) {
            Entry::Occupied(_) => Err(SpendingError::Conflict {
                user_id: record.user_id.value(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(record);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::Money;
    use rust_decimal_macros::dec;

    fn record(user_id: u64) -> SpendingRecord {
        SpendingRecord::new(UserId::new(user_id).unwrap(), Money::new(dec!(100.0)).unwrap())
    }

    #[tokio::test]
    async fn test_in_memory_create_and_get() {
        let store = InMemoryRecordStore::new();
        let record = record(1);

        store.create(record.clone()).await.unwrap();
        let retrieved = store.get(UserId::new(1).unwrap()).await.unwrap().unwrap();
        assert_eq!(retrieved, record);

        assert!(store.get(UserId::new(2).unwrap()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_in_memory_create_rejects_duplicate() {
        let store = InMemoryRecordStore::new();
        store.create(record(1)).await.unwrap();

        let mut duplicate = record(1);
        duplicate.total_spending = Money::new(dec!(5.0)).unwrap();
        let err = store.create(duplicate).await.unwrap_err();
        assert!(matches!(err, SpendingError::Conflict { user_id: 1 }));

        let kept = store.get(UserId::new(1).unwrap()).await.unwrap().unwrap();
        assert_eq!(kept.total_spending.value(), dec!(100.0));
    }

    #[tokio::test]
    async fn test_in_memory_scan_all() {
        let store = InMemoryRecordStore::new();
        assert!(store.scan_all().await.unwrap().is_empty());

        store.create(record(1)).await.unwrap();
        store.create(record(2)).await.unwrap();

        let mut ids: Vec<u64> = store
            .scan_all()
            .await
            .unwrap()
            .iter()
            .map(|r| r.user_id.value())
            .collect();
        ids.sort();
        assert_eq!(ids, vec![1, 2]);
    }
}
