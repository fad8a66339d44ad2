use crate::config::EngineConfig;
use crate::domain::aggregation::{self, AgeGroupAverage};
use crate::domain::ports::RecordStoreBox;
use crate::domain::ranking::{self, RankedSpender};
use crate::domain::record::{Money, SpendingEntry, SpendingRecord, UserId};
use crate::error::{Result, SpendingError};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// Outcome of a bulk import.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    /// Users written to the store.
    pub created: usize,
    /// Users skipped because the store already held them.
    pub conflicts: Vec<UserId>,
}

/// The entry point for every spending request.
///
/// `SpendingService` owns the record store and the engine configuration.
/// It holds no other state: each call reads a fresh snapshot from the store,
/// runs one of the pure engines over it and, for registration, performs a
/// single `create`.
pub struct SpendingService {
    store: RecordStoreBox,
    config: EngineConfig,
}

impl SpendingService {
    /// Creates a new `SpendingService` instance.
    ///
    /// # Arguments
    ///
    /// * `store` - The record store backing every request.
    /// * `config` - Bonus policy, default ranking size and age bands.
    pub fn new(store: RecordStoreBox, config: EngineConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub async fn lookup(&self, user_id: UserId) -> Result<Option<SpendingRecord>> {
        self.store.get(user_id).await
    }

    pub async fn average_spending_by_age(&self) -> Result<BTreeMap<u32, Decimal>> {
        let records = self.store.scan_all().await?;
        Ok(aggregation::average_spending_by_age(&records))
    }

    pub async fn average_spending_by_age_group(&self) -> Result<Vec<AgeGroupAverage>> {
        let records = self.store.scan_all().await?;
        Ok(aggregation::average_spending_by_age_group(
            &records,
            &self.config.age_bands,
        ))
    }

    /// Top `n` records, `config.default_top_n` when `n` is `None`.
    pub async fn top_spenders(&self, n: Option<usize>) -> Result<Vec<SpendingRecord>> {
        let records = self.store.scan_all().await?;
        ranking::top_spenders(&records, n.unwrap_or(self.config.default_top_n))
    }

    /// Same ranking as [`Self::top_spenders`], with rank and projected bonus.
    pub async fn ranked_spenders(&self, n: Option<usize>) -> Result<Vec<RankedSpender>> {
        let records = self.store.scan_all().await?;
        ranking::ranked_view(
            &records,
            n.unwrap_or(self.config.default_top_n),
            &self.config.bonus,
        )
    }

    /// Registers a high spender and returns the stored record with its bonus.
    ///
    /// Validate, compute, write. Registration never overwrites: an existing
    /// record for `user_id` yields `SpendingError::Conflict`, whether it is
    /// seen by the pre-check or by the store's atomic `create`.
    pub async fn register_high_spender(
        &self,
        user_id: UserId,
        total_spending: Money,
    ) -> Result<(SpendingRecord, u64)> {
        let policy = &self.config.bonus;
        if !policy.qualifies(total_spending) {
            return Err(SpendingError::InvalidInput(format!(
                "total_spending must be at least {} to qualify as a high-spending user",
                policy.qualifying_threshold
            )));
        }

        if self.store.get(user_id).await?.is_some() {
            return Err(SpendingError::Conflict {
                user_id: user_id.value(),
            });
        }

        let bonus_points = policy.bonus_points(total_spending);
        let record = SpendingRecord {
            bonus_points: Some(bonus_points),
            ..SpendingRecord::new(user_id, total_spending)
        };

        self.store.create(record.clone()).await?;
        Ok((record, bonus_points))
    }

    /// Registered high spenders, by ascending `user_id`.
    pub async fn high_spenders(&self) -> Result<Vec<SpendingRecord>> {
        let mut records: Vec<SpendingRecord> = self
            .store
            .scan_all()
            .await?
            .into_iter()
            .filter(SpendingRecord::is_high_spender)
            .collect();
        records.sort_by_key(|record| record.user_id);
        Ok(records)
    }

    /// Folds spending entries into one record per user and creates them.
    ///
    /// Amounts are summed per user and the last non-empty age wins. Every
    /// entry is validated before the first write, and a per-user total that
    /// leaves the decimal range fails the import with `InvalidInput`. Users
    /// already present in the store are skipped and reported in the summary.
    pub async fn import<I>(&self, entries: I) -> Result<ImportSummary>
    where
        I: IntoIterator<Item = SpendingEntry>,
    {
        let mut folded: BTreeMap<UserId, SpendingRecord> = BTreeMap::new();
        for entry in entries {
            let record = folded
                .entry(entry.user_id)
                .or_insert_with(|| SpendingRecord::new(entry.user_id, Money::ZERO));
            record.total_spending = record.total_spending.checked_add(entry.amount)?;
            if let Some(age) = entry.age {
                *record = record.clone().with_age(age)?;
            }
        }

        let mut summary = ImportSummary::default();
        for record in folded.into_values() {
            let user_id = record.user_id;
            match self.store.create(record).await {
                Ok(()) => summary.created += 1,
                Err(SpendingError::Conflict { .. }) => summary.conflicts.push(user_id),
                Err(e) => return Err(e),
            }
        }
        Ok(summary)
    }
}
