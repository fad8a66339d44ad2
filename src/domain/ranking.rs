use super::bonus::BonusPolicy;
use super::record::{Money, SpendingRecord, UserId};
use crate::error::{Result, SpendingError};
use serde::Serialize;

/// Number of spenders returned when the caller does not ask for a count.
pub const DEFAULT_TOP_N: usize = 100;

/// The `n` records with the greatest `total_spending`.
///
/// Ordered by spending descending, then by `user_id` ascending, so equal
/// spenders always come out in the same order. Fewer than `n` records
/// returns all of them.
pub fn top_spenders(records: &[SpendingRecord], n: usize) -> Result<Vec<SpendingRecord>> {
    if n == 0 {
        return Err(SpendingError::InvalidArgument(
            "n must be a positive integer".to_string(),
        ));
    }

    let mut ranked = records.to_vec();
    ranked.sort_by(|a, b| {
        b.total_spending
            .cmp(&a.total_spending)
            .then_with(|| a.user_id.cmp(&b.user_id))
    });
    ranked.truncate(n);
    Ok(ranked)
}

/// One row of the top-spenders table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedSpender {
    /// 1-based position in the ranking.
    pub rank: usize,
    pub user_id: UserId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    pub total_spending: Money,
    /// Points this spender would earn under `policy`, whether or not registered.
    pub bonus_points: u64,
}

pub fn ranked_view(
    records: &[SpendingRecord],
    n: usize,
    policy: &BonusPolicy,
) -> Result<Vec<RankedSpender>> {
    Ok(top_spenders(records, n)?
        .into_iter()
        .enumerate()
        .map(|(index, record)| RankedSpender {
            rank: index + 1,
            user_id: record.user_id,
            age: record.age,
            total_spending: record.total_spending,
            bonus_points: policy.bonus_points(record.total_spending),
        })
        .collect())
}
