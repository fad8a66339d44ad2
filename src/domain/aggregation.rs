//! Average spending per age and per age group.

use super::record::SpendingRecord;
use crate::error::{Result, SpendingError};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Decimal places kept on every reported average.
pub const AVERAGE_DECIMAL_PLACES: u32 = 2;

/// Running sum, mean and count for one bucket.
///
/// The exact sum is used while it fits in a `Decimal`. Once it would
/// overflow, the average falls back to the incrementally updated mean.
#[derive(Debug, Clone, Copy)]
struct Bucket {
    sum: Option<Decimal>,
    mean: Decimal,
    count: u64,
}

impl Default for Bucket {
    fn default() -> Self {
        Self {
            sum: Some(Decimal::ZERO),
            mean: Decimal::ZERO,
            count: 0,
        }
    }
}

impl Bucket {
    fn push(&mut self, amount: Decimal) {
        self.count += 1;
        self.sum = self.sum.and_then(|sum| sum.checked_add(amount));
        // Both operands lie in [0, Decimal::MAX], so neither step can overflow.
        self.mean += (amount - self.mean) / Decimal::from(self.count);
    }

    fn average(&self) -> Decimal {
        let mean = match self.sum {
            Some(sum) => sum / Decimal::from(self.count),
            None => self.mean,
        };
        round_average(mean)
    }
}

/// Rounds to two places, ties to even, and pads the scale so that
/// `150` is reported as `150.00`.
pub fn round_average(value: Decimal) -> Decimal {
    let mut rounded =
        value.round_dp_with_strategy(AVERAGE_DECIMAL_PLACES, RoundingStrategy::MidpointNearestEven);
    rounded.rescale(AVERAGE_DECIMAL_PLACES);
    rounded
}

/// Mean `total_spending` for every distinct age, in ascending age order.
///
/// Records without an age contribute to no bucket. An input with no aged
/// records yields an empty map.
pub fn average_spending_by_age(records: &[SpendingRecord]) -> BTreeMap<u32, Decimal> {
    let mut buckets: BTreeMap<u32, Bucket> = BTreeMap::new();
    for record in records {
        if let Some(age) = record.age {
            buckets
                .entry(age)
                .or_default()
                .push(record.total_spending.value());
        }
    }

    buckets
        .into_iter()
        .map(|(age, bucket)| (age, bucket.average()))
        .collect()
}

/// An inclusive age range with a display label. `max: None` is open-ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeBand {
    pub label: String,
    pub min: u32,
    pub max: Option<u32>,
}

impl AgeBand {
    pub fn new(label: impl Into<String>, min: u32, max: Option<u32>) -> Self {
        Self {
            label: label.into(),
            min,
            max,
        }
    }

    pub fn contains(&self, age: u32) -> bool {
        age >= self.min && self.max.is_none_or(|max| age <= max)
    }

    fn upper(&self) -> u32 {
        self.max.unwrap_or(u32::MAX)
    }
}

/// The age groups reported by the spending statistics page.
pub fn default_age_bands() -> Vec<AgeBand> {
    vec![
        AgeBand::new("18-24", 18, Some(24)),
        AgeBand::new("25-30", 25, Some(30)),
        AgeBand::new("31-36", 31, Some(36)),
        AgeBand::new("37-47", 37, Some(47)),
        AgeBand::new(">47", 48, None),
    ]
}

/// Checks labels are non-empty, bounds are ordered and no two bands overlap.
pub fn validate_age_bands(bands: &[AgeBand]) -> Result<()> {
    for band in bands {
        if band.label.trim().is_empty() {
            return Err(SpendingError::InvalidArgument(
                "age band label must not be empty".to_string(),
            ));
        }
        if band.min > band.upper() {
            return Err(SpendingError::InvalidArgument(format!(
                "age band '{}' has min above max",
                band.label
            )));
        }
    }

    let mut sorted: Vec<&AgeBand> = bands.iter().collect();
    sorted.sort_by_key(|band| band.min);
    for pair in sorted.windows(2) {
        if pair[1].min <= pair[0].upper() {
            return Err(SpendingError::InvalidArgument(format!(
                "age bands '{}' and '{}' overlap",
                pair[0].label, pair[1].label
            )));
        }
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgeGroupAverage {
    pub label: String,
    pub count: u64,
    pub average: Decimal,
}

/// Mean `total_spending` per age band, in band order.
///
/// Bands that received no record are left out. Records without an age, or
/// whose age falls in no band, are skipped.
pub fn average_spending_by_age_group(
    records: &[SpendingRecord],
    bands: &[AgeBand],
) -> Vec<AgeGroupAverage> {
    let mut buckets = vec![Bucket::default(); bands.len()];
    for record in records {
        let Some(age) = record.age else { continue };
        if let Some(index) = bands.iter().position(|band| band.contains(age)) {
            buckets[index].push(record.total_spending.value());
        }
    }

    bands
        .iter()
        .zip(buckets)
        .filter(|(_, bucket)| bucket.count > 0)
        .map(|(band, bucket)| AgeGroupAverage {
            label: band.label.clone(),
            count: bucket.count,
            average: bucket.average(),
        })
        .collect()
}
