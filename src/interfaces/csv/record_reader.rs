use crate::domain::record::SpendingEntry;
use crate::error::{Result, SpendingError};
use std::io::Read;

/// Reads spending entries from a CSV source.
///
/// Expects a `user_id, age, amount` header; `age` may be left empty. This
/// reader wraps `csv::Reader` and provides an iterator over `Result<SpendingEntry>`.
/// It handles whitespace trimming and flexible record lengths automatically.
pub struct RecordReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> RecordReader<R> {
    /// Creates a new `RecordReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes entries.
    pub fn entries(self) -> impl Iterator<Item = Result<SpendingEntry>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(SpendingError::from))
    }
}
