#![allow(dead_code)]

use rand::Rng;
use std::fs::File;
use std::io::Error;
use std::path::Path;

pub const FIXTURE: &str = "tests/fixtures/spending.csv";

/// Writes `rows` spending entries spread over `users` users with random ages and amounts.
pub fn generate_csv(path: &Path, rows: usize, users: u64) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);
    let mut rng = rand::thread_rng();

    wtr.write_record(["user_id", "age", "amount"])?;

    for i in 0..rows {
        let user_id = (i as u64 % users) + 1;
        // Ages are stable per user so the fold keeps a single value.
        let age = 18 + (user_id % 60);
        let cents: u32 = rng.gen_range(0..1_000_000);
        wtr.write_record([
            user_id.to_string(),
            age.to_string(),
            format!("{}.{:02}", cents / 100, cents % 100),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
