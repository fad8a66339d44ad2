use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use rust_decimal::Decimal;
use serde::Serialize;
use spending_engine::application::service::{ImportSummary, SpendingService};
use spending_engine::config::{EngineArgs, EngineConfig};
use spending_engine::domain::ports::RecordStoreBox;
use spending_engine::domain::record::SpendingEntry;
use spending_engine::error::SpendingError;
use spending_engine::infrastructure::in_memory::InMemoryRecordStore;
use spending_engine::interfaces::csv::record_reader::RecordReader;
use spending_engine::interfaces::json::{
    ErrorBody, LookupRequest, RegistrationRequest, RegistrationResponse, TopSpendersRequest,
};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Spending CSV (user_id, age, amount) imported before the command runs
    #[arg(long)]
    records: Option<PathBuf>,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long, env = "SPENDING_DB_PATH")]
    db_path: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, env = "SPENDING_LOG", default_value = "warn")]
    log_level: String,

    #[command(flatten)]
    engine: EngineArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show one user's spending record
    Lookup {
        #[arg(allow_negative_numbers = true)]
        user_id: i64,
    },
    /// Average spending per age
    Averages {
        /// Report per age group instead of per single age
        #[arg(long)]
        groups: bool,
    },
    /// Top spenders by total spending
    Top {
        #[arg(short, long, allow_negative_numbers = true)]
        n: Option<i64>,
    },
    /// Register a high-spending user and compute their bonus points
    Register {
        #[arg(long, allow_negative_numbers = true, required_unless_present = "json")]
        user_id: Option<i64>,
        #[arg(long, allow_negative_numbers = true, required_unless_present = "json")]
        total_spending: Option<Decimal>,
        /// Registration body as JSON, e.g. '{"user_id": 5, "total_spending": 250.0}'
        #[arg(long, conflicts_with_all = ["user_id", "total_spending"])]
        json: Option<String>,
    },
    /// List registered high spenders
    HighSpenders,
    /// Import a spending CSV into the store
    Import { input: PathBuf },
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(feature = "storage-rocksdb")]
fn open_store(db_path: Option<PathBuf>) -> Result<RecordStoreBox> {
    use spending_engine::infrastructure::rocksdb::RocksDBRecordStore;

    match db_path {
        Some(path) => Ok(Box::new(RocksDBRecordStore::open(path).into_diagnostic()?)),
        None => Ok(Box::new(InMemoryRecordStore::new())),
    }
}

#[cfg(not(feature = "storage-rocksdb"))]
fn open_store(db_path: Option<PathBuf>) -> Result<RecordStoreBox> {
    if db_path.is_some() {
        tracing::warn!(
            "WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
        );
    }
    Ok(Box::new(InMemoryRecordStore::new()))
}

/// Reads a spending CSV, skipping malformed rows, and imports the rest.
async fn import_csv(
    service: &SpendingService,
    path: &Path,
) -> Result<ImportSummary, SpendingError> {
    let file = File::open(path)?;
    let mut entries: Vec<SpendingEntry> = Vec::new();
    for (line, entry) in RecordReader::new(file).entries().enumerate() {
        match entry {
            Ok(entry) => entries.push(entry),
            Err(e) => tracing::warn!(row = line + 1, error = %e, "Error reading spending row"),
        }
    }

    let summary = service.import(entries).await?;
    tracing::info!(created = summary.created, path = %path.display(), "imported spending records");
    for user_id in &summary.conflicts {
        tracing::warn!(%user_id, "user already present, import skipped");
    }
    Ok(summary)
}

fn to_json<T: Serialize>(value: &T) -> Result<String, SpendingError> {
    Ok(serde_json::to_string_pretty(value)?)
}

async fn run(service: &SpendingService, command: Command) -> Result<String, SpendingError> {
    match command {
        Command::Lookup { user_id } => {
            let user_id = LookupRequest { user_id }.validate()?;
            match service.lookup(user_id).await? {
                Some(record) => to_json(&record),
                None => Err(SpendingError::NotFound {
                    user_id: user_id.value(),
                }),
            }
        }
        Command::Averages { groups: false } => to_json(&service.average_spending_by_age().await?),
        Command::Averages { groups: true } => {
            to_json(&service.average_spending_by_age_group().await?)
        }
        Command::Top { n } => {
            let n = TopSpendersRequest { n }.validate()?;
            to_json(&service.ranked_spenders(n).await?)
        }
        Command::Register {
            user_id,
            total_spending,
            json,
        } => {
            let request = match (json, user_id, total_spending) {
                (Some(body), _, _) => RegistrationRequest::from_json(&body)?,
                (None, Some(user_id), Some(total_spending)) => RegistrationRequest {
                    user_id,
                    total_spending,
                },
                _ => {
                    return Err(SpendingError::InvalidInput(
                        "user_id and total_spending are required".to_string(),
                    ));
                }
            };
            let (user_id, total_spending) = request.validate()?;
            let registered = service
                .register_high_spender(user_id, total_spending)
                .await?;
            tracing::info!(%user_id, bonus_points = registered.1, "registered high spender");
            to_json(&RegistrationResponse::from(registered))
        }
        Command::HighSpenders => to_json(&service.high_spenders().await?),
        Command::Import { input } => to_json(&import_csv(service, &input).await?),
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let config = EngineConfig::try_from(cli.engine).into_diagnostic()?;
    let store = open_store(cli.db_path)?;
    let service = SpendingService::new(store, config);

    if let Some(path) = &cli.records {
        import_csv(&service, path).await.into_diagnostic()?;
    }

    match run(&service, cli.command).await {
        Ok(output) => {
            println!("{}", output);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            tracing::debug!(error = %e, "request failed");
            println!("{}", to_json(&ErrorBody::from(&e)).into_diagnostic()?);
            Ok(ExitCode::FAILURE)
        }
    }
}
