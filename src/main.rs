use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use std::collections::BTreeSet;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use wallet_ledger::application::logging::LoggingMiddleware;
use wallet_ledger::application::service::{LedgerService, WalletService};
use wallet_ledger::config::ServiceConfig;
use wallet_ledger::domain::account::AccountId;
use wallet_ledger::domain::ports::LedgerStoreRef;
use wallet_ledger::error::LedgerError;
use wallet_ledger::infrastructure::in_memory::InMemoryStore;
#[cfg(feature = "storage-rocksdb")]
use wallet_ledger::infrastructure::rocksdb::RocksDbStore;
use wallet_ledger::interfaces::csv::payment_reader::PaymentReader;
use wallet_ledger::interfaces::csv::writer::{AccountWriter, PaymentWriter};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,

    /// Abort any unit of work that runs longer than this many milliseconds.
    #[arg(long, global = true)]
    deadline_ms: Option<u64>,

    /// Log filter such as `debug` or `wallet_ledger=trace`. Falls back to
    /// RUST_LOG, then `warn`.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Apply every payment of a `from,to,amount` CSV file and print the
    /// resulting balances
    Apply {
        /// Input payments CSV file
        input: PathBuf,
    },
    /// Print a single account
    Account { id: AccountId },
    /// Print the payments sent or received by an account
    Payments { id: AccountId },
}

fn init_tracing(level: Option<&str>) {
    let filter = level
        .map(EnvFilter::new)
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn open_store(db_path: Option<PathBuf>) -> Result<LedgerStoreRef> {
    match db_path {
        #[cfg(feature = "storage-rocksdb")]
        Some(path) => {
            let store = RocksDbStore::open(path).into_diagnostic()?;
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "storage-rocksdb"))]
        Some(_) => {
            eprintln!(
                "WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
            );
            Ok(Arc::new(InMemoryStore::new()))
        }
        None => Ok(Arc::new(InMemoryStore::new())),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());

    let mut config = ServiceConfig::default();
    if let Some(ms) = cli.deadline_ms {
        config = config.with_deadline(Duration::from_millis(ms));
    }

    let store = open_store(cli.db_path)?;
    let service = LoggingMiddleware::new(LedgerService::new(store).with_config(config));

    match cli.command {
        Command::Apply { input } => apply(&service, input).await,
        Command::Account { id } => {
            let account = service.get_account(id).await.into_diagnostic()?;
            let stdout = io::stdout();
            AccountWriter::new(stdout.lock())
                .write_account_details(&account)
                .into_diagnostic()
        }
        Command::Payments { id } => {
            let mut payments = service.get_payments(id).await.into_diagnostic()?;
            payments.sort_by_key(|p| (p.created_at, p.id));
            let stdout = io::stdout();
            PaymentWriter::new(stdout.lock())
                .write_payments(payments)
                .into_diagnostic()
        }
    }
}

async fn apply(service: &impl WalletService, input: PathBuf) -> Result<()> {
    let file = File::open(input).into_diagnostic()?;
    let reader = PaymentReader::new(file);

    let mut referenced = BTreeSet::new();
    for (index, request) in reader.requests().enumerate() {
        let row = index + 1;
        match request {
            Ok(request) => {
                referenced.insert(request.from);
                referenced.insert(request.to);
                if let Err(e) = service.apply_payment(request).await {
                    eprintln!("Error applying payment on row {}: {}", row, e);
                }
            }
            Err(e) => {
                eprintln!("Error reading payment on row {}: {}", row, e);
            }
        }
    }

    let mut accounts = Vec::new();
    for id in referenced {
        match service.get_account(id).await {
            Ok(account) => accounts.push(account),
            Err(LedgerError::AccountNotFound(_) | LedgerError::InvalidRequest(_)) => {}
            Err(e) => return Err(e).into_diagnostic(),
        }
    }

    let stdout = io::stdout();
    let mut writer = AccountWriter::new(stdout.lock());
    writer.write_accounts(accounts).into_diagnostic()?;

    Ok(())
}
