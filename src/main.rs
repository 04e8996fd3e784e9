// src/main.rs
mod utils;
mod disclosure;
mod extractors;
mod storage;

use clap::Parser;
use utils::AppError;
use disclosure::{index, resolver, DisclosureClient, FetchedDocument};
use extractors::TransactionRecord;
use storage::StorageManager;

/// Pulls House periodic transaction reports for a year and extracts the trades they list
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Disclosure year, e.g. 2024
    #[arg(short, long)]
    year: Option<u32>,

    /// Only fetch reports filed by members with this last name (case-insensitive)
    #[arg(short, long)]
    last_name: Option<String>,

    /// Directory for downloaded archives, reports and the output file
    #[arg(short, long, default_value = ".")]
    output_dir: String,

    /// Name of the transactions CSV, relative to the output directory
    #[arg(long, default_value = "transactions.csv")]
    output_file: String,

    /// Skip downloading and re-parse the reports already in the download directory
    #[arg(long)]
    offline: bool,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging();

    // 2. Parse CLI Arguments
    let args = Args::parse();
    tracing::info!("Starting processing for args: {:?}", args);

    // 3. Initialize storage
    let storage = StorageManager::new(&args.output_dir)?;

    // 4. Collect the reports to parse
    let documents = if args.offline {
        tracing::info!("Offline mode: using reports in {}", storage.document_dir().display());
        storage.list_documents()?
    } else {
        download_documents(&args, &storage).await?
    };

    // 5. Extract transactions from each report
    tracing::info!("Extracting transactions from {} reports...", documents.len());
    let transactions = process_documents(&documents);

    // 6. Write the output
    let path = storage.save_transactions(&args.output_file, &transactions)?;
    tracing::info!("Processing finished. {} transactions written to {}", transactions.len(), path.display());

    Ok(())
}

/// Index fetch, resolution and download. A missing index leaves nothing to download.
async fn download_documents(args: &Args, storage: &StorageManager) -> Result<Vec<FetchedDocument>, AppError> {
    let client = DisclosureClient::new()?;

    tracing::info!("Downloading and extracting XML...");
    let entries = index::fetch_index(&client, args.year, &storage.index_dir()).await?;
    let (Some(entries), Some(year)) = (entries, args.year) else {
        tracing::warn!("No disclosure index available; nothing to download");
        return Ok(Vec::new());
    };

    let candidates = resolver::resolve_documents(&entries, args.last_name.as_deref(), year);
    match &args.last_name {
        Some(name) => tracing::info!("{} of {} documents match last name '{}'", candidates.len(), entries.len(), name),
        None => tracing::info!("Resolved {} documents", candidates.len()),
    }

    tracing::info!("Downloading PDFs...");
    let documents = storage.store_documents(&client, &candidates).await;

    if let Err(e) = storage.save_manifest(&documents) {
        tracing::warn!("Failed to save fetch manifest: {}", e);
    }

    Ok(documents)
}

/// Runs every document through extraction and parsing. A document that cannot be
/// read is logged and contributes nothing.
fn process_documents(documents: &[FetchedDocument]) -> Vec<TransactionRecord> {
    let mut transactions = Vec::new();
    let mut success_count = 0;
    let mut failure_count = 0;

    for document in documents {
        tracing::info!("Processing {}...", document.local_path);
        match extractors::extract_transactions(document) {
            Ok(parsed) => {
                for transaction in &parsed {
                    tracing::debug!("Parsed transaction: {:?}", transaction);
                }
                tracing::info!("{} transactions in {}", parsed.len(), document.file_name());
                transactions.extend(parsed);
                success_count += 1;
            }
            Err(e) => {
                tracing::error!("Failed to extract text from {}: {}", document.local_path, e);
                failure_count += 1;
            }
        }
    }

    tracing::info!("Documents parsed: {}, failed: {}", success_count, failure_count);
    transactions
}
