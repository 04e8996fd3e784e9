// src/storage/mod.rs
use std::fs;
use std::path::{Path, PathBuf};
use crate::disclosure::{DocumentCandidate, DocumentFetcher, FetchedDocument};
use crate::extractors::TransactionRecord;
use crate::utils::error::StorageError;

const PDF_DIR: &str = "pdf_downloads";
const XML_DIR: &str = "xml_files";
const MANIFEST_FILE: &str = "manifest.json";

pub const TRANSACTION_COLUMNS: [&str; 5] = [
    "asset",
    "transaction_type",
    "transaction_date",
    "description",
    "source_file",
];

pub struct StorageManager {
    base_dir: PathBuf,
}

impl StorageManager {
    /// Creates a new StorageManager with the specified base directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();

        // Create the base directory if it doesn't exist
        if !base_path.exists() {
            fs::create_dir_all(&base_path)
                .map_err(StorageError::IoError)?;
        }

        Ok(Self { base_dir: base_path })
    }

    /// Where the yearly index archives are unpacked (one subdirectory per year).
    pub fn index_dir(&self) -> PathBuf {
        self.base_dir.join(XML_DIR)
    }

    /// Where report PDFs are stored.
    pub fn document_dir(&self) -> PathBuf {
        self.base_dir.join(PDF_DIR)
    }

    /// Downloads each candidate in turn and saves it. A failed download or write
    /// is logged and skipped; the rest of the batch still runs.
    pub async fn store_documents<F: DocumentFetcher>(
        &self,
        fetcher: &F,
        candidates: &[DocumentCandidate],
    ) -> Vec<FetchedDocument> {
        let mut fetched = Vec::with_capacity(candidates.len());
        let mut failure_count = 0;

        for candidate in candidates {
            let bytes = match fetcher.fetch(&candidate.url).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::error!("Failed to download {}: {}", candidate.url, e);
                    failure_count += 1;
                    continue;
                }
            };

            match self.save_document(candidate, &bytes) {
                Ok(document) => {
                    tracing::info!("Downloaded: {}", document.local_path);
                    fetched.push(document);
                }
                Err(e) => {
                    tracing::error!("Failed to save {}: {}", candidate.file_name(), e);
                    failure_count += 1;
                }
            }
        }

        tracing::info!("Documents stored: {}, failed: {}", fetched.len(), failure_count);
        fetched
    }

    /// Writes one report to `pdf_downloads/{last_name}_{document_id}.pdf`.
    pub fn save_document(&self, candidate: &DocumentCandidate, bytes: &[u8]) -> Result<FetchedDocument, StorageError> {
        let target_dir = self.document_dir();
        fs::create_dir_all(&target_dir)?;

        let file_path = target_dir.join(candidate.file_name());
        fs::write(&file_path, bytes)?;

        Ok(FetchedDocument {
            member_last_name: candidate.last_name.clone(),
            document_id: candidate.document_id.clone(),
            local_path: file_path.to_string_lossy().into_owned(),
        })
    }

    /// Every `*.pdf` already in the document directory, sorted by file name.
    /// Names are expected to look like `{last_name}_{document_id}.pdf`.
    pub fn list_documents(&self) -> Result<Vec<FetchedDocument>, StorageError> {
        let dir = self.document_dir();
        if !dir.exists() {
            tracing::warn!("Document directory {} does not exist", dir.display());
            return Ok(Vec::new());
        }

        let mut paths = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            let is_pdf = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
            if is_pdf && path.is_file() {
                paths.push(path);
            }
        }
        paths.sort();

        Ok(paths
            .into_iter()
            .map(|path| {
                let stem = path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let (last_name, document_id) = match stem.rsplit_once('_') {
                    Some((last, id)) => (last.to_string(), id.to_string()),
                    None => (stem.clone(), String::new()),
                };
                FetchedDocument {
                    member_last_name: last_name,
                    document_id,
                    local_path: path.to_string_lossy().into_owned(),
                }
            })
            .collect())
    }

    /// Records what this run downloaded in `pdf_downloads/manifest.json`.
    pub fn save_manifest(&self, documents: &[FetchedDocument]) -> Result<PathBuf, StorageError> {
        let target_dir = self.document_dir();
        fs::create_dir_all(&target_dir)?;
        let file_path = target_dir.join(MANIFEST_FILE);

        let manifest = serde_json::json!({
            "document_count": documents.len(),
            "documents": documents,
            "fetched_at": chrono::Utc::now().to_rfc3339(),
        });

        let manifest_str = serde_json::to_string_pretty(&manifest)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;

        fs::write(&file_path, manifest_str)?;

        tracing::debug!("Saved manifest to {}", file_path.display());
        Ok(file_path)
    }

    /// Writes all transactions to `file_name` under the base directory, replacing
    /// any previous file. The header row is always written.
    pub fn save_transactions(&self, file_name: &str, transactions: &[TransactionRecord]) -> Result<PathBuf, StorageError> {
        let file_path = self.base_dir.join(file_name);

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&file_path)?;

        writer.write_record(TRANSACTION_COLUMNS)?;
        for transaction in transactions {
            writer.serialize(transaction)?;
        }
        writer.flush()?;

        tracing::info!("Transactions saved to {}", file_path.display());
        Ok(file_path)
    }
}
