// src/extractors/mod.rs
pub mod text;
pub mod transactions;

pub use transactions::TransactionRecord;

use crate::disclosure::FetchedDocument;
use crate::utils::error::ExtractError;
use std::path::Path;

/// Runs one stored report through text extraction, normalization and parsing.
pub fn extract_transactions(document: &FetchedDocument) -> Result<Vec<TransactionRecord>, ExtractError> {
    let raw = text::extract_pdf_text(Path::new(&document.local_path))?;
    let normalized = text::normalize_text(&raw);
    if normalized.is_empty() {
        tracing::warn!("No text extracted from {}", document.local_path);
        return Ok(Vec::new());
    }

    Ok(transactions::parse_transactions(&normalized, &document.file_name()))
}
