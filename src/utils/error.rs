// src/utils/error.rs
use thiserror::Error;

// Define specific error types for different parts of the application
#[derive(Error, Debug)]
pub enum DisclosureError {
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error), // Automatically convert reqwest errors

    #[error("HTTP error {0} for {1}")]
    Http(reqwest::StatusCode, String),

    #[error("Document not found: {0}")]
    NotFound(String),

    #[error("No disclosure year given")]
    MissingYear,

    #[error("Archive extraction failed: {0}")]
    Archive(String),

    #[error("Failed to parse disclosure index: {0}")]
    IndexParse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<zip::result::ZipError> for DisclosureError {
    fn from(err: zip::result::ZipError) -> Self {
        DisclosureError::Archive(err.to_string())
    }
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("PDF text extraction failed: {0}")]
    Pdf(String),
}

impl From<lopdf::Error> for ExtractError {
    fn from(err: lopdf::Error) -> Self {
        ExtractError::Pdf(err.to_string())
    }
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Disclosure interaction failed: {0}")]
    Disclosure(#[from] DisclosureError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}
