// src/disclosure/models.rs
use serde::Serialize;

const DISCLOSURE_BASE_URL: &str = "https://disclosures-clerk.house.gov/public_disc";

/// One `<Member>` row of the yearly disclosure index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisclosureIndexEntry {
    pub last_name: String,
    pub document_id: String,
}

/// A report selected for download by the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentCandidate {
    pub last_name: String,
    pub document_id: String,
    pub url: String,
}

impl DocumentCandidate {
    /// Local file name the report is stored under: `{last_name}_{document_id}.pdf`
    pub fn file_name(&self) -> String {
        format!("{}_{}.pdf", self.last_name, self.document_id)
    }
}

/// A report that has been downloaded (or found) on local disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchedDocument {
    pub member_last_name: String,
    pub document_id: String,
    pub local_path: String,
}

impl FetchedDocument {
    /// File name component of `local_path`, used as the `source_file` column.
    pub fn file_name(&self) -> String {
        std::path::Path::new(&self.local_path)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.local_path.clone())
    }
}

/// URL of the zipped member index for a filing year.
pub fn index_archive_url(year: u32) -> String {
    format!("{}/financial-pdfs/{}FD.zip", DISCLOSURE_BASE_URL, year)
}

/// URL of a periodic transaction report.
pub fn report_url(year: u32, document_id: &str) -> String {
    format!("{}/ptr-pdfs/{}/{}.pdf", DISCLOSURE_BASE_URL, year, document_id)
}
