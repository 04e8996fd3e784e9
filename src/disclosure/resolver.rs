// src/disclosure/resolver.rs
use crate::disclosure::models::{report_url, DisclosureIndexEntry, DocumentCandidate};

/// Picks the index entries to download and builds their report URLs.
///
/// With a filter, only entries whose last name equals it ignoring case are kept
/// ("Smith" matches "SMITH" but not "Smithson"). Index order is preserved.
pub fn resolve_documents(
    entries: &[DisclosureIndexEntry],
    last_name_filter: Option<&str>,
    year: u32,
) -> Vec<DocumentCandidate> {
    let filter = last_name_filter.map(str::to_lowercase);

    entries
        .iter()
        .filter(|entry| match &filter {
            Some(wanted) => entry.last_name.to_lowercase() == *wanted,
            None => true,
        })
        .map(|entry| DocumentCandidate {
            last_name: entry.last_name.clone(),
            document_id: entry.document_id.clone(),
            url: report_url(year, &entry.document_id),
        })
        .collect()
}
