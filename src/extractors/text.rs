// src/extractors/text.rs
use crate::utils::error::ExtractError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

// Anything that is not printable ASCII or a newline.
static NON_PRINTABLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^\x20-\x7E\n]").expect("Failed to compile NON_PRINTABLE_RE")
});

static SPACE_RUN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[ \t]+").expect("Failed to compile SPACE_RUN_RE")
});

static NEWLINE_RUN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\n+").expect("Failed to compile NEWLINE_RUN_RE")
});

/// Extracts the text of every page of a PDF, in page order, joined with no separator.
pub fn extract_pdf_text(path: &Path) -> Result<String, ExtractError> {
    let document = lopdf::Document::load(path)?;
    let pages = document.get_pages();
    tracing::debug!("{} has {} pages", path.display(), pages.len());

    let mut text = String::new();
    // get_pages is a BTreeMap keyed by page number, so iteration is in page order.
    for page_number in pages.keys() {
        text.push_str(&document.extract_text(&[*page_number])?);
    }

    Ok(text)
}

/// Strips everything but printable ASCII and newlines, then collapses runs of
/// spaces to one space and runs of newlines to one newline.
pub fn normalize_text(text: &str) -> String {
    let printable = NON_PRINTABLE_RE.replace_all(text, "");
    let spaced = SPACE_RUN_RE.replace_all(&printable, " ");
    NEWLINE_RUN_RE.replace_all(&spaced, "\n").into_owned()
}
