// src/disclosure/index.rs
use crate::disclosure::client::DocumentFetcher;
use crate::disclosure::models::{index_archive_url, DisclosureIndexEntry};
use crate::utils::error::DisclosureError;
use std::fs;
use std::path::{Path, PathBuf};
use zip::ZipArchive;

/// Downloads the yearly archive into `work_dir/{year}`, unpacks it and parses the
/// member index it contains.
///
/// A missing year or a failed download yields `Ok(None)`: the run carries on with
/// nothing to resolve. A broken archive or unreadable index is an error.
pub async fn fetch_index<F: DocumentFetcher>(
    fetcher: &F,
    year: Option<u32>,
    work_dir: &Path,
) -> Result<Option<Vec<DisclosureIndexEntry>>, DisclosureError> {
    let Some(year) = year else {
        tracing::error!("{}; cannot fetch the disclosure index", DisclosureError::MissingYear);
        return Ok(None);
    };

    let url = index_archive_url(year);
    tracing::info!("Downloading {}...", url);
    let bytes = match fetcher.fetch(&url).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!("Failed to download {}: {}", url, e);
            return Ok(None);
        }
    };

    let year_dir = work_dir.join(year.to_string());
    fs::create_dir_all(&year_dir)?;
    let zip_path = year_dir.join(format!("{}FD.zip", year));
    fs::write(&zip_path, &bytes)?;
    tracing::info!("Downloaded ZIP file: {}", zip_path.display());

    let extracted = unzip_archive(&zip_path, &year_dir)?;
    let xml_path = extracted
        .iter()
        .find(|p| p.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("xml")))
        .ok_or_else(|| DisclosureError::Archive(format!("no XML index in {}", zip_path.display())))?;
    tracing::info!("Extracted XML file: {}", xml_path.display());

    let xml = fs::read_to_string(xml_path)?;
    let entries = parse_index(&xml)?;
    tracing::info!("Disclosure index for {} lists {} documents", year, entries.len());

    Ok(Some(entries))
}

/// Unpacks every file of `zip_file` into `to_dir`, returning the written paths in
/// archive order. Entries whose names escape `to_dir` are skipped.
pub fn unzip_archive(zip_file: &Path, to_dir: &Path) -> Result<Vec<PathBuf>, DisclosureError> {
    tracing::debug!("unzipping {} to {}", zip_file.display(), to_dir.display());

    let file = fs::File::open(zip_file)?;
    let mut archive = ZipArchive::new(file)?;
    fs::create_dir_all(to_dir)?;

    let mut written = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let Some(relative) = entry.enclosed_name() else {
            tracing::warn!("Skipping archive entry with unsafe path: {}", entry.name());
            continue;
        };
        let outpath = to_dir.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&outpath)?;
            continue;
        }
        if let Some(parent) = outpath.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut outfile = fs::File::create(&outpath)?;
        std::io::copy(&mut entry, &mut outfile)?;
        tracing::trace!("copied {} to {}", entry.name(), outpath.display());
        written.push(outpath);
    }

    Ok(written)
}

/// Parses the index XML into one entry per `<Member>` element, in document order.
pub fn parse_index(xml: &str) -> Result<Vec<DisclosureIndexEntry>, DisclosureError> {
    let xml = xml.trim_start_matches('\u{feff}');
    let doc = roxmltree::Document::parse(xml)
        .map_err(|e| DisclosureError::IndexParse(e.to_string()))?;

    let mut entries = Vec::new();
    for member in doc.descendants().filter(|n| n.has_tag_name("Member")) {
        let last_name = child_text(member, "Last");
        let document_id = child_text(member, "DocID");

        match (last_name, document_id) {
            (Some(last_name), Some(document_id)) => entries.push(DisclosureIndexEntry {
                last_name: last_name.to_string(),
                document_id: document_id.to_string(),
            }),
            (last_name, document_id) => {
                tracing::warn!(
                    "Skipping member without name or document id (Last={:?}, DocID={:?})",
                    last_name, document_id
                );
            }
        }
    }

    Ok(entries)
}

fn child_text<'a>(node: roxmltree::Node<'a, '_>, tag: &str) -> Option<&'a str> {
    node.children()
        .find(|c| c.has_tag_name(tag))
        .and_then(|c| c.text())
        .map(str::trim)
        .filter(|t| !t.is_empty())
}
