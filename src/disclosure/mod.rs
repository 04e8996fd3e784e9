// src/disclosure/mod.rs
pub mod client;
pub mod index;
pub mod models;
pub mod resolver;

pub use client::{DisclosureClient, DocumentFetcher};
pub use models::{DocumentCandidate, FetchedDocument};
