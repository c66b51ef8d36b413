//! Data model types for the movie catalog.
//!
//! These types represent the three shapes a movie passes through: the raw
//! title extracted from the curated list, the provider record returned by a
//! metadata lookup, and the canonical record persisted to the store.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

// ── Raw Title ───────────────────────────────────────────────────────────────

/// A single title as extracted from the curated source list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTitle {
    /// Free-form title text, trimmed.
    pub text: String,
    /// Which section of the source document the title came from.
    pub origin: String,
    /// Zero-based extraction order. This is the stable order used whenever
    /// two records compete to be canonical.
    pub position: usize,
}

impl RawTitle {
    pub fn new(text: impl Into<String>, origin: impl Into<String>, position: usize) -> Self {
        Self {
            text: text.into(),
            origin: origin.into(),
            position,
        }
    }
}

// ── External Match ──────────────────────────────────────────────────────────

/// Provider metadata for one real-world movie.
///
/// Produced by the lookup collaborator; the engine never mutates it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExternalMatch {
    /// Stable provider identifier (TMDB movie id).
    pub external_id: i64,
    /// Title as the provider spells it.
    pub canonical_title: String,
    /// Native-language title.
    pub original_title: Option<String>,
    pub release_date: Option<String>,
    /// Runtime in minutes.
    pub runtime: Option<i64>,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<i64>,
    pub popularity: Option<f64>,
    /// US theatrical certification (e.g. "PG-13").
    pub content_rating: Option<String>,
    pub trailer_url: Option<String>,
    pub genres: Vec<String>,
    /// Top-billed cast names. Informational only; not persisted.
    #[serde(default)]
    pub cast: Vec<String>,
}

// ── Catalog Record ──────────────────────────────────────────────────────────

/// The unit persisted to the catalog store.
///
/// Every enrichment field is `None` for an unenriched record. A record with a
/// non-null `external_id` is enriched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CatalogRecord {
    /// Internal identifier assigned by the store. `None` until persisted.
    pub id: Option<i64>,
    /// Title shown in the catalog.
    pub title: String,
    /// The curated-list text this record was produced from.
    pub source_title: Option<String>,
    /// Source section of the curated-list entry.
    pub origin: Option<String>,
    pub original_title: Option<String>,
    pub external_id: Option<i64>,
    pub release_date: Option<String>,
    pub runtime: Option<i64>,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<i64>,
    pub popularity: Option<f64>,
    pub content_rating: Option<String>,
    pub trailer_url: Option<String>,
    /// Genre names. Order is irrelevant.
    pub genres: BTreeSet<String>,
}

impl CatalogRecord {
    /// A bare record with only its title (and provenance) populated.
    pub fn unenriched(title: impl Into<String>, source: &RawTitle) -> Self {
        Self {
            title: title.into(),
            source_title: Some(source.text.clone()),
            origin: Some(source.origin.clone()),
            ..Self::default()
        }
    }

    /// Whether this record carries provider metadata.
    pub fn is_enriched(&self) -> bool {
        self.external_id.is_some()
    }

    /// Replace every enrichment field with the values from `m`.
    ///
    /// This is a wholesale replacement: fields that are `None` in `m` become
    /// `None` here, even if they previously held a value.
    pub fn apply_match(&mut self, m: &ExternalMatch) {
        self.external_id = Some(m.external_id);
        self.original_title = m.original_title.clone();
        self.release_date = m.release_date.clone();
        self.runtime = m.runtime;
        self.overview = m.overview.clone();
        self.poster_path = m.poster_path.clone();
        self.backdrop_path = m.backdrop_path.clone();
        self.vote_average = m.vote_average;
        self.vote_count = m.vote_count;
        self.popularity = m.popularity;
        self.content_rating = m.content_rating.clone();
        self.trailer_url = m.trailer_url.clone();
        self.genres = m.genres.iter().cloned().collect();
    }

    /// Compare everything except the store-assigned identifier.
    pub fn same_content(&self, other: &CatalogRecord) -> bool {
        let mut a = self.clone();
        a.id = other.id;
        a == *other
    }
}

// ── Sync Log ────────────────────────────────────────────────────────────────

/// A record of one Catalog Sync run.
#[derive(Debug, Clone)]
pub struct SyncLog {
    pub id: i64,
    /// "upsert" or "replace".
    pub mode: String,
    pub synced_at: String,
    pub records_inserted: i64,
    pub records_updated: i64,
    pub records_unchanged: i64,
    pub records_skipped: i64,
    pub records_removed: i64,
}
