//! Combining curated titles with enrichment into catalog records.
//!
//! A live match always wins. Without one, the newest prior enrichment
//! generation that knows the title supplies the fields wholesale. Without
//! either, the record is kept unenriched; titles are never dropped.

use std::collections::HashMap;

use cabinflix_catalog::{CatalogRecord, ExternalMatch, GenerationEntry, RawTitle};

/// Index over prior enrichment generations.
///
/// Generations are added oldest first. A later generation replaces an
/// earlier one's entry for the same `tmdb_id` entirely; fields it leaves
/// empty are not filled from the older entry.
#[derive(Debug, Default)]
pub struct EnrichmentHistory {
    by_id: HashMap<i64, ExternalMatch>,
    /// Lower-cased title -> `tmdb_id`.
    by_title: HashMap<String, i64>,
    generations: usize,
}

impl EnrichmentHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from generations ordered oldest first.
    pub fn from_generations<I>(generations: I) -> Self
    where
        I: IntoIterator<Item = Vec<GenerationEntry>>,
    {
        let mut history = Self::new();
        for generation in generations {
            history.add_generation(&generation);
        }
        history
    }

    /// Add a generation newer than every generation added so far.
    pub fn add_generation(&mut self, entries: &[GenerationEntry]) {
        for entry in entries {
            let Some(m) = entry.to_match() else {
                continue;
            };
            let id = m.external_id;
            self.by_title.insert(entry.title.to_lowercase(), id);
            if let Some(source) = &entry.source_title {
                self.by_title.insert(source.to_lowercase(), id);
            }
            self.by_id.insert(id, m);
        }
        self.generations += 1;
    }

    /// Newest enrichment known for a title (case-insensitive).
    pub fn prior_for(&self, title: &str) -> Option<&ExternalMatch> {
        let id = self.by_title.get(&title.to_lowercase())?;
        self.by_id.get(id)
    }

    /// Newest enrichment for a provider id.
    pub fn by_external_id(&self, id: i64) -> Option<&ExternalMatch> {
        self.by_id.get(&id)
    }

    pub fn generations(&self) -> usize {
        self.generations
    }

    /// Number of distinct movies with enrichment.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// Where a record's enrichment came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchSource {
    Live,
    Prior,
    None,
}

/// Merge a plain curated title. The stored title is the raw title.
pub fn merge(
    raw: &RawTitle,
    live: Option<&ExternalMatch>,
    history: &EnrichmentHistory,
) -> (CatalogRecord, MatchSource) {
    let (enrichment, source) = pick(live, || history.prior_for(&raw.text));
    (build(&raw.text, raw, enrichment), source)
}

/// Merge a corrected title. The corrected title is stored when enrichment is
/// found, live or prior; otherwise the raw title is kept.
pub fn merge_corrected(
    raw: &RawTitle,
    corrected: &str,
    live: Option<&ExternalMatch>,
    history: &EnrichmentHistory,
) -> (CatalogRecord, MatchSource) {
    let (enrichment, source) = pick(live, || {
        history
            .prior_for(corrected)
            .or_else(|| history.prior_for(&raw.text))
    });
    let title = if enrichment.is_some() {
        corrected
    } else {
        raw.text.as_str()
    };
    (build(title, raw, enrichment), source)
}

/// Merge one part of a collection split. The part's title is always stored,
/// enriched or not; provenance points at the collection entry.
pub fn merge_split_part(
    raw: &RawTitle,
    part: &str,
    live: Option<&ExternalMatch>,
    history: &EnrichmentHistory,
) -> (CatalogRecord, MatchSource) {
    let (enrichment, source) = pick(live, || history.prior_for(part));
    (build(part, raw, enrichment), source)
}

fn pick<'a>(
    live: Option<&'a ExternalMatch>,
    prior: impl FnOnce() -> Option<&'a ExternalMatch>,
) -> (Option<&'a ExternalMatch>, MatchSource) {
    if let Some(m) = live {
        return (Some(m), MatchSource::Live);
    }
    match prior() {
        Some(m) => (Some(m), MatchSource::Prior),
        None => (None, MatchSource::None),
    }
}

fn build(title: &str, raw: &RawTitle, enrichment: Option<&ExternalMatch>) -> CatalogRecord {
    let mut record = CatalogRecord::unenriched(title, raw);
    if let Some(m) = enrichment {
        record.apply_match(m);
    }
    record
}
