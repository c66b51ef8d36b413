//! Match resolution: turning a curated title into provider metadata.
//!
//! Overrides are consulted first. A correction searches only the corrected
//! title; a collection split looks up each sub-title once. Everything else
//! walks the normalizer's candidate keys until one hits. Lookup failures
//! never escape this module: they are logged, counted, and treated as a miss
//! for the candidate that failed.

use std::cell::Cell;

use cabinflix_catalog::{ExternalMatch, OverrideEntry, OverrideTable, normalize};
use cabinflix_tmdb::{LookupError, MetadataLookup, lookup_first};

/// Outcome of resolving one curated title.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedTitle {
    /// The title names one movie.
    Single {
        /// Title to store if enrichment is found: the corrected title for a
        /// correction, otherwise the raw title.
        title: String,
        /// Whether an override correction applied.
        corrected: bool,
        matched: Option<ExternalMatch>,
    },
    /// The title names several movies, one part per sub-title in order.
    Split { parts: Vec<SplitPart> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SplitPart {
    pub title: String,
    pub matched: Option<ExternalMatch>,
}

/// Resolves curated titles against a metadata lookup.
///
/// Without a lookup (offline mode) every search misses, but overrides still
/// shape the result so prior enrichment can be applied under the right title.
pub struct MatchResolver<'a> {
    lookup: Option<&'a dyn MetadataLookup>,
    overrides: &'a OverrideTable,
    searches: Cell<usize>,
    failures: Cell<usize>,
}

impl<'a> MatchResolver<'a> {
    pub fn new(lookup: &'a dyn MetadataLookup, overrides: &'a OverrideTable) -> Self {
        Self {
            lookup: Some(lookup),
            overrides,
            searches: Cell::new(0),
            failures: Cell::new(0),
        }
    }

    /// A resolver that never calls out; only overrides are applied.
    pub fn offline(overrides: &'a OverrideTable) -> Self {
        Self {
            lookup: None,
            overrides,
            searches: Cell::new(0),
            failures: Cell::new(0),
        }
    }

    pub fn is_offline(&self) -> bool {
        self.lookup.is_none()
    }

    pub fn overrides(&self) -> &OverrideTable {
        self.overrides
    }

    /// Number of search keys tried so far.
    pub fn searches(&self) -> usize {
        self.searches.get()
    }

    /// Number of lookups that failed with an error so far.
    pub fn failures(&self) -> usize {
        self.failures.get()
    }

    /// Best single match for `raw`, or `None`.
    ///
    /// A collection split has no single match and always yields `None`; use
    /// [`resolve_title`](Self::resolve_title) to get its parts.
    pub fn resolve(&self, raw: &str) -> Option<ExternalMatch> {
        match self.resolve_title(raw) {
            ResolvedTitle::Single { matched, .. } => matched,
            ResolvedTitle::Split { .. } => None,
        }
    }

    /// Resolve `raw`, honoring overrides.
    pub fn resolve_title(&self, raw: &str) -> ResolvedTitle {
        match self.overrides.lookup(raw) {
            Some(OverrideEntry::Correction { title, .. }) => {
                log::debug!("Override: '{}' -> '{}'", raw, title);
                ResolvedTitle::Single {
                    title: title.clone(),
                    corrected: true,
                    matched: self.try_key(title),
                }
            }
            Some(OverrideEntry::CollectionSplit { titles, .. }) => {
                log::debug!("Override: '{}' splits into {} titles", raw, titles.len());
                let parts = titles
                    .iter()
                    .map(|t| SplitPart {
                        title: t.clone(),
                        matched: self.try_key(t),
                    })
                    .collect();
                ResolvedTitle::Split { parts }
            }
            None => ResolvedTitle::Single {
                title: raw.to_string(),
                corrected: false,
                matched: normalize(raw).find_map(|key| self.try_key(&key)),
            },
        }
    }

    /// Search one key and fetch details of the top hit. Errors are a miss.
    fn try_key(&self, key: &str) -> Option<ExternalMatch> {
        let lookup = self.lookup?;
        self.searches.set(self.searches.get() + 1);
        match lookup_first(lookup, key) {
            Ok(Some(m)) => {
                log::debug!("'{}' matched TMDB {} ({})", key, m.external_id, m.canonical_title);
                Some(m)
            }
            Ok(None) => None,
            Err(e) => {
                self.failures.set(self.failures.get() + 1);
                log_failure(key, &e);
                None
            }
        }
    }
}

fn log_failure(key: &str, e: &LookupError) {
    match e {
        LookupError::NotFound(_) => log::debug!("Lookup for '{}' found nothing: {}", key, e),
        _ => log::warn!("Lookup for '{}' failed: {}", key, e),
    }
}
