//! Producing a new enrichment generation from live lookups.

use cabinflix_catalog::{GenerationEntry, RawTitle};

use crate::progress::ReconcileProgress;
use crate::resolve::{MatchResolver, ResolvedTitle};

/// Statistics from an enrichment pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EnrichStats {
    /// Curated titles processed.
    pub processed: usize,
    /// Entries written with a `tmdb_id`.
    pub enriched: usize,
    /// Entries written without one.
    pub not_found: usize,
    /// Lookup calls that failed with an error.
    pub lookup_errors: usize,
}

/// Resolve every title and return the generation entries in title order.
///
/// A collection split yields one entry per sub-title. With `limit`, only the
/// first `limit` curated titles are processed.
pub fn enrich_titles(
    titles: &[RawTitle],
    resolver: &MatchResolver<'_>,
    limit: Option<usize>,
    progress: &dyn ReconcileProgress,
) -> (Vec<GenerationEntry>, EnrichStats) {
    let mut ordered: Vec<&RawTitle> = titles.iter().collect();
    ordered.sort_by_key(|t| t.position);
    if let Some(limit) = limit {
        ordered.truncate(limit);
    }

    let failures_before = resolver.failures();
    let total = ordered.len();
    let mut stats = EnrichStats::default();
    let mut entries = Vec::with_capacity(total);
    progress.on_phase(&format!("Enriching {} titles", total));

    for (i, raw) in ordered.into_iter().enumerate() {
        progress.on_title(i + 1, total, &raw.text);
        stats.processed += 1;
        let origin = Some(raw.origin.clone());
        match resolver.resolve_title(&raw.text) {
            ResolvedTitle::Single { matched, .. } => {
                entries.push(entry_for(&raw.text, origin, matched.as_ref(), &mut stats));
            }
            ResolvedTitle::Split { parts } => {
                for part in parts {
                    entries.push(entry_for(
                        &part.title,
                        origin.clone(),
                        part.matched.as_ref(),
                        &mut stats,
                    ));
                }
            }
        }
    }

    stats.lookup_errors = resolver.failures() - failures_before;
    progress.on_complete(&format!(
        "Enriched {} of {} entries ({} not found)",
        stats.enriched,
        entries.len(),
        stats.not_found
    ));
    (entries, stats)
}

fn entry_for(
    source_title: &str,
    origin: Option<String>,
    matched: Option<&cabinflix_catalog::ExternalMatch>,
    stats: &mut EnrichStats,
) -> GenerationEntry {
    match matched {
        Some(m) => {
            stats.enriched += 1;
            GenerationEntry::from_match(source_title, origin, m)
        }
        None => {
            log::debug!("No match for '{}'", source_title);
            stats.not_found += 1;
            GenerationEntry::unmatched(source_title, origin)
        }
    }
}
