//! The full reconciliation pipeline.
//!
//! Curated titles are resolved and merged in extraction order, collapsed by
//! the Duplicate Resolver in memory, then written to the store in one
//! transaction together with retirement of split collection rows and a
//! store-level duplicate pass. If the store still disagrees with the
//! reconciled set afterwards, it is cleared and repopulated.

use cabinflix_catalog::{CatalogRecord, RawTitle, SyncLog};
use cabinflix_db::{operations, queries};
use rusqlite::Connection;
use thiserror::Error;

use crate::dedupe::{self, Ambiguity, DedupeError, DedupePlan};
use crate::merge::{self, EnrichmentHistory, MatchSource};
use crate::progress::ReconcileProgress;
use crate::resolve::{MatchResolver, ResolvedTitle};
use crate::sync::{self, SyncError, SyncStats};

#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("Database error: {0}")]
    Db(#[from] operations::OperationError),
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Sync failed: {0}")]
    Sync(#[from] SyncError),
    #[error("Duplicate resolution failed: {0}")]
    Dedupe(#[from] DedupeError),
}

/// Options controlling the reconciliation pass.
#[derive(Debug, Default, Clone)]
pub struct ReconcileOptions {
    /// Run every step inside a transaction that is rolled back.
    pub dry_run: bool,
}

/// Records produced from the curated list, before any store access.
#[derive(Debug, Default)]
pub struct ReconciledSet {
    /// Records in extraction order, duplicates already collapsed.
    pub records: Vec<CatalogRecord>,
    /// Raw collection titles replaced by their split parts.
    pub retired: Vec<String>,
    pub live_matches: usize,
    pub prior_matches: usize,
    pub unmatched: usize,
    pub corrections: usize,
    pub splits: usize,
    /// What the in-memory duplicate pass removed and refused.
    pub dedupe: DedupePlan,
}

/// Result of a reconciliation run.
#[derive(Debug, Default)]
pub struct ReconcileReport {
    pub titles: usize,
    /// Records after in-memory duplicate resolution.
    pub records: usize,
    pub live_matches: usize,
    pub prior_matches: usize,
    pub unmatched: usize,
    pub corrections: usize,
    pub splits: usize,
    /// Collection rows deleted from the store.
    pub retired: usize,
    pub memory_dedupe: DedupePlan,
    pub store_dedupe: DedupePlan,
    pub sync: SyncStats,
    /// Counts from the full replace, when drift forced one.
    pub full_replace: Option<SyncStats>,
    /// Alias pairs left untouched, from either duplicate pass.
    pub ambiguities: Vec<Ambiguity>,
    /// Titles of stored rows still without enrichment, after the run.
    pub remaining_unmatched: Vec<String>,
    pub searches: usize,
    pub lookup_failures: usize,
    pub dry_run: bool,
}

/// Resolve and merge every curated title, then run the in-memory duplicate
/// pass. Touches no store.
pub fn build_records(
    titles: &[RawTitle],
    resolver: &MatchResolver<'_>,
    history: &EnrichmentHistory,
    progress: &dyn ReconcileProgress,
) -> ReconciledSet {
    let mut ordered: Vec<&RawTitle> = titles.iter().collect();
    ordered.sort_by_key(|t| t.position);

    let mut set = ReconciledSet::default();
    let mut records = Vec::with_capacity(ordered.len());
    let total = ordered.len();
    progress.on_phase(&format!("Resolving {} titles", total));

    for (i, raw) in ordered.into_iter().enumerate() {
        progress.on_title(i + 1, total, &raw.text);
        match resolver.resolve_title(&raw.text) {
            ResolvedTitle::Single {
                title,
                corrected,
                matched,
            } => {
                let (record, source) = if corrected {
                    set.corrections += 1;
                    merge::merge_corrected(raw, &title, matched.as_ref(), history)
                } else {
                    merge::merge(raw, matched.as_ref(), history)
                };
                set.tally(source);
                records.push(record);
            }
            ResolvedTitle::Split { parts } => {
                set.splits += 1;
                set.retired.push(raw.text.clone());
                for part in parts {
                    let (record, source) =
                        merge::merge_split_part(raw, &part.title, part.matched.as_ref(), history);
                    set.tally(source);
                    records.push(record);
                }
            }
        }
    }

    let (records, plan) = dedupe::dedupe_records(records, resolver.overrides().aliases());
    set.records = records;
    set.dedupe = plan;
    set
}

impl ReconciledSet {
    fn tally(&mut self, source: MatchSource) {
        match source {
            MatchSource::Live => self.live_matches += 1,
            MatchSource::Prior => self.prior_matches += 1,
            MatchSource::None => self.unmatched += 1,
        }
    }
}

/// Run the full pipeline against the store.
pub fn reconcile_catalog(
    conn: &Connection,
    titles: &[RawTitle],
    resolver: &MatchResolver<'_>,
    history: &EnrichmentHistory,
    options: &ReconcileOptions,
    progress: &dyn ReconcileProgress,
) -> Result<ReconcileReport, ReconcileError> {
    let set = build_records(titles, resolver, history, progress);
    let aliases = resolver.overrides().aliases();

    let mut report = ReconcileReport {
        titles: titles.len(),
        records: set.records.len(),
        live_matches: set.live_matches,
        prior_matches: set.prior_matches,
        unmatched: set.unmatched,
        corrections: set.corrections,
        splits: set.splits,
        searches: resolver.searches(),
        lookup_failures: resolver.failures(),
        dry_run: options.dry_run,
        ..ReconcileReport::default()
    };

    progress.on_phase(&format!("Syncing {} records", set.records.len()));
    if options.dry_run {
        in_transaction(conn, false, |conn| {
            apply_phase(conn, &set, aliases, &mut report)?;
            drift_phase(conn, &set.records, &mut report)?;
            report.remaining_unmatched = queries::remaining_unmatched(conn)?;
            Ok(())
        })?;
    } else {
        in_transaction(conn, true, |conn| {
            apply_phase(conn, &set, aliases, &mut report)
        })?;
        in_transaction(conn, true, |conn| {
            drift_phase(conn, &set.records, &mut report)
        })?;
        report.remaining_unmatched = queries::remaining_unmatched(conn)?;
    }

    report.ambiguities = set.dedupe.ambiguities.clone();
    for ambiguity in &report.store_dedupe.ambiguities {
        if !report.ambiguities.contains(ambiguity) {
            report.ambiguities.push(ambiguity.clone());
        }
    }
    report.memory_dedupe = set.dedupe;

    progress.on_complete(&format!(
        "Reconciled {} titles into {} records",
        report.titles, report.records
    ));
    Ok(report)
}

/// Retire split collections, upsert, dedupe the store, and log the sync.
fn apply_phase(
    conn: &Connection,
    set: &ReconciledSet,
    aliases: &[cabinflix_catalog::AliasPair],
    report: &mut ReconcileReport,
) -> Result<(), ReconcileError> {
    for raw in &set.retired {
        let n = operations::delete_movies_by_title(conn, raw)?;
        if n > 0 {
            log::info!("Retired collection entry '{}' ({} row(s))", raw, n);
        }
        report.retired += n;
    }

    report.sync = sync::apply_records(conn, &set.records)?;
    report.store_dedupe = dedupe::dedupe_store(conn, aliases, false)?;

    operations::insert_sync_log(conn, &sync_log("upsert", &report.sync))?;
    Ok(())
}

/// Compare the stored row count with the reconciled set and fully replace
/// the catalog if they differ.
fn drift_phase(
    conn: &Connection,
    records: &[CatalogRecord],
    report: &mut ReconcileReport,
) -> Result<(), ReconcileError> {
    let stored = queries::count_movies(conn)?;
    if stored == records.len() as i64 {
        return Ok(());
    }

    log::warn!(
        "Catalog holds {} rows but {} records were reconciled; replacing the catalog",
        stored,
        records.len()
    );
    let stats = sync::replace_all(conn, records)?;
    operations::insert_sync_log(conn, &sync_log("replace", &stats))?;
    report.full_replace = Some(stats);
    Ok(())
}

fn in_transaction<T>(
    conn: &Connection,
    commit: bool,
    f: impl FnOnce(&Connection) -> Result<T, ReconcileError>,
) -> Result<T, ReconcileError> {
    conn.execute_batch("BEGIN IMMEDIATE")?;
    match f(conn) {
        Ok(value) => {
            conn.execute_batch(if commit { "COMMIT" } else { "ROLLBACK" })?;
            Ok(value)
        }
        Err(e) => {
            let _ = conn.execute_batch("ROLLBACK");
            Err(e)
        }
    }
}

fn sync_log(mode: &str, stats: &SyncStats) -> SyncLog {
    SyncLog {
        id: 0,
        mode: mode.to_string(),
        synced_at: chrono::Utc::now().to_rfc3339(),
        records_inserted: stats.inserted as i64,
        records_updated: stats.updated as i64,
        records_unchanged: stats.unchanged as i64,
        records_skipped: stats.skipped as i64,
        records_removed: stats.removed as i64,
    }
}
