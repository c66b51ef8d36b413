//! Reconciling the curated title list, enrichment results, and the stored
//! catalog into one canonical set of movie records.
//!
//! This crate owns the decision logic: match resolution, record merging,
//! duplicate resolution, and the idempotent sync into the store.

pub mod dedupe;
pub mod enrich;
pub mod merge;
pub mod progress;
pub mod reconcile;
pub mod report;
pub mod resolve;
pub mod sync;

pub use dedupe::{
    Ambiguity, DedupeError, DedupePlan, Removal, RemovalReason, dedupe_records, dedupe_store,
    plan_dedupe,
};
pub use enrich::{EnrichStats, enrich_titles};
pub use merge::{EnrichmentHistory, MatchSource, merge, merge_corrected, merge_split_part};
pub use progress::{LogProgress, ReconcileProgress, SilentProgress};
pub use reconcile::{
    ReconcileError, ReconcileOptions, ReconcileReport, ReconciledSet, build_records,
    reconcile_catalog,
};
pub use report::{MissingReport, missing_report};
pub use resolve::{MatchResolver, ResolvedTitle, SplitPart};
pub use sync::{SyncError, SyncStats, apply_records, replace_all};
