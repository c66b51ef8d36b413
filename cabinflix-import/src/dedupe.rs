//! Duplicate resolution over reconciled records.
//!
//! Two passes run in order:
//!
//! - **Pass A** collapses records sharing a `tmdb_id`, and unenriched
//!   records sharing an exact title. The first record in the given order
//!   survives, whatever the other records carry. An unenriched record whose
//!   exact title is held by an enriched record is also removed.
//! - **Pass B** applies the curated alias pairs: when the enriched variant is
//!   present with a `tmdb_id` and the unenriched variant is present without
//!   one, the unenriched variant is removed. A pair where both sides are
//!   present but neither is conclusively the survivor is reported, not
//!   touched.
//!
//! The same plan drives both the in-memory pass (records in extraction
//! order) and the store pass (rows in ascending id order).

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use cabinflix_catalog::{AliasPair, CatalogRecord};
use cabinflix_db::{operations, queries};
use rusqlite::Connection;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DedupeError {
    #[error("Database error: {0}")]
    Db(#[from] operations::OperationError),
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Why a record is being removed.
#[derive(Debug, Clone, PartialEq)]
pub enum RemovalReason {
    /// Another record earlier in order has the same `tmdb_id`.
    SharedExternalId { external_id: i64, kept: String },
    /// Another unenriched record earlier in order has the same title.
    SharedTitle,
    /// An enriched record has the same title.
    Shadowed { external_id: i64 },
    /// Unenriched side of a curated alias pair.
    Alias { enriched: String },
}

/// One record the resolver will remove.
#[derive(Debug, Clone, PartialEq)]
pub struct Removal {
    /// Position in the input slice.
    pub index: usize,
    /// Store id, when the record is persisted.
    pub id: Option<i64>,
    pub title: String,
    pub reason: RemovalReason,
}

/// An alias pair the resolver refused to act on.
#[derive(Debug, Clone, PartialEq)]
pub struct Ambiguity {
    pub unenriched: String,
    pub enriched: String,
    pub reason: String,
}

/// Removals and ambiguities found over one record set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DedupePlan {
    pub removals: Vec<Removal>,
    pub ambiguities: Vec<Ambiguity>,
}

impl DedupePlan {
    pub fn is_empty(&self) -> bool {
        self.removals.is_empty() && self.ambiguities.is_empty()
    }

    pub fn shared_id_removals(&self) -> usize {
        self.removals
            .iter()
            .filter(|r| !matches!(r.reason, RemovalReason::Alias { .. }))
            .count()
    }

    pub fn alias_removals(&self) -> usize {
        self.removals.len() - self.shared_id_removals()
    }
}

#[derive(Hash, PartialEq, Eq)]
enum Key<'a> {
    External(i64),
    UnenrichedTitle(&'a str),
}

/// Work out which records to remove. `records` must be in the stable order
/// that decides survivors.
pub fn plan_dedupe(records: &[CatalogRecord], aliases: &[AliasPair]) -> DedupePlan {
    let mut plan = DedupePlan::default();
    let mut removed = vec![false; records.len()];

    // Pass A
    let mut enriched_titles: HashMap<&str, i64> = HashMap::new();
    for record in records {
        if let Some(id) = record.external_id {
            enriched_titles.entry(record.title.as_str()).or_insert(id);
        }
    }
    let mut first_seen: HashMap<Key<'_>, usize> = HashMap::new();
    for (index, record) in records.iter().enumerate() {
        if record.external_id.is_none() {
            if let Some(&external_id) = enriched_titles.get(record.title.as_str()) {
                log::debug!("Duplicate: unenriched '{}' shadowed by TMDB {}", record.title, external_id);
                removed[index] = true;
                plan.removals.push(Removal {
                    index,
                    id: record.id,
                    title: record.title.clone(),
                    reason: RemovalReason::Shadowed { external_id },
                });
                continue;
            }
        }
        let key = match record.external_id {
            Some(id) => Key::External(id),
            None => Key::UnenrichedTitle(record.title.as_str()),
        };
        match first_seen.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(index);
            }
            Entry::Occupied(slot) => {
                let kept = &records[*slot.get()];
                let reason = match record.external_id {
                    Some(external_id) => RemovalReason::SharedExternalId {
                        external_id,
                        kept: kept.title.clone(),
                    },
                    None => RemovalReason::SharedTitle,
                };
                log::debug!(
                    "Duplicate: '{}' collapses into '{}'",
                    record.title,
                    kept.title
                );
                removed[index] = true;
                plan.removals.push(Removal {
                    index,
                    id: record.id,
                    title: record.title.clone(),
                    reason,
                });
            }
        }
    }

    // Pass B
    for pair in aliases {
        let survivors = || {
            records
                .iter()
                .enumerate()
                .filter(|(i, _)| !removed[*i])
        };
        let enriched_side: Vec<&CatalogRecord> = survivors()
            .filter(|(_, r)| r.title == pair.enriched)
            .map(|(_, r)| r)
            .collect();
        let unenriched_side: Vec<(usize, &CatalogRecord)> = survivors()
            .filter(|(_, r)| r.title == pair.unenriched)
            .collect();

        if enriched_side.is_empty() || unenriched_side.is_empty() {
            continue;
        }

        let enriched_present = enriched_side.iter().any(|r| r.is_enriched());
        let doomed: Vec<(usize, &CatalogRecord)> = unenriched_side
            .iter()
            .copied()
            .filter(|(_, r)| !r.is_enriched())
            .collect();

        if enriched_present && !doomed.is_empty() {
            for (index, record) in doomed {
                log::debug!(
                    "Alias: removing unenriched '{}' in favor of '{}'",
                    record.title,
                    pair.enriched
                );
                removed[index] = true;
                plan.removals.push(Removal {
                    index,
                    id: record.id,
                    title: record.title.clone(),
                    reason: RemovalReason::Alias {
                        enriched: pair.enriched.clone(),
                    },
                });
            }
        } else {
            let reason = if !enriched_present && doomed.len() == unenriched_side.len() {
                "neither side is enriched"
            } else if !enriched_present {
                "only the unenriched variant carries enrichment"
            } else {
                "both sides are enriched"
            };
            plan.ambiguities.push(Ambiguity {
                unenriched: pair.unenriched.clone(),
                enriched: pair.enriched.clone(),
                reason: reason.to_string(),
            });
        }
    }

    plan.removals.sort_by_key(|r| r.index);
    plan
}

/// Apply the resolver to an in-memory record list, keeping survivors in
/// their original order.
pub fn dedupe_records(
    records: Vec<CatalogRecord>,
    aliases: &[AliasPair],
) -> (Vec<CatalogRecord>, DedupePlan) {
    let plan = plan_dedupe(&records, aliases);
    let mut doomed = vec![false; records.len()];
    for removal in &plan.removals {
        doomed[removal.index] = true;
    }
    let survivors = records
        .into_iter()
        .zip(doomed)
        .filter_map(|(r, gone)| (!gone).then_some(r))
        .collect();
    (survivors, plan)
}

/// Apply the resolver to the stored catalog. Rows are considered in
/// ascending id order, so the oldest row survives a collision.
///
/// Runs inside the caller's transaction, if any. With `dry_run`, nothing is
/// deleted.
pub fn dedupe_store(
    conn: &Connection,
    aliases: &[AliasPair],
    dry_run: bool,
) -> Result<DedupePlan, DedupeError> {
    let rows = queries::list_movies(conn)?;
    let plan = plan_dedupe(&rows, aliases);
    if !dry_run {
        for removal in &plan.removals {
            if let Some(id) = removal.id {
                operations::delete_movie(conn, id)?;
            }
        }
    }
    Ok(plan)
}
