//! Applying reconciled records to the catalog store.
//!
//! Enriched records are keyed on `tmdb_id`: an existing row is updated in
//! place, an unenriched row for the same curated title is promoted, and only
//! otherwise is a new row inserted. Unenriched records are inserted only if
//! no row with the same title exists and no enriched row came from the same
//! curated entry; a title collision is skipped and the surviving row
//! re-queried. Re-applying the same records, or records carrying less
//! enrichment than the store, never removes stored enrichment.

use cabinflix_catalog::CatalogRecord;
use cabinflix_db::operations;
use rusqlite::Connection;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Database error: {0}")]
    Db(#[from] operations::OperationError),
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Counts from one sync pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SyncStats {
    pub inserted: usize,
    pub updated: usize,
    pub unchanged: usize,
    /// Unenriched records not written because an enriched row already holds
    /// their title, or was produced from the same curated entry.
    pub skipped: usize,
    /// Superseded unenriched rows deleted while promoting or replacing.
    pub removed: usize,
}

impl SyncStats {
    /// Records that ended up backed by a stored row.
    pub fn persisted(&self) -> usize {
        self.inserted + self.updated + self.unchanged + self.skipped
    }

    pub fn changes(&self) -> usize {
        self.inserted + self.updated + self.removed
    }
}

/// Upsert every record, in order. Runs inside the caller's transaction.
pub fn apply_records(
    conn: &Connection,
    records: &[CatalogRecord],
) -> Result<SyncStats, SyncError> {
    let mut stats = SyncStats::default();
    for record in records {
        if record.is_enriched() {
            apply_enriched(conn, record, &mut stats)?;
        } else {
            apply_unenriched(conn, record, &mut stats)?;
        }
    }
    Ok(stats)
}

/// Clear the catalog and repopulate it from `records`.
///
/// `removed` counts the rows that were cleared.
pub fn replace_all(
    conn: &Connection,
    records: &[CatalogRecord],
) -> Result<SyncStats, SyncError> {
    let mut stats = SyncStats {
        removed: operations::clear_movies(conn)?,
        ..SyncStats::default()
    };
    for record in records {
        if record.is_enriched() {
            apply_enriched(conn, record, &mut stats)?;
        } else {
            apply_unenriched(conn, record, &mut stats)?;
        }
    }
    Ok(stats)
}

fn apply_enriched(
    conn: &Connection,
    record: &CatalogRecord,
    stats: &mut SyncStats,
) -> Result<(), SyncError> {
    let Some(tmdb_id) = record.external_id else {
        return apply_unenriched(conn, record, stats);
    };

    if let Some(existing) = operations::find_movie_by_tmdb_id(conn, tmdb_id)? {
        let id = stored_id(&existing)?;
        if existing.same_content(record) {
            stats.unchanged += 1;
        } else {
            operations::update_movie(conn, id, record)?;
            stats.updated += 1;
        }
    } else if let Some(bare) = find_promotable(conn, record)? {
        let id = stored_id(&bare)?;
        log::debug!("Promoting '{}' (id {}) to TMDB {}", bare.title, id, tmdb_id);
        operations::update_movie(conn, id, record)?;
        stats.updated += 1;
    } else {
        operations::insert_movie(conn, record)?;
        stats.inserted += 1;
    }

    // The curated title may still have an unenriched row from an earlier run.
    stats.removed += operations::delete_unenriched_by_title(conn, &record.title)?;
    if let Some(source) = record.source_title.as_deref().filter(|s| *s != record.title) {
        stats.removed += operations::delete_unenriched_by_title(conn, source)?;
    }
    Ok(())
}

/// An unenriched row this record should take over: one under the record's
/// title, else one under its curated source title.
fn find_promotable(
    conn: &Connection,
    record: &CatalogRecord,
) -> Result<Option<CatalogRecord>, SyncError> {
    if let Some(row) = operations::find_unenriched_by_title(conn, &record.title)? {
        return Ok(Some(row));
    }
    match record.source_title.as_deref() {
        Some(source) if source != record.title => {
            Ok(operations::find_unenriched_by_title(conn, source)?)
        }
        _ => Ok(None),
    }
}

fn apply_unenriched(
    conn: &Connection,
    record: &CatalogRecord,
    stats: &mut SyncStats,
) -> Result<(), SyncError> {
    // Never shadow an enriched row with a bare copy of its title.
    let existing = operations::find_movies_by_title(conn, &record.title)?;
    if existing.iter().any(CatalogRecord::is_enriched) {
        log::debug!("Skipping unenriched '{}': enriched row exists", record.title);
        stats.skipped += 1;
        return Ok(());
    }

    // A record still under its curated text may have been enriched by an
    // earlier run under a corrected title. Split parts carry their own title
    // and share the collection's source text, so they are not matched here.
    if let Some(source) = record.source_title.as_deref().filter(|s| *s == record.title)
        && let Some(row) = operations::find_enriched_by_source_title(conn, source)?
    {
        log::debug!(
            "Skipping unenriched '{}': stored as '{}' (TMDB {:?})",
            record.title,
            row.title,
            row.external_id
        );
        stats.skipped += 1;
        return Ok(());
    }

    match operations::insert_movie_if_absent(conn, record)? {
        Some(_) => stats.inserted += 1,
        None => {
            let survivor = operations::find_unenriched_by_title(conn, &record.title)?;
            log::debug!(
                "'{}' already stored (id {:?})",
                record.title,
                survivor.and_then(|r| r.id)
            );
            stats.unchanged += 1;
        }
    }
    Ok(())
}

fn stored_id(record: &CatalogRecord) -> Result<i64, SyncError> {
    record.id.ok_or_else(|| {
        SyncError::Db(operations::OperationError::NotFound {
            entity_type: "movie".to_string(),
            id: record.title.clone(),
        })
    })
}
