//! Read queries for the catalog database.

use std::collections::{BTreeSet, HashMap};

use cabinflix_catalog::types::{CatalogRecord, SyncLog};
use rusqlite::{Connection, OptionalExtension, params};

use crate::operations::OperationError;

/// Column list matching [`row_to_record`].
pub(crate) const MOVIE_COLUMNS: &str = "id, title, source_title, origin, original_title, tmdb_id,
    release_date, runtime, overview, poster_path, backdrop_path,
    vote_average, vote_count, popularity, trailer_url, rating";

// ── Movie Queries ───────────────────────────────────────────────────────────

/// Fetch one movie by internal id.
pub fn get_movie(conn: &Connection, id: i64) -> Result<Option<CatalogRecord>, OperationError> {
    let record = conn
        .query_row(
            &format!("SELECT {MOVIE_COLUMNS} FROM movies WHERE id = ?1"),
            params![id],
            row_to_record,
        )
        .optional()?;
    match record {
        Some(mut r) => {
            r.genres = load_genres(conn, id)?;
            Ok(Some(r))
        }
        None => Ok(None),
    }
}

/// Every movie with its genres, in insertion order (ascending id).
pub fn list_movies(conn: &Connection) -> Result<Vec<CatalogRecord>, OperationError> {
    let mut stmt = conn.prepare(&format!("SELECT {MOVIE_COLUMNS} FROM movies ORDER BY id"))?;
    let rows = stmt.query_map([], row_to_record)?;
    let mut records = rows.collect::<Result<Vec<_>, _>>()?;

    let mut genres = all_genre_links(conn)?;
    for record in &mut records {
        if let Some(set) = record.id.and_then(|id| genres.remove(&id)) {
            record.genres = set;
        }
    }
    Ok(records)
}

/// Number of stored movies.
pub fn count_movies(conn: &Connection) -> Result<i64, OperationError> {
    let n = conn.query_row("SELECT COUNT(*) FROM movies", [], |r| r.get(0))?;
    Ok(n)
}

/// Titles of every movie without a TMDB id, sorted case-insensitively.
pub fn remaining_unmatched(conn: &Connection) -> Result<Vec<String>, OperationError> {
    let mut stmt = conn.prepare(
        "SELECT title FROM movies WHERE tmdb_id IS NULL ORDER BY title COLLATE NOCASE, id",
    )?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

// ── Genre Queries ───────────────────────────────────────────────────────────

/// Genre names linked to one movie.
pub fn load_genres(conn: &Connection, movie_id: i64) -> Result<BTreeSet<String>, OperationError> {
    let mut stmt = conn.prepare(
        "SELECT g.name FROM movie_genres mg
         JOIN genres g ON g.id = mg.genre_id
         WHERE mg.movie_id = ?1",
    )?;
    let rows = stmt.query_map(params![movie_id], |row| row.get::<_, String>(0))?;
    rows.collect::<Result<BTreeSet<_>, _>>().map_err(Into::into)
}

/// Every genre with the number of movies linked to it, most used first.
pub fn genre_counts(conn: &Connection) -> Result<Vec<(String, i64)>, OperationError> {
    let mut stmt = conn.prepare(
        "SELECT g.name, COUNT(mg.movie_id) AS n
         FROM genres g LEFT JOIN movie_genres mg ON mg.genre_id = g.id
         GROUP BY g.id
         ORDER BY n DESC, g.name",
    )?;
    let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

fn all_genre_links(conn: &Connection) -> Result<HashMap<i64, BTreeSet<String>>, OperationError> {
    let mut stmt = conn.prepare(
        "SELECT mg.movie_id, g.name FROM movie_genres mg
         JOIN genres g ON g.id = mg.genre_id",
    )?;
    let mut rows = stmt.query([])?;
    let mut map: HashMap<i64, BTreeSet<String>> = HashMap::new();
    while let Some(row) = rows.next()? {
        map.entry(row.get(0)?).or_default().insert(row.get(1)?);
    }
    Ok(map)
}

// ── Catalog Stats ───────────────────────────────────────────────────────────

/// Get summary statistics for the catalog.
pub fn catalog_stats(conn: &Connection) -> Result<CatalogStats, OperationError> {
    let movies: i64 = conn.query_row("SELECT COUNT(*) FROM movies", [], |r| r.get(0))?;
    let enriched: i64 = conn.query_row(
        "SELECT COUNT(*) FROM movies WHERE tmdb_id IS NOT NULL",
        [],
        |r| r.get(0),
    )?;
    let genres: i64 = conn.query_row("SELECT COUNT(*) FROM genres", [], |r| r.get(0))?;
    let genre_links: i64 = conn.query_row("SELECT COUNT(*) FROM movie_genres", [], |r| r.get(0))?;
    let syncs: i64 = conn.query_row("SELECT COUNT(*) FROM sync_log", [], |r| r.get(0))?;

    Ok(CatalogStats {
        movies,
        enriched,
        unenriched: movies - enriched,
        genres,
        genre_links,
        syncs,
    })
}

/// Summary statistics for the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogStats {
    pub movies: i64,
    pub enriched: i64,
    pub unenriched: i64,
    pub genres: i64,
    pub genre_links: i64,
    pub syncs: i64,
}

impl CatalogStats {
    /// Percentage of movies carrying TMDB metadata.
    pub fn enrichment_rate(&self) -> f64 {
        if self.movies == 0 {
            0.0
        } else {
            self.enriched as f64 * 100.0 / self.movies as f64
        }
    }
}

// ── Sync Log Queries ────────────────────────────────────────────────────────

/// List recent sync runs, newest first.
pub fn list_sync_logs(
    conn: &Connection,
    limit: Option<u32>,
) -> Result<Vec<SyncLog>, OperationError> {
    let limit = limit.unwrap_or(20);
    let mut stmt = conn.prepare(&format!(
        "SELECT id, mode, synced_at, records_inserted, records_updated,
                records_unchanged, records_skipped, records_removed
         FROM sync_log ORDER BY id DESC LIMIT {limit}"
    ))?;
    let rows = stmt.query_map([], |row| {
        Ok(SyncLog {
            id: row.get(0)?,
            mode: row.get(1)?,
            synced_at: row.get(2)?,
            records_inserted: row.get(3)?,
            records_updated: row.get(4)?,
            records_unchanged: row.get(5)?,
            records_skipped: row.get(6)?,
            records_removed: row.get(7)?,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

// ── Row Mapping Helpers ─────────────────────────────────────────────────────

/// Map a row selected with [`MOVIE_COLUMNS`]. Genres are left empty.
pub(crate) fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<CatalogRecord> {
    Ok(CatalogRecord {
        id: row.get(0)?,
        title: row.get(1)?,
        source_title: row.get(2)?,
        origin: row.get(3)?,
        original_title: row.get(4)?,
        external_id: row.get(5)?,
        release_date: row.get(6)?,
        runtime: row.get(7)?,
        overview: row.get(8)?,
        poster_path: row.get(9)?,
        backdrop_path: row.get(10)?,
        vote_average: row.get(11)?,
        vote_count: row.get(12)?,
        popularity: row.get(13)?,
        trailer_url: row.get(14)?,
        content_rating: row.get(15)?,
        genres: BTreeSet::new(),
    })
}
