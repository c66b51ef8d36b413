//! Write operations for movies, genres, and sync history.

use std::collections::BTreeSet;

use cabinflix_catalog::types::{CatalogRecord, SyncLog};
use rusqlite::{Connection, OptionalExtension, params};
use thiserror::Error;

use crate::queries::{MOVIE_COLUMNS, load_genres, row_to_record};

#[derive(Debug, Error)]
pub enum OperationError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Entity not found: {entity_type} with id '{id}'")]
    NotFound { entity_type: String, id: String },
}

/// The TMDB movie genre list, seeded into a fresh catalog.
pub const DEFAULT_GENRES: &[&str] = &[
    "Action",
    "Adventure",
    "Animation",
    "Comedy",
    "Crime",
    "Documentary",
    "Drama",
    "Family",
    "Fantasy",
    "History",
    "Horror",
    "Music",
    "Mystery",
    "Romance",
    "Science Fiction",
    "TV Movie",
    "Thriller",
    "War",
    "Western",
];

// ── Movie Operations ────────────────────────────────────────────────────────

/// Insert a new movie row and its genre links. Returns the new internal id.
///
/// Fails with a constraint error if the `tmdb_id` is already present, or if
/// the record is unenriched and an unenriched row with the same title exists.
pub fn insert_movie(conn: &Connection, record: &CatalogRecord) -> Result<i64, OperationError> {
    conn.execute(
        "INSERT INTO movies (title, source_title, origin, original_title, tmdb_id,
             release_date, runtime, overview, poster_path, backdrop_path,
             vote_average, vote_count, popularity, trailer_url, rating)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
        params![
            record.title,
            record.source_title,
            record.origin,
            record.original_title,
            record.external_id,
            record.release_date,
            record.runtime,
            record.overview,
            record.poster_path,
            record.backdrop_path,
            record.vote_average,
            record.vote_count,
            record.popularity,
            record.trailer_url,
            record.content_rating,
        ],
    )?;
    let id = conn.last_insert_rowid();
    set_movie_genres(conn, id, &record.genres)?;
    Ok(id)
}

/// Insert an unenriched movie unless one with the same title already exists.
///
/// Returns `Some(id)` when a row was written and `None` when the insert was
/// skipped on a title collision. Callers that need the surviving row's id
/// must look it up again.
pub fn insert_movie_if_absent(
    conn: &Connection,
    record: &CatalogRecord,
) -> Result<Option<i64>, OperationError> {
    let inserted = conn.execute(
        "INSERT INTO movies (title, source_title, origin)
         VALUES (?1, ?2, ?3)
         ON CONFLICT DO NOTHING",
        params![record.title, record.source_title, record.origin],
    )?;
    if inserted == 0 {
        return Ok(None);
    }
    let id = conn.last_insert_rowid();
    set_movie_genres(conn, id, &record.genres)?;
    Ok(Some(id))
}

/// Overwrite every stored field of movie `id` with `record`, and replace its
/// genre links.
pub fn update_movie(
    conn: &Connection,
    id: i64,
    record: &CatalogRecord,
) -> Result<(), OperationError> {
    let changed = conn.execute(
        "UPDATE movies SET
             title = ?2, source_title = ?3, origin = ?4, original_title = ?5,
             tmdb_id = ?6, release_date = ?7, runtime = ?8, overview = ?9,
             poster_path = ?10, backdrop_path = ?11, vote_average = ?12,
             vote_count = ?13, popularity = ?14, trailer_url = ?15, rating = ?16,
             updated_at = datetime('now')
         WHERE id = ?1",
        params![
            id,
            record.title,
            record.source_title,
            record.origin,
            record.original_title,
            record.external_id,
            record.release_date,
            record.runtime,
            record.overview,
            record.poster_path,
            record.backdrop_path,
            record.vote_average,
            record.vote_count,
            record.popularity,
            record.trailer_url,
            record.content_rating,
        ],
    )?;
    if changed == 0 {
        return Err(OperationError::NotFound {
            entity_type: "movie".to_string(),
            id: id.to_string(),
        });
    }
    set_movie_genres(conn, id, &record.genres)?;
    Ok(())
}

/// Find the movie carrying a TMDB id.
pub fn find_movie_by_tmdb_id(
    conn: &Connection,
    tmdb_id: i64,
) -> Result<Option<CatalogRecord>, OperationError> {
    find_one(
        conn,
        &format!("SELECT {MOVIE_COLUMNS} FROM movies WHERE tmdb_id = ?1"),
        params![tmdb_id],
    )
}

/// Find the unenriched movie stored under an exact title.
pub fn find_unenriched_by_title(
    conn: &Connection,
    title: &str,
) -> Result<Option<CatalogRecord>, OperationError> {
    find_one(
        conn,
        &format!("SELECT {MOVIE_COLUMNS} FROM movies WHERE title = ?1 AND tmdb_id IS NULL"),
        params![title],
    )
}

/// Find the oldest enriched movie produced from a curated-list entry.
pub fn find_enriched_by_source_title(
    conn: &Connection,
    source_title: &str,
) -> Result<Option<CatalogRecord>, OperationError> {
    find_one(
        conn,
        &format!(
            "SELECT {MOVIE_COLUMNS} FROM movies
             WHERE source_title = ?1 AND tmdb_id IS NOT NULL ORDER BY id LIMIT 1"
        ),
        params![source_title],
    )
}

/// All movies stored under an exact title, enriched or not, oldest first.
pub fn find_movies_by_title(
    conn: &Connection,
    title: &str,
) -> Result<Vec<CatalogRecord>, OperationError> {
    let mut stmt =
        conn.prepare(&format!("SELECT {MOVIE_COLUMNS} FROM movies WHERE title = ?1 ORDER BY id"))?;
    let rows = stmt.query_map(params![title], row_to_record)?;
    let mut records = rows.collect::<Result<Vec<_>, _>>()?;
    for record in &mut records {
        if let Some(id) = record.id {
            record.genres = load_genres(conn, id)?;
        }
    }
    Ok(records)
}

/// Delete one movie. Genre links go with it. Returns whether a row existed.
pub fn delete_movie(conn: &Connection, id: i64) -> Result<bool, OperationError> {
    let n = conn.execute("DELETE FROM movies WHERE id = ?1", params![id])?;
    Ok(n > 0)
}

/// Delete every movie stored under an exact title. Returns the number removed.
pub fn delete_movies_by_title(conn: &Connection, title: &str) -> Result<usize, OperationError> {
    let n = conn.execute("DELETE FROM movies WHERE title = ?1", params![title])?;
    Ok(n)
}

/// Delete unenriched movies stored under an exact title. Returns the number
/// removed.
pub fn delete_unenriched_by_title(conn: &Connection, title: &str) -> Result<usize, OperationError> {
    let n = conn.execute(
        "DELETE FROM movies WHERE title = ?1 AND tmdb_id IS NULL",
        params![title],
    )?;
    Ok(n)
}

/// Delete every movie. Genres are kept; their links are not.
pub fn clear_movies(conn: &Connection) -> Result<usize, OperationError> {
    let n = conn.execute("DELETE FROM movies", [])?;
    Ok(n)
}

fn find_one(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> Result<Option<CatalogRecord>, OperationError> {
    let record = conn.query_row(sql, params, row_to_record).optional()?;
    match record {
        Some(mut record) => {
            if let Some(id) = record.id {
                record.genres = load_genres(conn, id)?;
            }
            Ok(Some(record))
        }
        None => Ok(None),
    }
}

// ── Genre Operations ────────────────────────────────────────────────────────

/// Look up a genre by name, creating it if needed. Returns its id.
pub fn get_or_create_genre(conn: &Connection, name: &str) -> Result<i64, OperationError> {
    conn.execute(
        "INSERT INTO genres (name) VALUES (?1) ON CONFLICT(name) DO NOTHING",
        params![name],
    )?;
    let id = conn.query_row(
        "SELECT id FROM genres WHERE name = ?1",
        params![name],
        |row| row.get(0),
    )?;
    Ok(id)
}

/// Replace a movie's genre links with exactly `genres`.
pub fn set_movie_genres(
    conn: &Connection,
    movie_id: i64,
    genres: &BTreeSet<String>,
) -> Result<(), OperationError> {
    conn.execute(
        "DELETE FROM movie_genres WHERE movie_id = ?1",
        params![movie_id],
    )?;
    for name in genres {
        let genre_id = get_or_create_genre(conn, name)?;
        conn.execute(
            "INSERT OR IGNORE INTO movie_genres (movie_id, genre_id) VALUES (?1, ?2)",
            params![movie_id, genre_id],
        )?;
    }
    Ok(())
}

/// Insert the default genre list. Returns how many were new.
pub fn seed_default_genres(conn: &Connection) -> Result<usize, OperationError> {
    let mut added = 0;
    for name in DEFAULT_GENRES {
        added += conn.execute(
            "INSERT INTO genres (name) VALUES (?1) ON CONFLICT(name) DO NOTHING",
            params![name],
        )?;
    }
    Ok(added)
}

// ── Sync Log Operations ─────────────────────────────────────────────────────

/// Record one catalog sync run.
pub fn insert_sync_log(conn: &Connection, log: &SyncLog) -> Result<i64, OperationError> {
    conn.execute(
        "INSERT INTO sync_log (mode, synced_at, records_inserted, records_updated,
             records_unchanged, records_skipped, records_removed)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            log.mode,
            log.synced_at,
            log.records_inserted,
            log.records_updated,
            log.records_unchanged,
            log.records_skipped,
            log.records_removed,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}
