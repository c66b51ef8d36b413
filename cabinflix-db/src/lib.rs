//! SQLite persistence layer for the movie catalog.
//!
//! Provides schema creation, CRUD operations, and query APIs
//! backed by SQLite (via rusqlite with bundled feature).

pub mod operations;
pub mod queries;
pub mod schema;

pub use operations::{
    DEFAULT_GENRES, OperationError, clear_movies, delete_movie, delete_movies_by_title,
    delete_unenriched_by_title, find_enriched_by_source_title, find_movie_by_tmdb_id,
    find_movies_by_title, find_unenriched_by_title, get_or_create_genre, insert_movie,
    insert_movie_if_absent, insert_sync_log, seed_default_genres, set_movie_genres, update_movie,
};
pub use queries::{
    CatalogStats, catalog_stats, count_movies, genre_counts, get_movie, list_movies,
    list_sync_logs, load_genres, remaining_unmatched,
};
pub use rusqlite::Connection;
pub use schema::{SchemaError, open_database, open_memory};
