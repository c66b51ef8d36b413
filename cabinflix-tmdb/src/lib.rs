//! TMDB metadata lookups: the blocking API client, its wire types, and the
//! `MetadataLookup` trait the reconciliation engine is written against.

pub mod client;
pub mod config;
pub mod error;
pub mod lookup;
pub mod types;

pub use client::TmdbClient;
pub use config::{
    ConfigFile, ConfigSource, ConfigSources, TmdbConfig, config_path, config_sources,
    load_config_file, read_config_file,
};
pub use error::LookupError;
pub use lookup::{MetadataLookup, lookup_first};
pub use types::{MovieDetails, SearchHit};
