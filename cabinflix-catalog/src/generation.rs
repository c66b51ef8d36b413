//! Enrichment generation files.
//!
//! A generation is the JSON output of one full enrichment pass: an array of
//! entries, one per curated title that was looked up. Older tools wrote empty
//! strings where a value was missing, so any field holding `""` reads as
//! absent. Fields this crate does not know about are ignored.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::types::ExternalMatch;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("JSON error in {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
}

/// One entry of a generation file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationEntry {
    /// Title as the provider spells it, or the curated title when unmatched.
    pub title: String,
    /// The curated-list text this entry was looked up for.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub source_title: Option<String>,
    #[serde(default, deserialize_with = "lenient", alias = "sheet")]
    pub origin: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub original_title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub tmdb_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub release_date: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub runtime: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub overview: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub poster_path: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub backdrop_path: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub vote_average: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub vote_count: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub popularity: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub trailer_url: Option<String>,
    /// US certification.
    #[serde(default, deserialize_with = "lenient")]
    pub rating: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub genres: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list", skip_serializing_if = "Vec::is_empty")]
    pub cast: Vec<String>,
}

impl GenerationEntry {
    /// An entry for a title the lookup found nothing for.
    pub fn unmatched(title: impl Into<String>, origin: Option<String>) -> Self {
        let title = title.into();
        Self {
            source_title: Some(title.clone()),
            title,
            origin,
            ..Self::default()
        }
    }

    /// An entry carrying provider metadata for `source_title`.
    pub fn from_match(source_title: &str, origin: Option<String>, m: &ExternalMatch) -> Self {
        Self {
            title: m.canonical_title.clone(),
            source_title: Some(source_title.to_string()),
            origin,
            original_title: m.original_title.clone(),
            tmdb_id: Some(m.external_id),
            release_date: m.release_date.clone(),
            runtime: m.runtime,
            overview: m.overview.clone(),
            poster_path: m.poster_path.clone(),
            backdrop_path: m.backdrop_path.clone(),
            vote_average: m.vote_average,
            vote_count: m.vote_count,
            popularity: m.popularity,
            trailer_url: m.trailer_url.clone(),
            rating: m.content_rating.clone(),
            genres: m.genres.clone(),
            cast: m.cast.clone(),
        }
    }

    /// Provider metadata carried by this entry, if it was enriched.
    pub fn to_match(&self) -> Option<ExternalMatch> {
        let external_id = self.tmdb_id?;
        Some(ExternalMatch {
            external_id,
            canonical_title: self.title.clone(),
            original_title: self.original_title.clone(),
            release_date: self.release_date.clone(),
            runtime: self.runtime,
            overview: self.overview.clone(),
            poster_path: self.poster_path.clone(),
            backdrop_path: self.backdrop_path.clone(),
            vote_average: self.vote_average,
            vote_count: self.vote_count,
            popularity: self.popularity,
            content_rating: self.rating.clone(),
            trailer_url: self.trailer_url.clone(),
            genres: self.genres.clone(),
            cast: self.cast.clone(),
        })
    }
}

/// Read a generation file.
pub fn load_generation(path: &Path) -> Result<Vec<GenerationEntry>, GenerationError> {
    let display = path.display().to_string();
    let contents = std::fs::read_to_string(path).map_err(|e| GenerationError::Io {
        path: display.clone(),
        source: e,
    })?;
    serde_json::from_str(&contents).map_err(|e| GenerationError::Json {
        path: display,
        source: e,
    })
}

/// Write a generation file as pretty-printed JSON, creating parent
/// directories as needed.
pub fn write_generation(path: &Path, entries: &[GenerationEntry]) -> Result<(), GenerationError> {
    let display = path.display().to_string();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| GenerationError::Io {
            path: display.clone(),
            source: e,
        })?;
    }
    let json = serde_json::to_string_pretty(entries).map_err(|e| GenerationError::Json {
        path: display.clone(),
        source: e,
    })?;
    std::fs::write(path, json).map_err(|e| GenerationError::Io {
        path: display,
        source: e,
    })
}

// ── Lenient field parsing ───────────────────────────────────────────────────

/// Read an optional field the way older generation files wrote it: null,
/// blank strings, and values of the wrong type read as missing. Numbers
/// written as strings (`"runtime": "120"`) are accepted.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => return Ok(None),
        Some(serde_json::Value::String(s)) if s.trim().is_empty() => return Ok(None),
        Some(value) => value,
    };
    if let Ok(parsed) = serde_json::from_value::<T>(value.clone()) {
        return Ok(Some(parsed));
    }
    if let serde_json::Value::String(s) = &value
        && let Ok(number) = s.trim().parse::<serde_json::Number>()
    {
        return Ok(serde_json::from_value(serde_json::Value::Number(number)).ok());
    }
    Ok(None)
}

fn lenient_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient::<D, Vec<String>>(deserializer)?.unwrap_or_default())
}
