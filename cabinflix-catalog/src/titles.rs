//! Loading the curated title list.
//!
//! Two formats are accepted, chosen by file extension:
//!
//! - `.json`: an array of `{"title": "...", "sheet": "..."}` objects
//!   (`origin` is accepted in place of `sheet`)
//! - `.csv`: a header row with a `title` column and an optional `origin` column
//!
//! Titles are trimmed, blanks are dropped, and exact duplicates are removed
//! keeping the first occurrence. Order is preserved.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::types::RawTitle;

#[derive(Debug, Error)]
pub enum TitleListError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("JSON parse error in {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },
    #[error("Unsupported title list format: {0} (expected .json or .csv)")]
    UnsupportedFormat(String),
}

#[derive(Debug, Deserialize)]
struct TitleRow {
    title: String,
    #[serde(default, alias = "sheet")]
    origin: Option<String>,
}

/// Load a curated title list from disk.
pub fn load_titles(path: &Path) -> Result<Vec<RawTitle>, TitleListError> {
    let display = path.display().to_string();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let rows: Vec<TitleRow> = match ext.as_str() {
        "json" => {
            let contents = std::fs::read_to_string(path).map_err(|e| TitleListError::Io {
                path: display.clone(),
                source: e,
            })?;
            serde_json::from_str(&contents).map_err(|e| TitleListError::Json {
                path: display.clone(),
                source: e,
            })?
        }
        "csv" => {
            let mut reader = csv::ReaderBuilder::new()
                .trim(csv::Trim::All)
                .flexible(true)
                .from_path(path)
                .map_err(|e| TitleListError::Csv {
                    path: display.clone(),
                    source: e,
                })?;
            reader
                .deserialize()
                .collect::<Result<Vec<TitleRow>, _>>()
                .map_err(|e| TitleListError::Csv {
                    path: display.clone(),
                    source: e,
                })?
        }
        _ => return Err(TitleListError::UnsupportedFormat(display)),
    };

    Ok(dedupe_titles(
        rows.into_iter()
            .map(|r| (r.title, r.origin.unwrap_or_default())),
    ))
}

/// Turn `(title, origin)` pairs into an ordered, duplicate-free title list.
///
/// ```
/// use cabinflix_catalog::titles::dedupe_titles;
///
/// let titles = dedupe_titles(vec![
///     (" Heat ".to_string(), "A".to_string()),
///     ("".to_string(), "A".to_string()),
///     ("Heat".to_string(), "B".to_string()),
///     ("Ronin".to_string(), "B".to_string()),
/// ]);
/// assert_eq!(titles.len(), 2);
/// assert_eq!(titles[0].origin, "A");
/// assert_eq!(titles[1].position, 1);
/// ```
pub fn dedupe_titles(pairs: impl IntoIterator<Item = (String, String)>) -> Vec<RawTitle> {
    let mut seen = HashSet::new();
    let mut titles = Vec::new();
    for (title, origin) in pairs {
        let title = title.trim();
        if title.is_empty() || !seen.insert(title.to_string()) {
            continue;
        }
        let position = titles.len();
        titles.push(RawTitle::new(title, origin.trim(), position));
    }
    titles
}
