//! Comparing the curated list with the stored catalog.

use std::collections::HashSet;

use cabinflix_catalog::RawTitle;
use cabinflix_db::{operations::OperationError, queries};
use rusqlite::Connection;

/// Curated titles absent from the store, and stored rows absent from the
/// curated list.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MissingReport {
    /// Curated titles with no stored row, in extraction order.
    pub missing: Vec<String>,
    /// Titles of stored rows that match no curated title, in id order.
    pub extra: Vec<String>,
}

impl MissingReport {
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.extra.is_empty()
    }
}

/// Build the missing/extra report. A stored row matches a curated title
/// when either its title or its source title equals it, ignoring case.
pub fn missing_report(
    conn: &Connection,
    titles: &[RawTitle],
) -> Result<MissingReport, OperationError> {
    let rows = queries::list_movies(conn)?;

    let mut stored: HashSet<String> = HashSet::new();
    for row in &rows {
        stored.insert(row.title.to_lowercase());
        if let Some(source) = &row.source_title {
            stored.insert(source.to_lowercase());
        }
    }
    let curated: HashSet<String> = titles.iter().map(|t| t.text.to_lowercase()).collect();

    let mut ordered: Vec<&RawTitle> = titles.iter().collect();
    ordered.sort_by_key(|t| t.position);
    let missing = ordered
        .into_iter()
        .filter(|t| !stored.contains(&t.text.to_lowercase()))
        .map(|t| t.text.clone())
        .collect();

    let extra = rows
        .into_iter()
        .filter(|row| {
            !curated.contains(&row.title.to_lowercase())
                && !row
                    .source_title
                    .as_ref()
                    .is_some_and(|s| curated.contains(&s.to_lowercase()))
        })
        .map(|row| row.title)
        .collect();

    Ok(MissingReport { missing, extra })
}
