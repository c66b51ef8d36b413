pub(crate) mod config;
pub(crate) mod dedupe;
pub(crate) mod enrich;
pub(crate) mod init;
pub(crate) mod missing;
pub(crate) mod reconcile;
pub(crate) mod stats;

use std::path::{Path, PathBuf};

use cabinflix_catalog::{OverrideTable, RawTitle};
use cabinflix_db::Connection;
use cabinflix_tmdb::config::API_KEY_ENV;
use cabinflix_tmdb::{TmdbClient, TmdbConfig};

use crate::CliError;
use crate::settings::{load_catalog_settings, resolve_db_path};

/// Open (creating if needed) the catalog database.
pub(crate) fn open_catalog(flag: Option<PathBuf>) -> Result<(Connection, PathBuf), CliError> {
    let (path, _) = resolve_db_path(flag)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let conn = cabinflix_db::open_database(&path)
        .map_err(|e| CliError::database(format!("Failed to open catalog database: {}", e)))?;
    Ok((conn, path))
}

/// Open an existing catalog database. `Ok(None)` (after a warning) when
/// there is none yet.
pub(crate) fn open_existing_catalog(
    flag: Option<PathBuf>,
) -> Result<Option<(Connection, PathBuf)>, CliError> {
    let (path, _) = resolve_db_path(flag)?;
    if !path.exists() {
        log::warn!("No catalog database found at {}", path.display());
        log::info!("Run 'cabinflix init' to create one.");
        return Ok(None);
    }
    let conn = cabinflix_db::open_database(&path)
        .map_err(|e| CliError::database(format!("Failed to open catalog database: {}", e)))?;
    Ok(Some((conn, path)))
}

/// Load the override table: `--overrides`, else the config file's, else the
/// built-in one.
pub(crate) fn load_overrides(flag: Option<PathBuf>) -> Result<OverrideTable, CliError> {
    let path = flag.or_else(|| load_catalog_settings().overrides);
    match path {
        Some(path) => {
            let table = OverrideTable::load(&path).map_err(|e| CliError::input(e.to_string()))?;
            log::debug!("Loaded {} overrides from {}", table.len(), path.display());
            Ok(table)
        }
        None => Ok(OverrideTable::builtin()),
    }
}

pub(crate) fn load_title_list(path: &Path) -> Result<Vec<RawTitle>, CliError> {
    let titles = cabinflix_catalog::load_titles(path)
        .map_err(|e| CliError::input(format!("{}: {}", path.display(), e)))?;
    log::debug!("Loaded {} titles from {}", titles.len(), path.display());
    Ok(titles)
}

/// Build a TMDB client. An explicit key wins over `$TMDB_API_KEY` and the
/// config file.
pub(crate) fn tmdb_client(api_key: Option<String>) -> Result<TmdbClient, CliError> {
    let file = cabinflix_tmdb::load_config_file();
    let key = api_key.or_else(|| std::env::var(API_KEY_ENV).ok());
    let config = TmdbConfig::resolve(key, file.as_ref().and_then(|f| f.tmdb.as_ref()))
        .map_err(|e| CliError::config(e.to_string()))?;
    TmdbClient::new(&config).map_err(|e| CliError::lookup(e.to_string()))
}

/// Truncate a string to a maximum width in characters, appending "..." if
/// needed.
pub(crate) fn truncate_str(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else if max > 3 {
        let head: String = s.chars().take(max - 3).collect();
        format!("{}...", head)
    } else {
        s.chars().take(max).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_strings() {
        assert_eq!(truncate_str("Heat", 10), "Heat");
    }

    #[test]
    fn truncate_counts_characters() {
        assert_eq!(truncate_str("Amélie Poulain", 9), "Amélie...");
        assert_eq!(truncate_str("Amélie", 2), "Am");
    }
}
