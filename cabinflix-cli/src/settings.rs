//! Catalog settings: where the database lives and which override table to
//! load.
//!
//! These come from the `[catalog]` table of the shared config file
//! (`~/.config/cabinflix/config.toml`); its `[tmdb]` table is read by
//! `cabinflix-tmdb`.

use std::path::{Path, PathBuf};

use cabinflix_tmdb::ConfigSource;
use serde::Deserialize;

use crate::CliError;

pub(crate) const DATABASE_ENV: &str = "CABINFLIX_DB";

/// The `[catalog]` table.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct CatalogSettings {
    pub database: Option<PathBuf>,
    pub overrides: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct SettingsFile {
    catalog: Option<CatalogSettings>,
}

/// Parse config file text, keeping only the `[catalog]` table.
pub(crate) fn parse_catalog_settings(contents: &str) -> Result<CatalogSettings, CliError> {
    let file: SettingsFile = toml::from_str(contents)
        .map_err(|e| CliError::config(format!("Failed to parse config file: {e}")))?;
    Ok(file.catalog.unwrap_or_default())
}

/// Read `[catalog]` from the config file at `path`. A missing file reads as
/// empty.
pub(crate) fn read_catalog_settings(path: &Path) -> Result<CatalogSettings, CliError> {
    match std::fs::read_to_string(path) {
        Ok(contents) => parse_catalog_settings(&contents),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(CatalogSettings::default()),
        Err(e) => Err(e.into()),
    }
}

/// `[catalog]` from the standard config file. Unreadable or malformed files
/// are logged and read as empty.
pub(crate) fn load_catalog_settings() -> CatalogSettings {
    let Some(path) = cabinflix_tmdb::config_path() else {
        return CatalogSettings::default();
    };
    read_catalog_settings(&path).unwrap_or_else(|e| {
        log::warn!("Ignoring config file {}: {}", path.display(), e);
        CatalogSettings::default()
    })
}

/// Default location of the catalog database: `<data dir>/cabinflix/catalog.db`.
pub(crate) fn default_database_path() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join("cabinflix").join("catalog.db"))
}

/// Resolve the catalog database path and where it came from.
///
/// Priority: `--db` > `$CABINFLIX_DB` > config file > platform data dir.
pub(crate) fn resolve_db_path(flag: Option<PathBuf>) -> Result<(PathBuf, ConfigSource), CliError> {
    if let Some(path) = flag {
        return Ok((path, ConfigSource::Flag));
    }
    if let Some(path) = std::env::var_os(DATABASE_ENV).filter(|v| !v.is_empty()) {
        return Ok((PathBuf::from(path), ConfigSource::EnvVar(DATABASE_ENV)));
    }
    resolve_db_path_from(load_catalog_settings())
}

fn resolve_db_path_from(settings: CatalogSettings) -> Result<(PathBuf, ConfigSource), CliError> {
    if let Some(path) = settings.database {
        return Ok((path, ConfigSource::ConfigFile));
    }
    default_database_path()
        .map(|p| (p, ConfigSource::Default))
        .ok_or_else(|| CliError::config("Could not determine a data directory; pass --db"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn db_flag_wins() {
        let (path, source) = resolve_db_path(Some(PathBuf::from("/tmp/x.db"))).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/x.db"));
        assert_eq!(source, ConfigSource::Flag);
    }

    #[test]
    fn catalog_table_is_read_and_tmdb_table_ignored() {
        let settings = parse_catalog_settings(
            r#"
[tmdb]
api_key = "abc"

[catalog]
database = "/srv/movies.db"
overrides = "/srv/overrides.yaml"
"#,
        )
        .unwrap();
        assert_eq!(settings.overrides, Some(PathBuf::from("/srv/overrides.yaml")));
        let (path, source) = resolve_db_path_from(settings).unwrap();
        assert_eq!(path, PathBuf::from("/srv/movies.db"));
        assert_eq!(source, ConfigSource::ConfigFile);
    }

    #[test]
    fn missing_file_reads_empty() {
        let tmp = TempDir::new().unwrap();
        let settings = read_catalog_settings(&tmp.path().join("config.toml")).unwrap();
        assert!(settings.database.is_none());
        assert!(settings.overrides.is_none());
    }

    #[test]
    fn malformed_file_is_config_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[catalog\ndatabase = ").unwrap();
        assert!(matches!(
            read_catalog_settings(&path),
            Err(CliError::Config(_))
        ));
    }
}
