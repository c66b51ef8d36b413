use std::path::PathBuf;

use cabinflix_tmdb::config::{API_KEY_ENV, DEFAULT_LANGUAGE, DEFAULT_REQUEST_DELAY_MS};
use cabinflix_tmdb::{ConfigSource, ConfigFile};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::CliError;
use crate::settings::{CatalogSettings, read_catalog_settings, resolve_db_path};

fn mask_value(s: &str) -> String {
    let head: String = s.chars().take(2).collect();
    if s.chars().count() <= 2 {
        "****".to_string()
    } else {
        format!("{}****", head)
    }
}

fn show_field(name: &str, value: Option<String>, source: &ConfigSource) {
    let source_str = format!("({})", source);
    let label = format!("{}:", name);
    match value {
        Some(v) => log::info!(
            "  {} {} {}",
            label.if_supports_color(Stdout, |t| t.cyan()),
            v,
            source_str.if_supports_color(Stdout, |t| t.dimmed()),
        ),
        None => log::info!(
            "  {} {} {}",
            label.if_supports_color(Stdout, |t| t.cyan()),
            "not set".if_supports_color(Stdout, |t| t.yellow()),
            source_str.if_supports_color(Stdout, |t| t.dimmed()),
        ),
    }
}

/// Show resolved settings and their sources.
pub(crate) fn run_config_show(db: Option<PathBuf>) -> Result<(), CliError> {
    let path = cabinflix_tmdb::config_path();
    let sources = cabinflix_tmdb::config_sources(false);

    log::info!(
        "{}",
        "cabinflix Configuration".if_supports_color(Stdout, |t| t.bold()),
    );
    crate::log_blank();

    match &path {
        Some(p) if p.exists() => log::info!(
            "  Config file: {} {}",
            p.display().if_supports_color(Stdout, |t| t.cyan()),
            "(exists)".if_supports_color(Stdout, |t| t.green()),
        ),
        Some(p) => log::info!(
            "  Config file: {} {}",
            p.display().if_supports_color(Stdout, |t| t.cyan()),
            "(not found)".if_supports_color(Stdout, |t| t.dimmed()),
        ),
        None => log::info!(
            "  Config file: {}",
            "could not determine path".if_supports_color(Stdout, |t| t.red()),
        ),
    }
    crate::log_blank();

    let file = match &path {
        Some(p) => cabinflix_tmdb::read_config_file(p)
            .map_err(|e| CliError::config(format!("{}: {}", p.display(), e)))?,
        None => ConfigFile::default(),
    };
    let tmdb = file.tmdb.as_ref();
    let catalog = match &path {
        Some(p) => read_catalog_settings(p)?,
        None => CatalogSettings::default(),
    };

    let (db_path, db_source) = resolve_db_path(db)?;
    show_field(
        "database",
        Some(db_path.display().to_string()),
        &db_source,
    );

    let (overrides, overrides_source) = match &catalog.overrides {
        Some(p) => (p.display().to_string(), ConfigSource::ConfigFile),
        None => ("built-in".to_string(), ConfigSource::Default),
    };
    show_field("overrides", Some(overrides), &overrides_source);

    let api_key = match &sources.api_key {
        ConfigSource::EnvVar(_) => std::env::var(API_KEY_ENV).ok(),
        ConfigSource::ConfigFile => tmdb.and_then(|t| t.api_key.clone()),
        _ => None,
    };
    show_field("api_key", api_key.as_deref().map(mask_value), &sources.api_key);

    let language = tmdb
        .and_then(|t| t.language.clone())
        .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());
    show_field("language", Some(language), &sources.language);

    let delay = tmdb
        .and_then(|t| t.request_delay_ms)
        .unwrap_or(DEFAULT_REQUEST_DELAY_MS);
    show_field(
        "request_delay_ms",
        Some(delay.to_string()),
        &sources.request_delay,
    );
    Ok(())
}

/// Print the config file path.
pub(crate) fn run_config_path() -> Result<(), CliError> {
    match cabinflix_tmdb::config_path() {
        Some(path) => {
            log::info!("{}", path.display());
            Ok(())
        }
        None => Err(CliError::config("Could not determine config directory")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_all_but_two_characters() {
        assert_eq!(mask_value("abcdef"), "ab****");
        assert_eq!(mask_value("ab"), "****");
    }
}
