use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::CliError;

use super::{load_title_list, open_existing_catalog};

/// Run the `missing` command: curated titles without a catalog row, and
/// catalog rows not on the curated list.
pub(crate) fn run_missing(db: Option<PathBuf>, titles_path: PathBuf) -> Result<(), CliError> {
    let titles = load_title_list(&titles_path)?;
    let Some((conn, _)) = open_existing_catalog(db)? else {
        return Ok(());
    };

    let report = cabinflix_import::missing_report(&conn, &titles)
        .map_err(|e| CliError::database(format!("Failed to compare catalog: {}", e)))?;

    if report.is_clean() {
        log::info!(
            "{}",
            format!("All {} curated titles are in the catalog.", titles.len())
                .if_supports_color(Stdout, |t| t.green()),
        );
        return Ok(());
    }

    if !report.missing.is_empty() {
        log::info!(
            "{} ({})",
            "Missing from catalog".if_supports_color(Stdout, |t| t.bold()),
            report.missing.len(),
        );
        for title in &report.missing {
            log::info!("  {}", title.if_supports_color(Stdout, |t| t.red()));
        }
    }

    if !report.extra.is_empty() {
        if !report.missing.is_empty() {
            crate::log_blank();
        }
        log::info!(
            "{} ({})",
            "Not on the curated list".if_supports_color(Stdout, |t| t.bold()),
            report.extra.len(),
        );
        for title in &report.extra {
            log::info!("  {}", title.if_supports_color(Stdout, |t| t.yellow()));
        }
    }

    Ok(())
}
