use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::CliError;

use super::open_existing_catalog;

pub(crate) fn run_stats(db: Option<PathBuf>, syncs: u32) -> Result<(), CliError> {
    let Some((conn, path)) = open_existing_catalog(db)? else {
        return Ok(());
    };

    let stats = cabinflix_db::catalog_stats(&conn)
        .map_err(|e| CliError::database(format!("Failed to query catalog stats: {}", e)))?;

    log::info!(
        "{}",
        "Catalog Statistics".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("  Database: {}", path.display());
    crate::log_blank();
    log::info!("  Movies:         {:>8}", stats.movies);
    log::info!("  Enriched:       {:>8}", stats.enriched);
    log::info!("  Unenriched:     {:>8}", stats.unenriched);
    log::info!("  Genres:         {:>8}", stats.genres);
    log::info!("  Genre links:    {:>8}", stats.genre_links);
    log::info!(
        "  Enrichment:     {:>7.1}%",
        stats.enrichment_rate() * 100.0
    );

    let genres = cabinflix_db::genre_counts(&conn)
        .map_err(|e| CliError::database(format!("Failed to query genres: {}", e)))?;
    let used: Vec<_> = genres.iter().filter(|(_, n)| *n > 0).collect();
    if !used.is_empty() {
        crate::log_blank();
        log::info!("{}", "Genres".if_supports_color(Stdout, |t| t.bold()));
        for (name, count) in used {
            log::info!("  {:<18} {:>6}", name, count);
        }
    }

    let logs = cabinflix_db::list_sync_logs(&conn, Some(syncs))
        .map_err(|e| CliError::database(format!("Failed to query sync history: {}", e)))?;
    if !logs.is_empty() {
        crate::log_blank();
        log::info!("{}", "Recent syncs".if_supports_color(Stdout, |t| t.bold()));
        for entry in &logs {
            log::info!(
                "  {} {:<8} +{} ~{} ={} skip {} -{}",
                entry.synced_at.if_supports_color(Stdout, |t| t.dimmed()),
                entry.mode,
                entry.records_inserted,
                entry.records_updated,
                entry.records_unchanged,
                entry.records_skipped,
                entry.records_removed,
            );
        }
    }

    let unmatched = cabinflix_db::remaining_unmatched(&conn)
        .map_err(|e| CliError::database(format!("Failed to query unmatched titles: {}", e)))?;
    if !unmatched.is_empty() {
        crate::log_blank();
        log::info!(
            "{} ({})",
            "Remaining unmatched".if_supports_color(Stdout, |t| t.bold()),
            unmatched.len(),
        );
        for title in &unmatched {
            log::info!("  {}", title);
        }
    }

    Ok(())
}
