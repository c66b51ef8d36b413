use std::path::PathBuf;

use cabinflix_import::{MatchResolver, enrich_titles};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::CliError;
use crate::progress::BarProgress;

use super::{load_overrides, load_title_list, tmdb_client};

/// Run the `enrich` command: look up every curated title and write the
/// results as a new generation file.
pub(crate) fn run_enrich(
    titles_path: PathBuf,
    out: PathBuf,
    limit: Option<usize>,
    api_key: Option<String>,
    overrides: Option<PathBuf>,
    quiet: bool,
) -> Result<(), CliError> {
    let titles = load_title_list(&titles_path)?;
    let overrides = load_overrides(overrides)?;
    let client = tmdb_client(api_key)?;
    let resolver = MatchResolver::new(&client, &overrides);

    log::info!(
        "{}",
        format!("Enriching titles from {}", titles_path.display())
            .if_supports_color(Stdout, |t| t.bold()),
    );
    if let Some(n) = limit {
        log::info!("  Limit: {} titles", n);
    }

    let progress = BarProgress::new(quiet);
    let (entries, stats) = enrich_titles(&titles, &resolver, limit, &progress);

    cabinflix_catalog::write_generation(&out, &entries)
        .map_err(|e| CliError::input(format!("{}: {}", out.display(), e)))?;

    crate::log_blank();
    log::info!(
        "{}",
        "Enrichment complete".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("  Titles processed: {:>6}", stats.processed);
    log::info!(
        "  Enriched:         {:>6}",
        stats.enriched.if_supports_color(Stdout, |t| t.green()),
    );
    log::info!("  Not found:        {:>6}", stats.not_found);
    if stats.lookup_errors > 0 {
        log::info!(
            "  Lookup errors:    {:>6}",
            stats.lookup_errors.if_supports_color(Stdout, |t| t.red()),
        );
    }
    log::info!(
        "  Written to:       {}",
        out.display().if_supports_color(Stdout, |t| t.cyan()),
    );
    Ok(())
}
