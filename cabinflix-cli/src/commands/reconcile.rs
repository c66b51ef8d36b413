use std::path::PathBuf;

use cabinflix_import::{
    EnrichmentHistory, MatchResolver, ReconcileOptions, ReconcileReport, RemovalReason,
    reconcile_catalog,
};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::CliError;
use crate::progress::BarProgress;

use super::{load_overrides, load_title_list, open_catalog, tmdb_client};

/// Most unmatched titles listed before the rest are summarized.
const UNMATCHED_LISTED: usize = 25;

pub(crate) struct ReconcileArgs {
    pub titles: PathBuf,
    pub generations: Vec<PathBuf>,
    pub lookup: bool,
    pub api_key: Option<String>,
    pub dry_run: bool,
    pub overrides: Option<PathBuf>,
}

/// Run the `reconcile` command.
pub(crate) fn run_reconcile(
    db: Option<PathBuf>,
    args: ReconcileArgs,
    quiet: bool,
) -> Result<(), CliError> {
    let titles = load_title_list(&args.titles)?;
    let overrides = load_overrides(args.overrides)?;

    let mut history = EnrichmentHistory::new();
    for path in &args.generations {
        let entries = cabinflix_catalog::load_generation(path)
            .map_err(|e| CliError::input(format!("{}: {}", path.display(), e)))?;
        log::debug!("Generation {}: {} entries", path.display(), entries.len());
        history.add_generation(&entries);
    }

    let client = if args.lookup {
        Some(tmdb_client(args.api_key)?)
    } else {
        None
    };
    let resolver = match &client {
        Some(client) => MatchResolver::new(client, &overrides),
        None => MatchResolver::offline(&overrides),
    };

    let (conn, path) = open_catalog(db)?;

    log::info!(
        "{}",
        format!("Reconciling {} titles into {}", titles.len(), path.display())
            .if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!(
        "  {} generation(s), {} enriched movies known; live lookup {}",
        history.generations(),
        history.len(),
        if resolver.is_offline() { "off" } else { "on" },
    );

    let progress = BarProgress::new(quiet);
    let options = ReconcileOptions {
        dry_run: args.dry_run,
    };
    let report = reconcile_catalog(&conn, &titles, &resolver, &history, &options, &progress)
        .map_err(|e| CliError::database(format!("Reconciliation failed: {}", e)))?;

    print_report(&report);
    Ok(())
}

fn print_report(report: &ReconcileReport) {
    crate::log_blank();
    if report.dry_run {
        log::info!(
            "{}",
            "Dry run: no changes made.".if_supports_color(Stdout, |t| t.yellow()),
        );
    } else {
        log::info!(
            "{}",
            "Reconciliation complete".if_supports_color(Stdout, |t| t.bold()),
        );
    }

    log::info!("  Curated titles:   {:>6}", report.titles);
    log::info!("  Records:          {:>6}", report.records);
    log::info!("    live matches:   {:>6}", report.live_matches);
    log::info!("    prior matches:  {:>6}", report.prior_matches);
    log::info!("    unmatched:      {:>6}", report.unmatched);
    log::info!("  Corrections:      {:>6}", report.corrections);
    log::info!("  Splits:           {:>6}", report.splits);
    if report.retired > 0 {
        log::info!("  Retired rows:     {:>6}", report.retired);
    }
    if report.lookup_failures > 0 {
        log::info!(
            "  Lookup failures:  {:>6}",
            report.lookup_failures.if_supports_color(Stdout, |t| t.red()),
        );
    }

    crate::log_blank();
    log::info!("  Inserted:         {:>6}", report.sync.inserted);
    log::info!("  Updated:          {:>6}", report.sync.updated);
    log::info!("  Unchanged:        {:>6}", report.sync.unchanged);
    log::info!("  Skipped:          {:>6}", report.sync.skipped);
    log::info!("  Superseded:       {:>6}", report.sync.removed);

    let removals: Vec<_> = [&report.memory_dedupe, &report.store_dedupe]
        .into_iter()
        .flat_map(|plan| plan.removals.iter())
        .collect();
    if !removals.is_empty() {
        crate::log_blank();
        log::info!(
            "  {} duplicate(s) collapsed:",
            removals.len().if_supports_color(Stdout, |t| t.bold()),
        );
        for removal in removals {
            let why = match &removal.reason {
                RemovalReason::SharedExternalId { external_id, kept } => {
                    format!("same TMDB id {} as \"{}\"", external_id, kept)
                }
                RemovalReason::SharedTitle => "same title".to_string(),
                RemovalReason::Shadowed { external_id } => {
                    format!("title held by TMDB {}", external_id)
                }
                RemovalReason::Alias { enriched } => format!("alias of \"{}\"", enriched),
            };
            log::info!("    \"{}\" ({})", removal.title, why);
        }
    }

    if let Some(replace) = &report.full_replace {
        crate::log_blank();
        log::warn!(
            "Catalog drifted from the reconciled set; full replace removed {} and inserted {}",
            replace.removed,
            replace.inserted,
        );
    }

    if !report.ambiguities.is_empty() {
        crate::log_blank();
        log::info!(
            "  {} alias pair(s) need review:",
            report.ambiguities.len().if_supports_color(Stdout, |t| t.yellow()),
        );
        for a in &report.ambiguities {
            log::info!("    \"{}\" / \"{}\": {}", a.unenriched, a.enriched, a.reason);
        }
    }

    if !report.remaining_unmatched.is_empty() {
        crate::log_blank();
        log::info!(
            "  {} title(s) remain unmatched:",
            report.remaining_unmatched.len().if_supports_color(Stdout, |t| t.yellow()),
        );
        for title in report.remaining_unmatched.iter().take(UNMATCHED_LISTED) {
            log::info!("    {}", title);
        }
        let rest = report.remaining_unmatched.len().saturating_sub(UNMATCHED_LISTED);
        if rest > 0 {
            log::info!(
                "    {}",
                format!("... and {} more ('cabinflix stats' lists all)", rest)
                    .if_supports_color(Stdout, |t| t.dimmed()),
            );
        }
    }
}
