use std::path::PathBuf;

use cabinflix_import::{RemovalReason, dedupe_store};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::CliError;

use super::{load_overrides, open_existing_catalog};

/// Run the `dedupe` command against the stored catalog.
pub(crate) fn run_dedupe(
    db: Option<PathBuf>,
    dry_run: bool,
    overrides: Option<PathBuf>,
) -> Result<(), CliError> {
    let Some((conn, _)) = open_existing_catalog(db)? else {
        return Ok(());
    };
    let overrides = load_overrides(overrides)?;

    log::info!(
        "{}",
        "Resolving duplicates...".if_supports_color(Stdout, |t| t.bold()),
    );

    conn.execute_batch("BEGIN IMMEDIATE")
        .map_err(|e| CliError::database(e.to_string()))?;
    let plan = match dedupe_store(&conn, overrides.aliases(), dry_run) {
        Ok(plan) => {
            conn.execute_batch("COMMIT")
                .map_err(|e| CliError::database(e.to_string()))?;
            plan
        }
        Err(e) => {
            let _ = conn.execute_batch("ROLLBACK");
            return Err(CliError::database(format!("Duplicate resolution failed: {}", e)));
        }
    };

    if plan.is_empty() {
        log::info!("  No duplicates found.");
        return Ok(());
    }

    let verb = if dry_run { "Would remove" } else { "Removed" };
    for removal in &plan.removals {
        let why = match &removal.reason {
            RemovalReason::SharedExternalId { external_id, kept } => {
                format!("TMDB {} kept as \"{}\"", external_id, kept)
            }
            RemovalReason::SharedTitle => "duplicate title".to_string(),
            RemovalReason::Shadowed { external_id } => {
                format!("enriched as TMDB {}", external_id)
            }
            RemovalReason::Alias { enriched } => {
                format!(
                    "alias of \"{}\"",
                    enriched.if_supports_color(Stdout, |t| t.green())
                )
            }
        };
        log::info!(
            "  {} #{} \"{}\" ({})",
            verb,
            removal.id.unwrap_or_default(),
            removal.title,
            why,
        );
    }
    for a in &plan.ambiguities {
        log::warn!(
            "Left alone: \"{}\" / \"{}\" ({})",
            a.unenriched,
            a.enriched,
            a.reason
        );
    }

    crate::log_blank();
    if dry_run {
        log::info!(
            "{}",
            "Dry run: no changes made.".if_supports_color(Stdout, |t| t.yellow()),
        );
    }
    log::info!("  Shared-id removals: {:>6}", plan.shared_id_removals());
    log::info!("  Alias removals:     {:>6}", plan.alias_removals());
    log::info!("  Ambiguous pairs:    {:>6}", plan.ambiguities.len());
    Ok(())
}
