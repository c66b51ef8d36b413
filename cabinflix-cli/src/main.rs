//! cabinflix CLI
//!
//! Command-line interface for building a canonical movie catalog from a
//! curated title list and TMDB metadata.

mod cli_types;
mod commands;
mod error;
mod progress;
mod settings;

use std::io::Write;

use clap::Parser;

use cli_types::{Cli, Commands, ConfigAction};
pub(crate) use error::CliError;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.quiet, cli.verbose);

    let db = cli.db;
    let quiet = cli.quiet;
    let result = match cli.command {
        Commands::Init => commands::init::run_init(db),
        Commands::Enrich {
            titles,
            out,
            limit,
            api_key,
            overrides,
        } => commands::enrich::run_enrich(titles.titles, out, limit, api_key, overrides, quiet),
        Commands::Reconcile {
            titles,
            generations,
            lookup,
            api_key,
            dry_run,
            overrides,
        } => commands::reconcile::run_reconcile(
            db,
            commands::reconcile::ReconcileArgs {
                titles: titles.titles,
                generations,
                lookup,
                api_key,
                dry_run,
                overrides,
            },
            quiet,
        ),
        Commands::Dedupe { dry_run, overrides } => {
            commands::dedupe::run_dedupe(db, dry_run, overrides)
        }
        Commands::Stats { syncs } => commands::stats::run_stats(db, syncs),
        Commands::Missing { titles } => commands::missing::run_missing(db, titles.titles),
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::run_config_show(db),
            ConfigAction::Path => commands::config::run_config_path(),
        },
    };

    if let Err(e) = result {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

/// Set up `env_logger`. `RUST_LOG` overrides the level chosen by flags.
///
/// Normal output is message-only so info lines read as plain CLI output;
/// `--verbose` switches to timestamped, level-tagged records.
fn init_logging(quiet: bool, verbose: bool) {
    let filter = if quiet {
        "warn"
    } else if verbose {
        "warn,cabinflix=debug"
    } else {
        "warn,cabinflix=info"
    };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter));
    builder.target(env_logger::Target::Stdout);
    if verbose {
        builder.format_timestamp_millis();
    } else {
        builder.format(|buf, record| match record.level() {
            log::Level::Info => writeln!(buf, "{}", record.args()),
            level => writeln!(buf, "{}: {}", level, record.args()),
        });
    }
    builder.init();
}

/// Emit an empty line through the logger.
pub(crate) fn log_blank() {
    log::info!("");
}
