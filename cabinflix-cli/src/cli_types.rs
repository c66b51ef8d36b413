//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "cabinflix")]
#[command(about = "Reconcile a curated movie list with TMDB metadata into one catalog", long_about = None)]
pub(crate) struct Cli {
    /// Catalog database path (overrides $CABINFLIX_DB and the config file)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// The curated title list to work from.
#[derive(Args, Clone)]
pub(crate) struct TitlesArgs {
    /// Curated title list (.json or .csv)
    #[arg(short, long)]
    pub titles: PathBuf,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Create or migrate the catalog database and seed default genres
    Init,

    /// Look up every curated title on TMDB and write a new enrichment generation
    Enrich {
        #[command(flatten)]
        titles: TitlesArgs,

        /// Where to write the generation file (JSON)
        #[arg(short, long)]
        out: PathBuf,

        /// Maximum number of curated titles to look up
        #[arg(short, long)]
        limit: Option<usize>,

        /// TMDB API key (overrides $TMDB_API_KEY and the config file)
        #[arg(long)]
        api_key: Option<String>,

        /// Override table (YAML) to use instead of the configured one
        #[arg(long)]
        overrides: Option<PathBuf>,
    },

    /// Reconcile the curated list and enrichment generations into the catalog
    Reconcile {
        #[command(flatten)]
        titles: TitlesArgs,

        /// Enrichment generation files, oldest first (repeatable)
        #[arg(short, long = "generation")]
        generations: Vec<PathBuf>,

        /// Also query TMDB live for every title
        #[arg(long)]
        lookup: bool,

        /// TMDB API key for --lookup
        #[arg(long, requires = "lookup")]
        api_key: Option<String>,

        /// Show what would change without writing
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Override table (YAML) to use instead of the configured one
        #[arg(long)]
        overrides: Option<PathBuf>,
    },

    /// Remove duplicate catalog rows (shared TMDB ids and curated aliases)
    Dedupe {
        /// Show planned removals without deleting
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Override table (YAML) supplying the alias pairs
        #[arg(long)]
        overrides: Option<PathBuf>,
    },

    /// Show catalog statistics and titles still without enrichment
    Stats {
        /// Number of recent sync runs to show
        #[arg(long, default_value_t = 5)]
        syncs: u32,
    },

    /// Compare the curated list with the catalog
    Missing {
        #[command(flatten)]
        titles: TitlesArgs,
    },

    /// Show or locate configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show resolved settings and where each came from
    Show,

    /// Print the config file path
    Path,
}
