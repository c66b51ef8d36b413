use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::CliError;

use super::open_catalog;

/// Run the `init` command.
pub(crate) fn run_init(db: Option<PathBuf>) -> Result<(), CliError> {
    let (conn, path) = open_catalog(db)?;

    let version = cabinflix_db::schema::get_schema_version(&conn)
        .map_err(|e| CliError::database(format!("Failed to read schema version: {}", e)))?;
    let added = cabinflix_db::seed_default_genres(&conn)
        .map_err(|e| CliError::database(format!("Failed to seed genres: {}", e)))?;

    log::info!(
        "{} {}",
        "Catalog ready:".if_supports_color(Stdout, |t| t.bold()),
        path.display().if_supports_color(Stdout, |t| t.cyan()),
    );
    log::info!("  Schema version: {}", version);
    if added > 0 {
        log::info!("  Seeded {} default genres", added);
    } else {
        log::info!("  Default genres already present");
    }
    Ok(())
}
