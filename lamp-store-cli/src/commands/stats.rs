use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::CliError;

pub(crate) fn run_stats(db_path: &Path) -> Result<(), CliError> {
    if !db_path.exists() {
        log::warn!("No database found at {}", db_path.display());
        log::info!("Run 'lamp-store build' to create one.");
        return Ok(());
    }

    let conn = lamp_store_db::open_readonly(db_path)
        .map_err(|e| CliError::database(format!("Failed to open database: {}", e)))?;

    let stats = lamp_store_db::store_stats(&conn)
        .map_err(|e| CliError::database(format!("Failed to query stats: {}", e)))?;

    log::info!(
        "{}",
        "Database Statistics".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("  Database: {}", db_path.display());
    crate::log_blank();
    for (table, count) in stats.rows() {
        log::info!("  {:<18}{:>10}", table, count);
    }

    let logs = lamp_store_db::list_import_logs(&conn)
        .map_err(|e| CliError::database(format!("Failed to read import log: {}", e)))?;
    if !logs.is_empty() {
        crate::log_blank();
        log::info!("{}", "Imports".if_supports_color(Stdout, |t| t.bold()));
        for entry in logs {
            log::info!(
                "  {:<18}{:>10}  {}",
                entry.resource,
                entry.records,
                entry.imported_at.if_supports_color(Stdout, |t| t.dimmed()),
            );
        }
    }

    Ok(())
}
