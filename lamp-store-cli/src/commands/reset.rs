use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::CliError;

use super::format_bytes;

/// Delete the working store and its side-files.
pub(crate) fn run_reset(store_path: &Path, confirm: bool) -> Result<(), CliError> {
    if !confirm {
        log::warn!(
            "This will permanently delete the working store at:\n  {}",
            store_path.display(),
        );
        log::info!("Re-run with --confirm to proceed:");
        log::info!("  lamp-store reset --confirm");
        return Ok(());
    }

    let stats = lamp_store_import::reset_store(store_path)
        .map_err(|e| CliError::other(e.to_string()))?;

    if stats.files_removed == 0 {
        log::info!("No working store found at {}", store_path.display());
        log::info!("Nothing to reset.");
        return Ok(());
    }

    log::info!(
        "{}",
        "Working store deleted.".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("  Path:  {}", store_path.display());
    log::info!("  Files: {}", stats.files_removed);
    log::info!("  Freed: {}", format_bytes(stats.bytes_freed));
    crate::log_blank();
    log::info!("Run 'lamp-store build' to rebuild.");

    Ok(())
}
