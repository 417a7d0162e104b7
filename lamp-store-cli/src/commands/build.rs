use std::io::IsTerminal;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use lamp_store_import::{BuildOptions, ImportProgress, LogProgress, ResourceOutcome, build_bundle};

use crate::CliError;
use crate::progress::CliImportProgress;
use crate::settings::ResolvedPaths;

use super::format_bytes;

/// Reset the working store, import every resource, and export the bundle.
pub(crate) fn run_build(paths: &ResolvedPaths, quiet: bool) -> Result<(), CliError> {
    if !paths.source_dir.is_dir() {
        log::warn!(
            "Source directory {} does not exist; every resource will be skipped",
            paths.source_dir.display()
        );
    }

    let opts = BuildOptions {
        source_dir: paths.source_dir.clone(),
        store_path: paths.store_path.clone(),
        output_path: paths.output_path(),
    };

    log::info!(
        "{}",
        format!("Building {} from {}", opts.output_path.display(), opts.source_dir.display())
            .if_supports_color(Stdout, |t| t.bold()),
    );
    log::debug!("Working store: {}", opts.store_path.display());

    // Bars only make sense on a terminal; redirected output gets log lines.
    let bar;
    let progress: &dyn ImportProgress = if std::io::stderr().is_terminal() {
        bar = CliImportProgress::new(quiet);
        &bar
    } else {
        &LogProgress
    };
    let report = build_bundle(&opts, Some(progress))?;

    for (resource, outcome) in &report.outcomes {
        match outcome {
            ResourceOutcome::Imported(stats) => log::info!(
                "  {} {:<18} {:>8} records",
                "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                resource.label(),
                stats.records,
            ),
            ResourceOutcome::Skipped(reason) => log::warn!(
                "  {} {:<18} skipped ({})",
                "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
                resource.label(),
                reason,
            ),
        }
    }

    crate::log_blank();
    log::info!(
        "{}",
        "Database creation completed".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("  Path: {}", report.export.path.display());
    log::info!("  Size: {}", format_bytes(report.export.bytes));
    if report.imported_count() < report.outcomes.len() {
        log::warn!(
            "{} of {} resources were skipped",
            report.outcomes.len() - report.imported_count(),
            report.outcomes.len()
        );
    }

    Ok(())
}
