//! Terminal progress for resource imports.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use lamp_store_import::ImportProgress;
use lamp_store_model::Resource;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

/// Shows one bar per resource while its records are inserted.
pub(crate) struct CliImportProgress {
    bar: ProgressBar,
}

impl CliImportProgress {
    pub(crate) fn new(quiet: bool) -> Self {
        let bar = ProgressBar::hidden();
        if !quiet {
            bar.set_draw_target(ProgressDrawTarget::stderr());
        }
        let style = ProgressStyle::with_template("  {spinner:.cyan} {msg} [{bar:30}] {pos}/{len}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");
        bar.set_style(style);
        Self { bar }
    }
}

impl ImportProgress for CliImportProgress {
    fn on_record(&self, resource: Resource, current: usize, total: usize) {
        if current == 1 {
            self.bar.set_length(total as u64);
            self.bar.set_message(resource.label());
        }
        // Redrawing per record is wasted work on large verse sets
        if current.is_multiple_of(250) || current == total {
            self.bar.set_position(current as u64);
        }
    }

    fn on_phase(&self, message: &str) {
        self.bar.reset();
        log::debug!("{}", message);
    }

    fn on_complete(&self, message: &str) {
        self.bar.finish_and_clear();
        log::debug!(
            "  {} {}",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            message
        );
    }
}
