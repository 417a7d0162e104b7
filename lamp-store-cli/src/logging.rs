//! Logger setup for the CLI.
//!
//! Info lines are printed bare so `log::info!` doubles as normal command
//! output. `--verbose` adds timestamps and levels; `--logfile` tees every
//! line into a file with ANSI codes stripped.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use env_logger::{Builder, Target};
use log::{Level, LevelFilter};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::CliError;

/// Writes to stdout and, optionally, a plain-text copy to a file.
struct TeeWriter {
    file: Option<File>,
}

impl Write for TeeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stdout().write_all(buf)?;
        if let Some(file) = self.file.as_mut() {
            file.write_all(&strip_ansi_escapes::strip(buf))?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()?;
        if let Some(file) = self.file.as_mut() {
            file.flush()?;
        }
        Ok(())
    }
}

pub(crate) fn level_filter(quiet: bool, verbose: bool) -> LevelFilter {
    if quiet {
        LevelFilter::Warn
    } else if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Install the global logger. `RUST_LOG` overrides the level chosen by flags.
pub(crate) fn init_logging(
    quiet: bool,
    verbose: bool,
    logfile: Option<&Path>,
) -> Result<(), CliError> {
    let file = match logfile {
        Some(path) => Some(File::create(path).map_err(|e| {
            CliError::config(format!("Cannot open log file {}: {}", path.display(), e))
        })?),
        None => None,
    };

    let mut builder = Builder::new();
    builder.filter_level(level_filter(quiet, verbose));
    builder.parse_default_env();
    builder.format(move |buf, record| {
        if verbose {
            return writeln!(
                buf,
                "{} {:<5} {}",
                buf.timestamp_millis(),
                record.level(),
                record.args()
            );
        }
        match record.level() {
            Level::Error => writeln!(
                buf,
                "{} {}",
                "error:".if_supports_color(Stdout, |t| t.red()),
                record.args()
            ),
            Level::Warn => writeln!(
                buf,
                "{} {}",
                "warning:".if_supports_color(Stdout, |t| t.yellow()),
                record.args()
            ),
            _ => writeln!(buf, "{}", record.args()),
        }
    });
    builder.target(Target::Pipe(Box::new(TeeWriter { file })));
    builder
        .try_init()
        .map_err(|e| CliError::other(format!("Logger already initialized: {}", e)))
}
