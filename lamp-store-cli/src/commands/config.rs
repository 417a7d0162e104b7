use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use lamp_store_model::Resource;

use crate::settings::{ResolvedPaths, settings_path};

/// Show the settings file location and the paths a build would use.
pub(crate) fn run_config_show(paths: &ResolvedPaths) {
    let settings = settings_path();

    log::info!(
        "{}",
        "lamp-store Configuration".if_supports_color(Stdout, |t| t.bold()),
    );
    crate::log_blank();

    let status = if settings.exists() {
        "(exists)".if_supports_color(Stdout, |t| t.green()).to_string()
    } else {
        "(not found)".if_supports_color(Stdout, |t| t.dimmed()).to_string()
    };
    log::info!(
        "  Settings file: {} {}",
        settings.display().if_supports_color(Stdout, |t| t.cyan()),
        status,
    );
    crate::log_blank();

    log::info!("  source_dir:  {}", paths.source_dir.display());
    log::info!("  store_path:  {}", paths.store_path.display());
    log::info!("  output_dir:  {}", paths.output_dir.display());
    log::info!("  file_name:   {}", paths.file_name);
    crate::log_blank();

    log::info!("{}", "Resources".if_supports_color(Stdout, |t| t.bold()));
    for resource in Resource::ALL {
        let path = resource.path_in(&paths.source_dir);
        let mark = if path.is_file() {
            "\u{2714}".if_supports_color(Stdout, |t| t.green()).to_string()
        } else {
            "\u{2718}".if_supports_color(Stdout, |t| t.red()).to_string()
        };
        log::info!("  {} {}", mark, path.display());
    }
}
