//! Command-line interface entry point for `proved-effectifs`

mod args;
mod commands;

use args::{Cli, Command};
use clap::Parser;
use proved_effectifs::config::Config;
use proved_effectifs::logger::{
    enable_debug, enable_verbose, init_file_logging, set_level, Level,
};
use proved_effectifs::{debug, info};

fn main() {
    let args = Cli::parse();

    // Load configuration once at startup and apply CLI overrides to it
    let mut config = Config::load();
    let defaults = Config::from_defaults();
    config.apply_overrides(&args.to_config_overrides());

    // CLI flag overrides config logging.level; fallback warn
    let mut level = args
        .log_level
        .map(Level::from)
        .or_else(|| Level::parse(&config.logging.level))
        .unwrap_or(Level::Warn);

    if args.debug_flag || level == Level::Debug {
        level = Level::Debug;
        enable_debug();
    }

    let verbose = args.verbose || config.logging.verbose;
    if verbose {
        enable_verbose();
    }
    set_level(level);

    // File logging: CLI flag wins, otherwise config logging.file if set
    let config_log_path = (!config.logging.file.is_empty())
        .then(|| std::path::PathBuf::from(&config.logging.file));

    if let Some(log_path) = args.log_file.as_ref().or(config_log_path.as_ref()) {
        let display_path = log_path.to_string_lossy();
        if init_file_logging(log_path) {
            info!("File logging initialized at: {display_path}");
        } else {
            eprintln!("✗ Failed to initialize file logging at: {display_path}");
        }
    }

    debug!(
        "effectifs v{} (level={level}, verbose={verbose}, db={})",
        proved_effectifs::get_version(),
        config.database.path
    );

    match args.command {
        Command::Config { subcommand } => {
            commands::config::run(subcommand, &mut config, &defaults);
        }
        Command::Save {
            unit,
            year,
            input_file,
        } => commands::effectifs::save(&unit, &year, &input_file, &config),
        Command::Previous { unit, year } => commands::effectifs::previous(&unit, &year, &config),
        Command::History { unit } => commands::effectifs::history(&unit, &config),
        Command::Show { unit, year } => commands::effectifs::show(&unit, &year, &config),
        Command::Growth {
            unit,
            year,
            input_file,
        } => commands::effectifs::growth(&unit, &year, input_file.as_deref(), &config),
        Command::Baseline { format } => commands::effectifs::baseline(format),
    }
}
