//! Effectif command handlers
//!
//! Each handler opens the configured database, runs one service operation
//! and prints the resulting document as JSON on stdout.

use proved_effectifs::config::Config;
use proved_effectifs::core::defaults::{BaselineSynthesizer, DefaultEffectifSynthesizer};
use proved_effectifs::core::store::SqliteEffectifStore;
use proved_effectifs::models::{EffectifTree, SchoolYear, UnitRef};
use proved_effectifs::{error, info, verbose, EffectifError, EffectifService};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::args::DocumentFormat;

type Service = EffectifService<SqliteEffectifStore>;

/// Save a tree document for (unit, year)
pub fn save(unit: &str, year: &str, input_file: &Path, config: &Config) {
    finish(handle_save(unit, year, input_file, config));
}

/// Print last year's effectifs for (unit, year)
pub fn previous(unit: &str, year: &str, config: &Config) {
    finish(handle_previous(unit, year, config));
}

/// Print the history of a unit
pub fn history(unit: &str, config: &Config) {
    finish(handle_history(unit, config));
}

/// Print the stored record of (unit, year)
pub fn show(unit: &str, year: &str, config: &Config) {
    finish(handle_show(unit, year, config));
}

/// Print growth rates of (unit, year) against the year before
pub fn growth(unit: &str, year: &str, input_file: Option<&Path>, config: &Config) {
    finish(handle_growth(unit, year, input_file, config));
}

/// Print the default baseline tree
pub fn baseline(format: DocumentFormat) {
    let tree = BaselineSynthesizer.generate();
    let rendered = match format {
        DocumentFormat::Json => serde_json::to_string_pretty(&tree).map_err(|e| e.to_string()),
        DocumentFormat::Toml => tree.to_toml_string().map_err(|e| e.to_string()),
    };
    finish(rendered.map(|document| println!("{document}")));
}

fn finish(result: Result<(), String>) {
    if let Err(err) = result {
        eprintln!("✗ {err}");
        std::process::exit(1);
    }
}

fn open_service(config: &Config) -> Result<Service, String> {
    let path = PathBuf::from(&config.database.path);
    let store = SqliteEffectifStore::open(&path, config.database.busy_timeout()).map_err(|e| {
        error!("Failed to open effectif database {}: {e}", path.display());
        format!("Failed to open effectif database {}: {e}", path.display())
    })?;
    info!("Effectif database opened: {}", path.display());
    Ok(EffectifService::new(store))
}

fn parse_key(unit: &str, year: &str) -> Result<(UnitRef, SchoolYear), String> {
    let unit = UnitRef::new(unit).map_err(|e| e.to_string())?;
    let year = year.parse::<SchoolYear>().map_err(|e| e.to_string())?;
    Ok((unit, year))
}

/// Read a tree document; `.json` files are JSON, anything else TOML.
fn read_tree(input_file: &Path) -> Result<EffectifTree, String> {
    let content = std::fs::read_to_string(input_file)
        .map_err(|e| format!("Failed to read {}: {e}", input_file.display()))?;

    let is_json = input_file
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let tree = if is_json {
        EffectifTree::from_json_str(&content)
    } else {
        EffectifTree::from_toml_str(&content)
    };

    tree.map_err(|e| format!("{}: {e}", input_file.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<(), String> {
    let document = serde_json::to_string_pretty(value).map_err(|e| e.to_string())?;
    println!("{document}");
    Ok(())
}

fn describe(err: &EffectifError) -> String {
    if err.is_retryable() {
        format!("{err} (retry later)")
    } else {
        err.to_string()
    }
}

fn handle_save(unit: &str, year: &str, input_file: &Path, config: &Config) -> Result<(), String> {
    let (unit, year) = parse_key(unit, year)?;
    let tree = read_tree(input_file)?;
    let service = open_service(config)?;

    let record = service
        .save_effectifs(&unit, year, &tree)
        .map_err(|e| describe(&e))?;

    let totals = record.tree.totals();
    verbose!(
        "✓ Saved effectifs for {} ({}): {} pupils",
        record.unit,
        record.year,
        totals.grand_total()
    );
    print_json(&record)
}

fn handle_previous(unit: &str, year: &str, config: &Config) -> Result<(), String> {
    let (unit, year) = parse_key(unit, year)?;
    let service = open_service(config)?;

    let previous = service
        .get_previous_year_effectifs(&unit, year)
        .map_err(|e| describe(&e))?;

    verbose!("{}", previous.message);
    print_json(&previous)
}

fn handle_history(unit: &str, config: &Config) -> Result<(), String> {
    let unit = UnitRef::new(unit).map_err(|e| e.to_string())?;
    let service = open_service(config)?;

    let history = service.get_history(&unit).map_err(|e| describe(&e))?;

    for record in &history {
        verbose!(
            "  {}  {} pupils (updated {})",
            record.year,
            record.tree.totals().grand_total(),
            record.updated_at.to_rfc3339()
        );
    }
    print_json(&history)
}

fn handle_show(unit: &str, year: &str, config: &Config) -> Result<(), String> {
    let (unit, year) = parse_key(unit, year)?;
    let service = open_service(config)?;

    match service.get_effectifs(&unit, year).map_err(|e| describe(&e))? {
        Some(record) => print_json(&record),
        None => Err(EffectifError::MissingRecord {
            unit: unit.to_string(),
            year: year.to_string(),
        }
        .to_string()),
    }
}

fn handle_growth(
    unit: &str,
    year: &str,
    input_file: Option<&Path>,
    config: &Config,
) -> Result<(), String> {
    let (unit, year) = parse_key(unit, year)?;
    let current = input_file.map(read_tree).transpose()?;
    let service = open_service(config)?;

    let comparison = service
        .compare_with_previous_year(&unit, year, current.as_ref())
        .map_err(|e| describe(&e))?;

    if comparison.previous.is_default {
        verbose!("! {}", comparison.previous.message);
    }
    print_json(&comparison)
}
