use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::{data_dir_from_env, AppConfig};
use crate::creation::{CharacterDraft, Wizard};
use crate::data::catalog::{self, AbilityCatalog};
use crate::data::validate::{validate_catalog_file, validate_data_dir, ValidationSeverity};
use crate::rules::build_points::is_valid_player_count;
use crate::server;
use crate::server::api::{render_sheets, BudgetResponse, SheetFormat};

const USAGE: &str = "usage: gumshoe <serve|files|catalog|budget|validate|sheets>";

#[derive(Debug, Clone, Copy)]
enum Command {
    Serve,
    Files,
    Catalog,
    Budget,
    Validate,
    Sheets,
}

fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("serve") => Some(Command::Serve),
        Some("files") => Some(Command::Files),
        Some("catalog") => Some(Command::Catalog),
        Some("budget") => Some(Command::Budget),
        Some("validate") => Some(Command::Validate),
        Some("sheets") => Some(Command::Sheets),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    match parse_command(args) {
        Some(Command::Serve) => handle_serve(),
        Some(Command::Files) => handle_files(),
        Some(Command::Catalog) => handle_catalog(args),
        Some(Command::Budget) => handle_budget(args),
        Some(Command::Validate) => handle_validate(args),
        Some(Command::Sheets) => handle_sheets(args),
        None => {
            eprintln!("{USAGE}");
            2
        }
    }
}

fn print_json(value: &impl Serialize) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize output: {err}");
            1
        }
    }
}

fn handle_serve() -> i32 {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("config error: {err}");
            return 2;
        }
    };
    match server::run_server(config) {
        Ok(()) => 0,
        Err(err) => {
            tracing::error!(error = %err, "server error");
            eprintln!("server error: {err}");
            1
        }
    }
}

fn handle_files() -> i32 {
    match catalog::list_catalog_files(data_dir_from_env()) {
        Ok(files) => print_json(&files),
        Err(err) => {
            eprintln!("{err}");
            1
        }
    }
}

/// `catalog [file]`: one file's records, or every file when omitted.
fn handle_catalog(args: &[String]) -> i32 {
    match catalog::load_selection(data_dir_from_env(), args.get(2).map(String::as_str)) {
        Ok(loaded) => print_json(&loaded.records),
        Err(err) => {
            eprintln!("{err}");
            1
        }
    }
}

fn handle_budget(args: &[String]) -> i32 {
    let Some(raw) = args.get(2) else {
        eprintln!("usage: gumshoe budget <players> [abilities-file]");
        return 2;
    };
    let players = match raw.parse::<u32>() {
        Ok(players) if is_valid_player_count(players) => players,
        _ => {
            eprintln!("invalid players '{raw}', expected 1-6");
            return 2;
        }
    };
    let loaded = match catalog::load_selection(data_dir_from_env(), args.get(3).map(String::as_str))
    {
        Ok(loaded) => loaded,
        Err(err) => {
            eprintln!("{err}");
            return 1;
        }
    };

    print_json(&BudgetResponse::new(players, loaded.investigative_count()))
}

fn handle_validate(args: &[String]) -> i32 {
    let dir = data_dir_from_env();
    let result = match args.get(2) {
        Some(file) => validate_catalog_file(&dir, file),
        None => validate_data_dir(&dir),
    };
    let report = match result {
        Ok(report) => report,
        Err(err) => {
            eprintln!("{err}");
            return 1;
        }
    };

    for diagnostic in &report.diagnostics {
        eprintln!("- {diagnostic}");
    }
    if report.has_errors() {
        eprintln!(
            "validation failed: {} error(s), {} warning(s)",
            report.count(ValidationSeverity::Error),
            report.count(ValidationSeverity::Warning)
        );
        1
    } else {
        println!(
            "validation passed: {} ({} warning(s))",
            dir.display(),
            report.count(ValidationSeverity::Warning)
        );
        0
    }
}

/// Roster plan consumed by `gumshoe sheets`.
#[derive(Debug, Deserialize)]
struct RosterPlan {
    #[serde(default)]
    abilities_file: Option<String>,
    characters: Vec<CharacterDraft>,
}

fn handle_sheets(args: &[String]) -> i32 {
    let Some(path) = args.get(2) else {
        eprintln!("usage: gumshoe sheets <roster.json> [--text|--html|--csv|--json]");
        return 2;
    };
    let format = if args.iter().any(|a| a == "--html") {
        SheetFormat::Html
    } else if args.iter().any(|a| a == "--csv") {
        SheetFormat::Csv
    } else if args.iter().any(|a| a == "--json") {
        SheetFormat::Json
    } else {
        SheetFormat::Text
    };

    match build_roster_sheets(Path::new(path), &data_dir_from_env(), format) {
        Ok(output) => {
            print!("{output}");
            0
        }
        Err(message) => {
            eprintln!("{message}");
            1
        }
    }
}

/// Run a roster plan through the wizard exactly as the server would, then render.
fn build_roster_sheets(path: &Path, data_dir: &Path, format: SheetFormat) -> Result<String, String> {
    let raw = fs::read_to_string(path)
        .map_err(|err| format!("unable to read '{}': {err}", path.display()))?;
    let plan: RosterPlan = serde_json::from_str(&raw)
        .map_err(|err| format!("unable to parse '{}': {err}", path.display()))?;

    let loaded: AbilityCatalog = catalog::load_selection(data_dir, plan.abilities_file.as_deref())
        .map_err(|err| err.to_string())?;

    let players = u32::try_from(plan.characters.len()).unwrap_or(u32::MAX);
    let mut wizard = Wizard::new();
    wizard
        .setup(players, loaded.investigative_count())
        .map_err(|err| err.to_string())?;
    for draft in &plan.characters {
        wizard
            .current_character_mut()
            .map_err(|err| err.to_string())?
            .apply_draft(draft)
            .map_err(|err| err.to_string())?;
        wizard.advance().map_err(|err| err.to_string())?;
    }

    let roster = wizard.sheets().map_err(|err| err.to_string())?;
    render_sheets(roster, &loaded, format).map_err(|err| err.to_string())
}
