use std::collections::BTreeMap;

use axum::extract::Query;
use axum::http::Uri;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::creation::{
    usage_for, AbilityUsage, Character, CharacterDraft, CompletionIssue, WizardError, WizardStep,
};
use crate::data::catalog::{self, AbilityCatalog, CatalogError, CatalogSource};
use crate::data::{AbilityCategory, AbilityRecord};
use crate::rules::build_points::{is_valid_player_count, MAX_PLAYERS, MIN_PLAYERS};
use crate::rules::{rating_from_input, BuildPoints, PointsPolicy, RatingOutOfRange, ACTIVE_POLICY};
use crate::server::session::{AppState, Session};
use crate::sheet::{self, CharacterSheet, RosterCard};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid request body: {0}")]
    Body(#[from] serde_json::Error),
    #[error("Invalid request: {0}")]
    Request(String),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Wizard(#[from] WizardError),
    #[error(transparent)]
    Rating(#[from] RatingOutOfRange),
    #[error("cannot {action} '{ability}': {reason}")]
    StepRefused {
        action: &'static str,
        ability: String,
        reason: &'static str,
    },
    #[error("no character {0} in the roster")]
    CharacterNotFound(usize),
    #[error("failed to render sheets: {0}")]
    Render(#[from] csv::Error),
}

impl ApiError {
    pub fn status(&self) -> u16 {
        match self {
            Self::Body(_) | Self::Request(_) | Self::Rating(_) => 400,
            Self::StepRefused { .. } => 409,
            Self::CharacterNotFound(_) => 404,
            Self::Catalog(CatalogError::InvalidFileName(_)) => 400,
            Self::Catalog(err) if err.is_not_found() => 404,
            Self::Catalog(_) | Self::Render(_) => 500,
            Self::Wizard(WizardError::InvalidPlayerCount(_)) => 400,
            Self::Wizard(WizardError::IncompleteCharacter { .. }) => 422,
            Self::Wizard(_) => 409,
        }
    }

    /// Completion problems, when the error is a blocked advance.
    pub fn issues(&self) -> Option<&[CompletionIssue]> {
        match self {
            Self::Wizard(WizardError::IncompleteCharacter { issues, .. }) => Some(issues),
            _ => None,
        }
    }
}

fn query<T: for<'de> Deserialize<'de>>(path: &str) -> Result<T, ApiError> {
    let uri: Uri = path
        .parse()
        .map_err(|err| ApiError::Request(format!("{err}")))?;
    Query::<T>::try_from_uri(&uri)
        .map(|Query(q)| q)
        .map_err(|err| ApiError::Request(err.body_text()))
}

/// Empty bodies deserialize as `{}` so optional-only requests can be sent bare.
fn body<T: for<'de> Deserialize<'de>>(raw: &str) -> Result<T, ApiError> {
    let raw = if raw.trim().is_empty() { "{}" } else { raw };
    Ok(serde_json::from_str(raw)?)
}

pub fn health_payload() -> Result<String, ApiError> {
    Ok(serde_json::to_string_pretty(&serde_json::json!({
        "status": "ok",
        "service": "gumshoe-api",
        "version": env!("CARGO_PKG_VERSION")
    }))?)
}

#[derive(Debug, Default, Deserialize)]
struct FileQuery {
    file: Option<String>,
}

/// `GET /api/abilities`: file list, or one file's records with `?file=`.
pub fn abilities_payload(state: &AppState, path: &str) -> Result<String, ApiError> {
    let FileQuery { file } = query(path)?;
    match file.as_deref().map(str::trim).filter(|f| !f.is_empty()) {
        Some(file) => {
            let records = catalog::load_catalog_file(&state.config.data_dir, file)?;
            Ok(serde_json::to_string_pretty(&records)?)
        }
        None => {
            let files = catalog::list_catalog_files(&state.config.data_dir)?;
            Ok(serde_json::to_string_pretty(&files)?)
        }
    }
}

/// All catalog files concatenated; broken files are skipped and logged.
pub fn load_all_payload(state: &AppState) -> Result<String, ApiError> {
    let report = catalog::load_all(&state.config.data_dir)?;
    let records: Vec<AbilityRecord> = report.records;
    Ok(serde_json::to_string_pretty(&records)?)
}

#[derive(Debug, Deserialize)]
struct BudgetQuery {
    players: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct BudgetResponse {
    pub players: u32,
    pub policy: PointsPolicy,
    pub investigative_abilities: usize,
    pub investigative: u32,
    pub general: u32,
}

impl BudgetResponse {
    pub fn new(players: u32, investigative_abilities: usize) -> Self {
        let budget = BuildPoints::for_party(players, investigative_abilities);
        Self {
            players,
            policy: ACTIVE_POLICY,
            investigative_abilities,
            investigative: budget.investigative,
            general: budget.general,
        }
    }
}

pub fn budget_payload(state: &AppState, path: &str) -> Result<String, ApiError> {
    let BudgetQuery { players } = query(path)?;
    let players = players.ok_or_else(|| ApiError::Request("players is required".to_string()))?;
    if !is_valid_player_count(players) {
        return Err(ApiError::Request(format!(
            "players must be between {MIN_PLAYERS} and {MAX_PLAYERS}"
        )));
    }
    let investigative_abilities = state.session().catalog.investigative_count();
    Ok(serde_json::to_string_pretty(&BudgetResponse::new(
        players,
        investigative_abilities,
    ))?)
}

#[derive(Debug, Serialize)]
struct CatalogSummary<'a> {
    source: &'a CatalogSource,
    total: usize,
    investigative: usize,
    general: usize,
}

#[derive(Debug, Serialize)]
struct Remaining {
    investigative: i64,
    general: i64,
}

#[derive(Debug, Serialize)]
struct CurrentCharacter<'a> {
    index: usize,
    character_number: usize,
    is_last: bool,
    character: &'a Character,
    remaining: Remaining,
    can_complete: bool,
    issues: Vec<CompletionIssue>,
}

#[derive(Debug, Serialize)]
struct SessionView<'a> {
    status: &'static str,
    session_id: String,
    started_at: String,
    #[serde(flatten)]
    step: WizardStep,
    player_count: usize,
    budgets: Option<BuildPoints>,
    current: Option<CurrentCharacter<'a>>,
    roster: &'a [Character],
    catalog: CatalogSummary<'a>,
    catalog_error: Option<&'a str>,
}

fn session_view(session: &Session) -> SessionView<'_> {
    let wizard = &session.wizard;
    let current = match (wizard.current_index(), wizard.budgets()) {
        (Some(index), Some(budgets)) => {
            let character = &wizard.roster()[index];
            let issues = character.completion_issues(&budgets);
            Some(CurrentCharacter {
                index,
                character_number: index + 1,
                is_last: index + 1 == wizard.player_count(),
                character,
                remaining: Remaining {
                    investigative: character.investigative.remaining(budgets.investigative),
                    general: character.general.remaining(budgets.general),
                },
                can_complete: issues.is_empty(),
                issues,
            })
        }
        _ => None,
    };

    SessionView {
        status: "ok",
        session_id: session.id.to_string(),
        started_at: session.started_at.to_rfc3339(),
        step: wizard.step(),
        player_count: wizard.player_count(),
        budgets: wizard.budgets(),
        current,
        roster: wizard.roster(),
        catalog: CatalogSummary {
            source: &session.catalog.source,
            total: session.catalog.len(),
            investigative: session.catalog.investigative_count(),
            general: session.catalog.general().count(),
        },
        catalog_error: session.catalog_error.as_deref(),
    }
}

fn session_json(session: &Session) -> Result<String, ApiError> {
    Ok(serde_json::to_string_pretty(&session_view(session))?)
}

pub fn session_payload(state: &AppState) -> Result<String, ApiError> {
    session_json(&state.session())
}

#[derive(Debug, Default, Deserialize)]
struct CatalogRequest {
    file: Option<String>,
}

/// Catalog selection belongs to setup; once a roster exists its budgets are fixed.
pub fn select_catalog_payload(state: &AppState, raw: &str) -> Result<String, ApiError> {
    let request: CatalogRequest = body(raw)?;
    let mut session = state.session();
    if session.wizard.step() != WizardStep::Setup {
        return Err(WizardError::WrongStep {
            action: "select catalog",
            expected: "setup",
            actual: session.wizard.step().name(),
        }
        .into());
    }
    let file = request.file.as_deref().map(str::trim).filter(|f| !f.is_empty());
    session.select_catalog(&state.config.data_dir, file)?;
    session_json(&session)
}

#[derive(Debug, Deserialize)]
struct SetupRequest {
    players: u32,
}

pub fn setup_payload(state: &AppState, raw: &str) -> Result<String, ApiError> {
    let request: SetupRequest = serde_json::from_str(raw)?;
    let mut session = state.session();
    let investigative_count = session.catalog.investigative_count();
    session.wizard.setup(request.players, investigative_count)?;
    session_json(&session)
}

pub fn update_character_payload(state: &AppState, raw: &str) -> Result<String, ApiError> {
    let draft: CharacterDraft = body(raw)?;
    let mut session = state.session();
    session.wizard.current_character_mut()?.apply_draft(&draft)?;
    session_json(&session)
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum StepAction {
    Increase,
    Decrease,
}

#[derive(Debug, Deserialize)]
struct RatingRequest {
    category: AbilityCategory,
    ability: String,
    #[serde(default)]
    rating: Option<i64>,
    #[serde(default)]
    action: Option<StepAction>,
}

pub fn set_rating_payload(state: &AppState, raw: &str) -> Result<String, ApiError> {
    let request: RatingRequest = serde_json::from_str(raw)?;
    let ability = request.ability.trim();
    if ability.is_empty() {
        return Err(ApiError::Request("ability must not be empty".to_string()));
    }

    let mut session = state.session();
    let budget = session
        .wizard
        .budgets()
        .map(|b| b.for_category(request.category))
        .unwrap_or(0);
    let ledger = session
        .wizard
        .current_character_mut()?
        .ledger_mut(request.category);
    match (request.action, request.rating) {
        (Some(StepAction::Increase), _) => {
            if !ledger.increase(ability, budget) {
                return Err(ApiError::StepRefused {
                    action: "increase",
                    ability: ability.to_string(),
                    reason: "no build points remain",
                });
            }
        }
        (Some(StepAction::Decrease), _) => {
            if !ledger.decrease(ability) {
                return Err(ApiError::StepRefused {
                    action: "decrease",
                    ability: ability.to_string(),
                    reason: "the rating is already 0",
                });
            }
        }
        (None, Some(rating)) => ledger.set_rating(ability, rating_from_input(rating)?),
        (None, None) => {
            return Err(ApiError::Request(
                "either rating or action is required".to_string(),
            ))
        }
    }
    session_json(&session)
}

pub fn next_payload(state: &AppState) -> Result<String, ApiError> {
    let mut session = state.session();
    session.wizard.advance()?;
    session_json(&session)
}

pub fn back_payload(state: &AppState) -> Result<String, ApiError> {
    let mut session = state.session();
    session.wizard.back()?;
    session_json(&session)
}

pub fn edit_payload(state: &AppState) -> Result<String, ApiError> {
    let mut session = state.session();
    session.wizard.edit_again()?;
    session_json(&session)
}

pub fn reset_payload(state: &AppState) -> Result<String, ApiError> {
    let mut session = state.session();
    session.start_over();
    session_json(&session)
}

#[derive(Debug, Deserialize)]
struct UsageQuery {
    category: Option<AbilityCategory>,
}

#[derive(Debug, Serialize)]
struct UsageResponse {
    category: AbilityCategory,
    character_number: usize,
    also_chosen_by: BTreeMap<String, Vec<AbilityUsage>>,
}

pub fn usage_payload(state: &AppState, path: &str) -> Result<String, ApiError> {
    let UsageQuery { category } = query(path)?;
    let category = category.unwrap_or(AbilityCategory::Investigative);
    let session = state.session();
    let wizard = &session.wizard;
    wizard.current_character()?;
    let index = wizard.current_index().unwrap_or_default();
    Ok(serde_json::to_string_pretty(&UsageResponse {
        category,
        character_number: index + 1,
        also_chosen_by: usage_for(wizard.roster(), index, category),
    })?)
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SheetFormat {
    #[default]
    Json,
    Text,
    Html,
    Csv,
}

impl SheetFormat {
    pub fn content_type(self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Text => "text/plain; charset=utf-8",
            Self::Html => "text/html; charset=utf-8",
            Self::Csv => "text/csv; charset=utf-8",
        }
    }
}

#[derive(Debug, Deserialize)]
struct SheetsQuery {
    #[serde(default)]
    format: SheetFormat,
    /// 1-based roster position; the whole roster when absent.
    #[serde(default)]
    character: Option<usize>,
}

#[derive(Debug, Serialize)]
struct SheetsResponse {
    status: &'static str,
    cards: Vec<RosterCard>,
    sheets: Vec<CharacterSheet>,
}

/// Render a roster in the requested format.
pub fn render_sheets(
    roster: &[Character],
    catalog: &AbilityCatalog,
    format: SheetFormat,
) -> Result<String, ApiError> {
    let sheets = sheet::project_roster(roster, catalog);
    match format {
        SheetFormat::Json => Ok(serde_json::to_string_pretty(&SheetsResponse {
            status: "ok",
            cards: sheet::roster_cards(roster),
            sheets,
        })?),
        SheetFormat::Text => Ok(sheet::render_text(&sheets)),
        SheetFormat::Html => Ok(sheet::render_html(&sheets)),
        SheetFormat::Csv => Ok(sheet::export_csv(&sheets)?),
    }
}

pub fn sheets_payload(state: &AppState, path: &str) -> Result<(SheetFormat, String), ApiError> {
    let SheetsQuery { format, character } = query(path)?;
    let session = state.session();
    let roster = session.wizard.sheets()?;
    let selected = match character {
        Some(number) => number
            .checked_sub(1)
            .and_then(|index| roster.get(index..=index))
            .ok_or(ApiError::CharacterNotFound(number))?,
        None => roster,
    };
    let body = render_sheets(selected, &session.catalog, format)?;
    Ok((format, body))
}
