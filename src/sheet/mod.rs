//! Character sheets: a read-only projection of finished characters plus the
//! catalog, rendered as plain text, printable HTML or CSV.

mod html;

use std::fmt::Write as _;

use serde::Serialize;

use crate::creation::Character;
use crate::data::{AbilityCatalog, AbilityCategory};

pub use html::render_html;

pub const SHEET_SUBTITLE: &str = "Gumshoe Investigator";
const UNNAMED: &str = "Unnamed Character";
const NOT_SPECIFIED: &str = "Not specified";
const NO_DESCRIPTION: &str = "No description available";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetRow {
    pub name: String,
    /// Subcategory, only looked up for investigative abilities.
    pub ability_type: String,
    pub rating: u32,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CharacterSheet {
    pub id: u32,
    pub title: String,
    pub subtitle: &'static str,
    pub motivation: String,
    pub background: String,
    pub investigative: Vec<SheetRow>,
    pub investigative_points_spent: u64,
    pub general: Vec<SheetRow>,
    pub general_points_spent: u64,
}

impl CharacterSheet {
    pub fn rows(&self, category: AbilityCategory) -> &[SheetRow] {
        match category {
            AbilityCategory::Investigative => &self.investigative,
            AbilityCategory::General => &self.general,
        }
    }

    pub fn points_spent(&self, category: AbilityCategory) -> u64 {
        match category {
            AbilityCategory::Investigative => self.investigative_points_spent,
            AbilityCategory::General => self.general_points_spent,
        }
    }
}

/// Summary card shown in the roster overview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterCard {
    pub id: u32,
    pub title: String,
    pub motivation: String,
    pub investigative_abilities: usize,
    pub general_abilities: usize,
}

fn or_placeholder(value: &str, placeholder: &str) -> String {
    if value.trim().is_empty() {
        placeholder.to_string()
    } else {
        value.to_string()
    }
}

fn rows_for(
    character: &Character,
    catalog: &AbilityCatalog,
    category: AbilityCategory,
) -> Vec<SheetRow> {
    character
        .ledger(category)
        .iter()
        .map(|(name, rating)| {
            let record = catalog.find(category, name);
            let ability_type = match category {
                AbilityCategory::Investigative => {
                    record.map(|r| r.ability_type.clone()).unwrap_or_default()
                }
                AbilityCategory::General => String::new(),
            };
            let description = record
                .map(|r| r.description.as_str())
                .filter(|d| !d.trim().is_empty())
                .unwrap_or(NO_DESCRIPTION)
                .to_string();
            SheetRow {
                name: name.to_string(),
                ability_type,
                rating,
                description,
            }
        })
        .collect()
}

pub fn project(character: &Character, catalog: &AbilityCatalog) -> CharacterSheet {
    CharacterSheet {
        id: character.id,
        title: or_placeholder(&character.name, UNNAMED),
        subtitle: SHEET_SUBTITLE,
        motivation: or_placeholder(&character.motivation, NOT_SPECIFIED),
        background: or_placeholder(&character.background, NOT_SPECIFIED),
        investigative: rows_for(character, catalog, AbilityCategory::Investigative),
        investigative_points_spent: character.investigative_points_spent(),
        general: rows_for(character, catalog, AbilityCategory::General),
        general_points_spent: character.general_points_spent(),
    }
}

pub fn project_roster(roster: &[Character], catalog: &AbilityCatalog) -> Vec<CharacterSheet> {
    roster.iter().map(|c| project(c, catalog)).collect()
}

pub fn roster_cards(roster: &[Character]) -> Vec<RosterCard> {
    roster
        .iter()
        .map(|character| RosterCard {
            id: character.id,
            title: character.display_name(),
            motivation: or_placeholder(&character.motivation, NOT_SPECIFIED),
            investigative_abilities: character.investigative.len(),
            general_abilities: character.general.len(),
        })
        .collect()
}

pub fn render_text(sheets: &[CharacterSheet]) -> String {
    let mut out = String::new();
    for (index, sheet) in sheets.iter().enumerate() {
        if index > 0 {
            out.push_str("\n\u{c}\n");
        }
        write_text_sheet(&mut out, sheet);
    }
    out
}

fn write_text_sheet(out: &mut String, sheet: &CharacterSheet) {
    let _ = writeln!(out, "{}", sheet.title);
    let _ = writeln!(out, "{}", sheet.subtitle);
    let _ = writeln!(out, "{}", "=".repeat(sheet.title.chars().count().max(20)));
    let _ = writeln!(out, "Motivation: {}", sheet.motivation);
    let _ = writeln!(out, "Background: {}", sheet.background);

    for category in AbilityCategory::ALL {
        let rows = sheet.rows(category);
        let _ = writeln!(
            out,
            "\n{} Abilities ({} points spent)",
            category.label(),
            sheet.points_spent(category)
        );
        if rows.is_empty() {
            let _ = writeln!(out, "  No {category} abilities selected");
            continue;
        }
        for row in rows {
            if row.ability_type.is_empty() {
                let _ = writeln!(out, "  {:<28} {:>3}", row.name, row.rating);
            } else {
                let _ = writeln!(
                    out,
                    "  {:<28} {:>3}  [{}]",
                    row.name, row.rating, row.ability_type
                );
            }
        }
    }

    if sheet.investigative.is_empty() && sheet.general.is_empty() {
        return;
    }
    let _ = writeln!(out, "\nAbility Descriptions");
    for category in AbilityCategory::ALL {
        for row in sheet.rows(category) {
            let _ = writeln!(out, "  {}: {}", row.name, row.description);
        }
    }
}

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    character_id: u32,
    character: &'a str,
    category: &'static str,
    ability: &'a str,
    ability_type: &'a str,
    rating: u32,
}

/// One CSV row per rated ability across all sheets.
pub fn export_csv(sheets: &[CharacterSheet]) -> Result<String, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for sheet in sheets {
        for category in AbilityCategory::ALL {
            for row in sheet.rows(category) {
                writer.serialize(CsvRow {
                    character_id: sheet.id,
                    character: &sheet.title,
                    category: category.as_str(),
                    ability: &row.name,
                    ability_type: &row.ability_type,
                    rating: row.rating,
                })?;
            }
        }
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| csv::Error::from(err.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::catalog::parse_catalog;
    use crate::data::CatalogSource;

    fn catalog() -> AbilityCatalog {
        AbilityCatalog::new(
            CatalogSource::All,
            parse_catalog(
                "t.json",
                r#"[{"ability_category":"investigative","ability_name":"Law","ability_type":"Academic","description":"Statutes and precedent."},
                    {"ability_category":"general","ability_name":"Law","ability_type":"Odd","description":"General law."},
                    {"ability_category":"general","ability_name":"Athletics","description":""}]"#,
            )
            .unwrap(),
        )
    }

    fn ada() -> Character {
        let mut character = Character::new(1);
        character.name = "Ada".to_string();
        character.set_rating(AbilityCategory::Investigative, "Law", 2);
        character.set_rating(AbilityCategory::General, "Law", 1);
        character.set_rating(AbilityCategory::General, "Athletics", 8);
        character.set_rating(AbilityCategory::General, "Sense Trouble", 4);
        character
    }

    #[test]
    fn projection_looks_up_within_category() {
        let sheet = project(&ada(), &catalog());
        assert_eq!(sheet.title, "Ada");
        assert_eq!(sheet.motivation, "Not specified");
        assert_eq!(sheet.investigative[0].ability_type, "Academic");
        assert_eq!(sheet.investigative[0].description, "Statutes and precedent.");
        assert_eq!(sheet.investigative_points_spent, 2);

        let general_law = sheet.general.iter().find(|r| r.name == "Law").unwrap();
        assert_eq!(general_law.description, "General law.");
        assert_eq!(general_law.ability_type, "", "general rows carry no type");
        assert_eq!(sheet.general_points_spent, 13);
    }

    #[test]
    fn missing_descriptions_get_placeholder() {
        let sheet = project(&ada(), &catalog());
        for name in ["Athletics", "Sense Trouble"] {
            let row = sheet.general.iter().find(|r| r.name == name).unwrap();
            assert_eq!(row.description, "No description available");
        }
    }

    #[test]
    fn unnamed_character_placeholders() {
        let sheet = project(&Character::new(3), &catalog());
        assert_eq!(sheet.title, "Unnamed Character");
        let text = render_text(&[sheet]);
        assert!(text.contains("No investigative abilities selected"));
        assert!(!text.contains("Ability Descriptions"));

        let cards = roster_cards(&[Character::new(3)]);
        assert_eq!(cards[0].title, "Character 3");
    }

    #[test]
    fn text_lists_ratings_and_types() {
        let text = render_text(&[project(&ada(), &catalog())]);
        assert!(text.contains("Investigative Abilities (2 points spent)"));
        assert!(text.contains("[Academic]"));
        assert!(text.contains("General Abilities (13 points spent)"));
    }

    #[test]
    fn csv_has_one_row_per_rating() {
        let csv = export_csv(&[project(&ada(), &catalog())]).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 5, "header plus four ratings");
        assert!(lines[0].starts_with("character_id,character,category,ability"));
        assert!(lines[1].contains("investigative,Law,Academic,2"));
    }
}
