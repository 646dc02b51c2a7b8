use std::fmt::Write as _;

use super::{CharacterSheet, SheetRow};
use crate::data::AbilityCategory;

const PRINT_CSS: &str = r#"
    body { font-family: Georgia, serif; max-width: 860px; margin: 24px auto; padding: 0 12px; color: #222; }
    .sheet { margin-bottom: 48px; }
    .sheet + .sheet { page-break-before: always; break-before: page; }
    h1 { text-align: center; margin-bottom: 0; }
    .subtitle { text-align: center; color: #666; margin-top: 4px; }
    table { width: 100%; border-collapse: collapse; margin: 8px 0 16px; }
    th, td { border: 1px solid #bbb; padding: 4px 8px; text-align: left; }
    td.rating { text-align: center; font-weight: bold; }
    .empty { font-style: italic; color: #777; }
    .desc { border-left: 4px solid #4a74c9; padding-left: 10px; margin: 6px 0; }
    .desc.general { border-left-color: #3c9a5f; }
    @media print { body { margin: 0; max-width: none; } }
"#;

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Printable document with one sheet per page.
pub fn render_html(sheets: &[CharacterSheet]) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        "<!doctype html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\" />\n<title>Character Sheets</title>\n<style>{PRINT_CSS}</style>\n</head>\n<body>\n"
    );
    for sheet in sheets {
        write_sheet(&mut out, sheet);
    }
    out.push_str("</body>\n</html>\n");
    out
}

fn write_sheet(out: &mut String, sheet: &CharacterSheet) {
    let _ = writeln!(out, "<section class=\"sheet\" id=\"character-{}\">", sheet.id);
    let _ = writeln!(out, "<h1>{}</h1>", escape(&sheet.title));
    let _ = writeln!(out, "<p class=\"subtitle\">{}</p>", sheet.subtitle);
    let _ = writeln!(out, "<h2>Character Details</h2>");
    let _ = writeln!(
        out,
        "<h3>Motivation</h3><p>{}</p>\n<h3>Background</h3><p>{}</p>",
        escape(&sheet.motivation),
        escape(&sheet.background)
    );

    for category in AbilityCategory::ALL {
        write_ability_table(out, category, sheet.rows(category), sheet.points_spent(category));
    }

    if !sheet.investigative.is_empty() || !sheet.general.is_empty() {
        let _ = writeln!(out, "<h2>Ability Descriptions</h2>");
        for category in AbilityCategory::ALL {
            let rows = sheet.rows(category);
            if rows.is_empty() {
                continue;
            }
            let _ = writeln!(out, "<h3>{} Abilities</h3>", category.label());
            for row in rows {
                let _ = writeln!(
                    out,
                    "<div class=\"desc {}\"><strong>{}</strong><p>{}</p></div>",
                    category.as_str(),
                    escape(&row.name),
                    escape(&row.description)
                );
            }
        }
    }
    out.push_str("</section>\n");
}

fn write_ability_table(out: &mut String, category: AbilityCategory, rows: &[SheetRow], spent: u64) {
    let _ = writeln!(
        out,
        "<h2>{} Abilities <small>({spent} points spent)</small></h2>",
        category.label()
    );
    if rows.is_empty() {
        let _ = writeln!(
            out,
            "<p class=\"empty\">No {category} abilities selected</p>"
        );
        return;
    }
    let with_type = category == AbilityCategory::Investigative;
    out.push_str("<table>\n<thead><tr><th>Ability</th>");
    if with_type {
        out.push_str("<th>Category</th>");
    }
    out.push_str("<th>Rating</th></tr></thead>\n<tbody>\n");
    for row in rows {
        let _ = write!(out, "<tr><td>{}</td>", escape(&row.name));
        if with_type {
            let _ = write!(out, "<td>{}</td>", escape(&row.ability_type));
        }
        let _ = writeln!(out, "<td class=\"rating\">{}</td></tr>", row.rating);
    }
    out.push_str("</tbody>\n</table>\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::creation::Character;
    use crate::data::AbilityCatalog;
    use crate::sheet::project;

    #[test]
    fn escapes_user_text() {
        let mut character = Character::new(1);
        character.name = "<script>alert(1)</script>".to_string();
        character.background = "Tom & Jerry".to_string();
        let html = render_html(&[project(&character, &AbilityCatalog::empty())]);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("Tom &amp; Jerry"));
    }

    #[test]
    fn every_sheet_after_the_first_breaks_the_page() {
        let catalog = AbilityCatalog::empty();
        let sheets: Vec<_> = (1..=3).map(|id| project(&Character::new(id), &catalog)).collect();
        let html = render_html(&sheets);
        assert_eq!(html.matches("<section class=\"sheet\"").count(), 3);
        assert!(html.contains("page-break-before: always"));
    }

    #[test]
    fn general_table_has_no_category_column() {
        let mut character = Character::new(1);
        character.set_rating(AbilityCategory::General, "Athletics", 4);
        let html = render_html(&[project(&character, &AbilityCatalog::empty())]);
        assert!(!html.contains("<th>Category</th>"));
        assert!(html.contains("<td class=\"rating\">4</td>"));
    }
}
