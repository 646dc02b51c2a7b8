use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::data::ability::AbilityCategory;
use crate::data::catalog::{list_catalog_files, normalize_file_name, CatalogError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationSeverity {
    Error,
    Warning,
    Info,
}

impl ValidationSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for ValidationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationDiagnostic {
    pub severity: ValidationSeverity,
    pub context: String,
    pub message: String,
}

impl fmt::Display for ValidationDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.context, self.message)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    pub fn push(
        &mut self,
        severity: ValidationSeverity,
        context: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.diagnostics.push(ValidationDiagnostic {
            severity,
            context: context.into(),
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diag| diag.severity == ValidationSeverity::Error)
    }

    pub fn count(&self, severity: ValidationSeverity) -> usize {
        self.diagnostics
            .iter()
            .filter(|diag| diag.severity == severity)
            .count()
    }
}

/// Validate one catalog file's raw JSON. Works on untyped values so a single bad
/// record is reported in place instead of failing the whole file.
pub fn validate_catalog_json(file: &str, raw: &str, report: &mut ValidationReport) {
    let payload: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(err) => {
            report.push(
                ValidationSeverity::Error,
                file,
                format!("unable to parse json: {err}"),
            );
            return;
        }
    };

    let entries = match payload {
        Value::Array(entries) => entries,
        other => {
            report.push(
                ValidationSeverity::Info,
                file,
                "top-level object is treated as a one-element list",
            );
            vec![other]
        }
    };

    let mut seen: HashSet<(AbilityCategory, String)> = HashSet::new();
    for (index, entry) in entries.iter().enumerate() {
        let context = format!("{file}[{index}]");
        let Some(object) = entry.as_object() else {
            report.push(ValidationSeverity::Error, context, "entry is not an object");
            continue;
        };
        validate_entry(object, &context, &mut seen, report);
    }
}

fn string_field<'a>(object: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .find_map(|key| object.get(*key))
        .and_then(Value::as_str)
}

fn validate_entry(
    object: &Map<String, Value>,
    context: &str,
    seen: &mut HashSet<(AbilityCategory, String)>,
    report: &mut ValidationReport,
) {
    let name = match string_field(object, &["ability_name", "name"]) {
        Some(name) if !name.trim().is_empty() => Some(name.trim().to_string()),
        _ => {
            report.push(
                ValidationSeverity::Error,
                context,
                "missing non-empty 'ability_name'",
            );
            None
        }
    };

    let category = match string_field(object, &["ability_category", "category"]) {
        Some(raw) => match raw.parse::<AbilityCategory>() {
            Ok(category) if category.as_str() == raw => Some(category),
            Ok(category) => {
                report.push(
                    ValidationSeverity::Error,
                    context,
                    format!("category '{raw}' must be lowercase '{category}'"),
                );
                None
            }
            Err(err) => {
                report.push(ValidationSeverity::Error, context, err.to_string());
                None
            }
        },
        None => {
            report.push(
                ValidationSeverity::Error,
                context,
                "missing 'ability_category'",
            );
            None
        }
    };

    if let (Some(name), Some(category)) = (name.as_ref(), category) {
        if !seen.insert((category, name.clone())) {
            report.push(
                ValidationSeverity::Error,
                context,
                format!("duplicate {category} ability '{name}'"),
            );
        }
    }

    let description = string_field(object, &["description"]).unwrap_or("");
    if description.trim().is_empty() {
        report.push(
            ValidationSeverity::Warning,
            context,
            "missing description; sheets will show a placeholder",
        );
    }

    if category == Some(AbilityCategory::Investigative)
        && string_field(object, &["ability_type", "type"])
            .map_or(true, |t| t.trim().is_empty())
    {
        report.push(
            ValidationSeverity::Info,
            context,
            "investigative ability has no 'ability_type'",
        );
    }
}

pub fn validate_catalog_file(
    dir: impl AsRef<Path>,
    file: &str,
) -> Result<ValidationReport, CatalogError> {
    let file = normalize_file_name(file)?;
    let raw = fs::read_to_string(dir.as_ref().join(&file)).map_err(|source| CatalogError::Read {
        file: file.clone(),
        source,
    })?;
    let mut report = ValidationReport::default();
    validate_catalog_json(&file, &raw, &mut report);
    Ok(report)
}

/// Validate every catalog file. Duplicate names are only checked within a file,
/// since load-all may legitimately combine overlapping supplements.
pub fn validate_data_dir(dir: impl AsRef<Path>) -> Result<ValidationReport, CatalogError> {
    let dir = dir.as_ref();
    let mut report = ValidationReport::default();
    let files = list_catalog_files(dir)?;
    if files.is_empty() {
        report.push(
            ValidationSeverity::Warning,
            dir.display().to_string(),
            "no catalog files found",
        );
    }
    for file in files {
        match fs::read_to_string(dir.join(&file)) {
            Ok(raw) => validate_catalog_json(&file, &raw, &mut report),
            Err(err) => report.push(
                ValidationSeverity::Error,
                file,
                format!("unable to read: {err}"),
            ),
        }
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validate(raw: &str) -> ValidationReport {
        let mut report = ValidationReport::default();
        validate_catalog_json("test.json", raw, &mut report);
        report
    }

    #[test]
    fn clean_catalog_has_no_errors() {
        let report = validate(
            r#"[{"ability_category":"investigative","ability_name":"Law","ability_type":"Academic","description":"Statutes."}]"#,
        );
        assert!(report.diagnostics.is_empty(), "{:?}", report.diagnostics);
    }

    #[test]
    fn duplicate_name_within_category_is_an_error() {
        let report = validate(
            r#"[{"ability_category":"general","ability_name":"Driving","description":"a"},
                {"ability_category":"general","ability_name":"Driving","description":"b"},
                {"ability_category":"investigative","ability_name":"Driving","ability_type":"Technical","description":"c"}]"#,
        );
        assert_eq!(report.count(ValidationSeverity::Error), 1);
        assert!(report.diagnostics[0].message.contains("duplicate general ability"));
    }

    #[test]
    fn reports_unknown_category_and_missing_name() {
        let report = validate(r#"[{"ability_category":"occult","description":"x"}, 3]"#);
        assert!(report.has_errors());
        assert_eq!(report.count(ValidationSeverity::Error), 3);
    }

    #[test]
    fn single_object_is_noted_not_rejected() {
        let report = validate(
            r#"{"ability_category":"general","ability_name":"Health","description":"Hit points."}"#,
        );
        assert!(!report.has_errors());
        assert_eq!(report.count(ValidationSeverity::Info), 1);
    }
}
