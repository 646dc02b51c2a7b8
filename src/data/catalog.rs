//! Ability catalog loader. Data files live in one directory (default `data/`);
//! a file holds either a list of ability records or a single record object.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::data::ability::{AbilityCategory, AbilityRecord};

pub const DEFAULT_DATA_DIR: &str = "data";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("invalid catalog file name '{0}'")]
    InvalidFileName(String),
    #[error("unable to read data directory '{path}': {source}")]
    DataDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unable to read '{file}': {source}")]
    Read {
        file: String,
        #[source]
        source: std::io::Error,
    },
    #[error("unable to parse '{file}': {source}")]
    Parse {
        file: String,
        #[source]
        source: serde_json::Error,
    },
}

impl CatalogError {
    /// Missing files map to 404 on the API; everything else is a server-side failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Read { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}

/// Where the active catalog came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "file", rename_all = "snake_case")]
pub enum CatalogSource {
    Empty,
    File(String),
    All,
}

#[derive(Debug, Clone, Serialize)]
pub struct AbilityCatalog {
    pub source: CatalogSource,
    pub records: Vec<AbilityRecord>,
}

impl Default for AbilityCatalog {
    fn default() -> Self {
        Self::empty()
    }
}

impl AbilityCatalog {
    pub fn empty() -> Self {
        Self {
            source: CatalogSource::Empty,
            records: Vec::new(),
        }
    }

    pub fn new(source: CatalogSource, records: Vec<AbilityRecord>) -> Self {
        Self { source, records }
    }

    pub fn in_category(&self, category: AbilityCategory) -> impl Iterator<Item = &AbilityRecord> {
        self.records.iter().filter(move |r| r.category == category)
    }

    pub fn investigative(&self) -> impl Iterator<Item = &AbilityRecord> {
        self.in_category(AbilityCategory::Investigative)
    }

    pub fn general(&self) -> impl Iterator<Item = &AbilityRecord> {
        self.in_category(AbilityCategory::General)
    }

    pub fn investigative_count(&self) -> usize {
        self.investigative().count()
    }

    pub fn find(&self, category: AbilityCategory, name: &str) -> Option<&AbilityRecord> {
        self.in_category(category).find(|r| r.name == name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// A file dropped from a load-all pass.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedFile {
    pub file: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoadAllReport {
    pub records: Vec<AbilityRecord>,
    pub files_loaded: Vec<String>,
    pub skipped: Vec<SkippedFile>,
}

impl LoadAllReport {
    pub fn into_catalog(self) -> AbilityCatalog {
        AbilityCatalog::new(CatalogSource::All, self.records)
    }
}

/// Append `.json` when missing and refuse anything that could leave the data directory.
pub fn normalize_file_name(file: &str) -> Result<String, CatalogError> {
    let trimmed = file.trim();
    if trimmed.is_empty()
        || trimmed.contains("..")
        || trimmed.contains('/')
        || trimmed.contains('\\')
    {
        return Err(CatalogError::InvalidFileName(file.to_string()));
    }
    if trimmed.ends_with(".json") {
        Ok(trimmed.to_string())
    } else {
        Ok(format!("{trimmed}.json"))
    }
}

/// Names of every `*.json` file in `dir`, sorted.
pub fn list_catalog_files(dir: impl AsRef<Path>) -> Result<Vec<String>, CatalogError> {
    let dir = dir.as_ref();
    let entries = fs::read_dir(dir).map_err(|source| CatalogError::DataDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files: Vec<String> = entries
        .flatten()
        .filter(|entry| entry.path().is_file())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| name.ends_with(".json"))
        .collect();
    files.sort();
    Ok(files)
}

/// Parse catalog JSON. A top-level object is lifted into a one-element list.
pub fn parse_catalog(file: &str, raw: &str) -> Result<Vec<AbilityRecord>, CatalogError> {
    let parse_err = |source| CatalogError::Parse {
        file: file.to_string(),
        source,
    };
    let value: Value = serde_json::from_str(raw).map_err(parse_err)?;
    match value {
        Value::Array(_) => serde_json::from_value(value).map_err(parse_err),
        other => serde_json::from_value::<AbilityRecord>(other)
            .map(|record| vec![record])
            .map_err(parse_err),
    }
}

pub fn load_catalog_file(
    dir: impl AsRef<Path>,
    file: &str,
) -> Result<Vec<AbilityRecord>, CatalogError> {
    let file = normalize_file_name(file)?;
    let path = dir.as_ref().join(&file);
    let raw = fs::read_to_string(&path).map_err(|source| CatalogError::Read {
        file: file.clone(),
        source,
    })?;
    let records = parse_catalog(&file, &raw)?;
    tracing::debug!(file = %file, records = records.len(), "loaded catalog file");
    Ok(records)
}

/// Concatenate every catalog file. Files that fail are skipped, not fatal.
pub fn load_all(dir: impl AsRef<Path>) -> Result<LoadAllReport, CatalogError> {
    let dir = dir.as_ref();
    let files = list_catalog_files(dir)?;

    let mut report = LoadAllReport {
        records: Vec::new(),
        files_loaded: Vec::new(),
        skipped: Vec::new(),
    };
    for file in files {
        match load_catalog_file(dir, &file) {
            Ok(mut records) => {
                report.records.append(&mut records);
                report.files_loaded.push(file);
            }
            Err(err) => {
                tracing::warn!(file = %file, error = %err, "skipping catalog file");
                report.skipped.push(SkippedFile {
                    file,
                    error: err.to_string(),
                });
            }
        }
    }
    Ok(report)
}

/// Resolve a selection: `Some(file)` loads that file, `None` loads everything.
pub fn load_selection(
    dir: impl AsRef<Path>,
    file: Option<&str>,
) -> Result<AbilityCatalog, CatalogError> {
    match file {
        Some(file) => {
            let records = load_catalog_file(dir, file)?;
            Ok(AbilityCatalog::new(
                CatalogSource::File(normalize_file_name(file)?),
                records,
            ))
        }
        None => Ok(load_all(dir)?.into_catalog()),
    }
}
