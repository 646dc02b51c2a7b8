//! The single in-memory creation session held by the server.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::creation::Wizard;
use crate::data::catalog::{self, AbilityCatalog, CatalogError};

#[derive(Debug)]
pub struct Session {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub wizard: Wizard,
    pub catalog: AbilityCatalog,
    /// Banner text from the last failed catalog load.
    pub catalog_error: Option<String>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            wizard: Wizard::new(),
            catalog: AbilityCatalog::empty(),
            catalog_error: None,
        }
    }

    /// Replace the active catalog. `None` loads every file. On failure the catalog
    /// is left empty and the error kept as a banner.
    pub fn select_catalog(
        &mut self,
        data_dir: &Path,
        file: Option<&str>,
    ) -> Result<&AbilityCatalog, CatalogError> {
        match catalog::load_selection(data_dir, file) {
            Ok(loaded) => {
                tracing::info!(
                    source = ?loaded.source,
                    records = loaded.len(),
                    investigative = loaded.investigative_count(),
                    "catalog selected"
                );
                self.catalog = loaded;
                self.catalog_error = None;
                Ok(&self.catalog)
            }
            Err(err) => {
                let label = file.unwrap_or("all files");
                tracing::warn!(selection = label, error = %err, "catalog load failed");
                self.catalog = AbilityCatalog::empty();
                self.catalog_error = Some(format!("Failed to load abilities from {label}: {err}"));
                Err(err)
            }
        }
    }

    /// Discard the roster and return to setup. The catalog stays selected.
    pub fn start_over(&mut self) {
        self.wizard.start_over();
        self.id = Uuid::new_v4();
        self.started_at = Utc::now();
    }
}

pub struct AppState {
    pub config: AppConfig,
    session: Mutex<Session>,
}

impl AppState {
    /// New state with every catalog file loaded, matching a fresh page load.
    pub fn new(config: AppConfig) -> Self {
        let mut session = Session::new();
        let _ = session.select_catalog(&config.data_dir, None);
        Self {
            config,
            session: Mutex::new(session),
        }
    }

    /// Lock the session. Catalog loads happen under this lock, so a later
    /// selection always replaces an earlier one.
    pub fn session(&self) -> MutexGuard<'_, Session> {
        self.session
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn failed_selection_degrades_to_empty_with_banner() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(
            dir.path().join("core.json"),
            r#"[{"ability_category":"general","ability_name":"Health"}]"#,
        )
        .unwrap();

        let mut session = Session::new();
        session.select_catalog(dir.path(), Some("core")).unwrap();
        assert_eq!(session.catalog.len(), 1);

        assert!(session.select_catalog(dir.path(), Some("missing")).is_err());
        assert!(session.catalog.is_empty());
        let banner = session.catalog_error.clone().unwrap();
        assert!(banner.contains("missing"), "{banner}");

        session.select_catalog(dir.path(), None).unwrap();
        assert!(session.catalog_error.is_none());
    }

    #[test]
    fn start_over_issues_a_new_session_id() {
        let mut session = Session::new();
        let first = session.id;
        session.wizard.setup(2, 0).unwrap();
        session.start_over();
        assert_ne!(session.id, first);
        assert!(session.wizard.roster().is_empty());
    }
}
