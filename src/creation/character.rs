use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::data::AbilityCategory;
use crate::rules::{rating_from_input, AbilityLedger, BuildPoints, RatingOutOfRange};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Character {
    /// 1-based position in the roster.
    pub id: u32,
    pub name: String,
    pub motivation: String,
    pub background: String,
    pub investigative: AbilityLedger,
    pub general: AbilityLedger,
}

/// Why a character cannot be completed yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum CompletionIssue {
    MissingName,
    Overspent {
        category: AbilityCategory,
        spent: u64,
        budget: u32,
    },
}

impl fmt::Display for CompletionIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingName => write!(f, "character name is required"),
            Self::Overspent {
                category,
                spent,
                budget,
            } => write!(
                f,
                "{} build points exceeded: {spent} of {budget} spent",
                category.label()
            ),
        }
    }
}

impl Character {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    pub fn ledger(&self, category: AbilityCategory) -> &AbilityLedger {
        match category {
            AbilityCategory::Investigative => &self.investigative,
            AbilityCategory::General => &self.general,
        }
    }

    pub fn ledger_mut(&mut self, category: AbilityCategory) -> &mut AbilityLedger {
        match category {
            AbilityCategory::Investigative => &mut self.investigative,
            AbilityCategory::General => &mut self.general,
        }
    }

    pub fn set_rating(&mut self, category: AbilityCategory, ability: &str, rating: u32) {
        self.ledger_mut(category).set_rating(ability, rating);
    }

    pub fn investigative_points_spent(&self) -> u64 {
        self.investigative.spent()
    }

    pub fn general_points_spent(&self) -> u64 {
        self.general.spent()
    }

    pub fn has_name(&self) -> bool {
        !self.name.trim().is_empty()
    }

    /// Name, or "Character N" for roster cards.
    pub fn display_name(&self) -> String {
        if self.has_name() {
            self.name.clone()
        } else {
            format!("Character {}", self.id)
        }
    }

    /// Every reason this character cannot advance. Empty means ready.
    pub fn completion_issues(&self, budgets: &BuildPoints) -> Vec<CompletionIssue> {
        let mut issues = Vec::new();
        if !self.has_name() {
            issues.push(CompletionIssue::MissingName);
        }
        for category in AbilityCategory::ALL {
            let ledger = self.ledger(category);
            let budget = budgets.for_category(category);
            if ledger.is_overspent(budget) {
                issues.push(CompletionIssue::Overspent {
                    category,
                    spent: ledger.spent(),
                    budget,
                });
            }
        }
        issues
    }

    pub fn can_complete(&self, budgets: &BuildPoints) -> bool {
        self.completion_issues(budgets).is_empty()
    }

    /// Overwrite basic info and ratings from a draft. Nothing is applied when any
    /// rating is out of range.
    pub fn apply_draft(&mut self, draft: &CharacterDraft) -> Result<(), RatingOutOfRange> {
        let mut ratings = Vec::with_capacity(draft.investigative.len() + draft.general.len());
        for (category, entries) in [
            (AbilityCategory::Investigative, &draft.investigative),
            (AbilityCategory::General, &draft.general),
        ] {
            for (ability, raw) in entries {
                ratings.push((category, ability.as_str(), rating_from_input(*raw)?));
            }
        }

        if let Some(name) = &draft.name {
            self.name = name.clone();
        }
        if let Some(motivation) = &draft.motivation {
            self.motivation = motivation.clone();
        }
        if let Some(background) = &draft.background {
            self.background = background.clone();
        }
        for (category, ability, rating) in ratings {
            self.set_rating(category, ability, rating);
        }
        Ok(())
    }
}

/// Partial character input: the body of the basic-info form, or one entry of a
/// roster plan file fed to `gumshoe sheets`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CharacterDraft {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub motivation: Option<String>,
    #[serde(default)]
    pub background: Option<String>,
    #[serde(default)]
    pub investigative: BTreeMap<String, i64>,
    #[serde(default)]
    pub general: BTreeMap<String, i64>,
}
