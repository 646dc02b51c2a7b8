//! Three-step creation flow: setup, one character at a time, then sheets.

use serde::Serialize;
use thiserror::Error;

use crate::creation::character::{Character, CompletionIssue};
use crate::rules::build_points::is_valid_player_count;
use crate::rules::BuildPoints;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum WizardStep {
    Setup,
    Creation { index: usize },
    Sheets,
}

impl WizardStep {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Setup => "setup",
            Self::Creation { .. } => "creation",
            Self::Sheets => "sheets",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    #[error("player count must be between 1 and 6, got {0}")]
    InvalidPlayerCount(u32),
    #[error("'{action}' is only available during {expected}, wizard is at {actual}")]
    WrongStep {
        action: &'static str,
        expected: &'static str,
        actual: &'static str,
    },
    #[error("character {} is not complete: {}", ordinal(.index), join_issues(.issues))]
    IncompleteCharacter {
        index: usize,
        issues: Vec<CompletionIssue>,
    },
    #[error("already at the first character")]
    AtFirstCharacter,
}

fn ordinal(index: &usize) -> usize {
    index + 1
}

fn join_issues(issues: &[CompletionIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Clone, Serialize)]
pub struct Wizard {
    step: WizardStep,
    budgets: Option<BuildPoints>,
    roster: Vec<Character>,
}

impl Default for Wizard {
    fn default() -> Self {
        Self::new()
    }
}

impl Wizard {
    pub fn new() -> Self {
        Self {
            step: WizardStep::Setup,
            budgets: None,
            roster: Vec::new(),
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn budgets(&self) -> Option<BuildPoints> {
        self.budgets
    }

    pub fn roster(&self) -> &[Character] {
        &self.roster
    }

    pub fn player_count(&self) -> usize {
        self.roster.len()
    }

    fn wrong_step(&self, action: &'static str, expected: &'static str) -> WizardError {
        WizardError::WrongStep {
            action,
            expected,
            actual: self.step.name(),
        }
    }

    /// Build a blank roster and enter creation at the first character.
    pub fn setup(&mut self, players: u32, investigative_count: usize) -> Result<(), WizardError> {
        if self.step != WizardStep::Setup {
            return Err(self.wrong_step("setup", "setup"));
        }
        if !is_valid_player_count(players) {
            return Err(WizardError::InvalidPlayerCount(players));
        }
        let budgets = BuildPoints::for_party(players, investigative_count);
        self.roster = (1..=players).map(Character::new).collect();
        self.budgets = Some(budgets);
        self.step = WizardStep::Creation { index: 0 };
        tracing::info!(
            players,
            investigative = budgets.investigative,
            general = budgets.general,
            "party set up"
        );
        Ok(())
    }

    pub fn current_index(&self) -> Option<usize> {
        match self.step {
            WizardStep::Creation { index } => Some(index),
            _ => None,
        }
    }

    pub fn current_character(&self) -> Result<&Character, WizardError> {
        let index = self
            .current_index()
            .ok_or_else(|| self.wrong_step("edit character", "creation"))?;
        Ok(&self.roster[index])
    }

    pub fn current_character_mut(&mut self) -> Result<&mut Character, WizardError> {
        let index = self
            .current_index()
            .ok_or_else(|| self.wrong_step("edit character", "creation"))?;
        Ok(&mut self.roster[index])
    }

    /// Move to the next character, or to the sheets after the last one.
    pub fn advance(&mut self) -> Result<WizardStep, WizardError> {
        let index = self
            .current_index()
            .ok_or_else(|| self.wrong_step("next", "creation"))?;
        let budgets = self
            .budgets
            .ok_or_else(|| self.wrong_step("next", "creation"))?;

        let issues = self.roster[index].completion_issues(&budgets);
        if !issues.is_empty() {
            return Err(WizardError::IncompleteCharacter { index, issues });
        }

        self.step = if index + 1 < self.roster.len() {
            WizardStep::Creation { index: index + 1 }
        } else {
            WizardStep::Sheets
        };
        tracing::debug!(from = index, to = ?self.step, "advanced");
        Ok(self.step)
    }

    /// Previous character. Does not validate the one being left.
    pub fn back(&mut self) -> Result<WizardStep, WizardError> {
        let index = self
            .current_index()
            .ok_or_else(|| self.wrong_step("back", "creation"))?;
        if index == 0 {
            return Err(WizardError::AtFirstCharacter);
        }
        self.step = WizardStep::Creation { index: index - 1 };
        Ok(self.step)
    }

    /// Return from the sheets to the first character, keeping the roster.
    pub fn edit_again(&mut self) -> Result<WizardStep, WizardError> {
        if self.step != WizardStep::Sheets {
            return Err(self.wrong_step("edit", "sheets"));
        }
        self.step = WizardStep::Creation { index: 0 };
        Ok(self.step)
    }

    /// Back to setup from anywhere. The roster is discarded.
    pub fn start_over(&mut self) {
        *self = Self::new();
    }

    /// The finished roster, available once the sheets step is reached.
    pub fn sheets(&self) -> Result<&[Character], WizardError> {
        if self.step != WizardStep::Sheets {
            return Err(self.wrong_step("sheets", "sheets"));
        }
        Ok(&self.roster)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::AbilityCategory;

    fn name_current(wizard: &mut Wizard, name: &str) {
        wizard.current_character_mut().unwrap().name = name.to_string();
    }

    #[test]
    fn setup_rejects_out_of_range_counts() {
        let mut wizard = Wizard::new();
        assert_eq!(wizard.setup(0, 10), Err(WizardError::InvalidPlayerCount(0)));
        assert_eq!(wizard.setup(7, 10), Err(WizardError::InvalidPlayerCount(7)));
        assert_eq!(wizard.step(), WizardStep::Setup);
    }

    #[test]
    fn setup_builds_blank_roster_with_stable_ids() {
        let mut wizard = Wizard::new();
        wizard.setup(3, 30).unwrap();
        assert_eq!(wizard.step(), WizardStep::Creation { index: 0 });
        let ids: Vec<u32> = wizard.roster().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(wizard.budgets().map(|b| b.general), Some(60));
    }

    #[test]
    fn cannot_advance_without_name() {
        let mut wizard = Wizard::new();
        wizard.setup(2, 0).unwrap();
        let err = wizard.advance().expect_err("unnamed character must not advance");
        assert!(matches!(
            err,
            WizardError::IncompleteCharacter { index: 0, ref issues } if issues == &[CompletionIssue::MissingName]
        ));
    }

    #[test]
    fn cannot_advance_while_overspent() {
        let mut wizard = Wizard::new();
        wizard.setup(1, 0).unwrap();
        name_current(&mut wizard, "Ada");
        wizard
            .current_character_mut()
            .unwrap()
            .set_rating(AbilityCategory::Investigative, "Law", 33);
        assert!(wizard.advance().is_err());

        wizard
            .current_character_mut()
            .unwrap()
            .set_rating(AbilityCategory::Investigative, "Law", 32);
        assert_eq!(wizard.advance(), Ok(WizardStep::Sheets));
    }

    #[test]
    fn full_walk_then_edit_and_start_over() {
        let mut wizard = Wizard::new();
        wizard.setup(2, 0).unwrap();
        name_current(&mut wizard, "Ada");
        assert_eq!(wizard.advance(), Ok(WizardStep::Creation { index: 1 }));
        assert_eq!(wizard.back(), Ok(WizardStep::Creation { index: 0 }));
        assert_eq!(wizard.back(), Err(WizardError::AtFirstCharacter));
        wizard.advance().unwrap();
        name_current(&mut wizard, "Bo");
        assert_eq!(wizard.advance(), Ok(WizardStep::Sheets));
        assert_eq!(wizard.sheets().unwrap().len(), 2);

        assert_eq!(wizard.edit_again(), Ok(WizardStep::Creation { index: 0 }));
        assert_eq!(wizard.current_character().unwrap().name, "Ada");

        wizard.start_over();
        assert_eq!(wizard.step(), WizardStep::Setup);
        assert!(wizard.roster().is_empty());
        assert!(wizard.budgets().is_none());
    }

    #[test]
    fn wrong_step_calls_are_rejected() {
        let mut wizard = Wizard::new();
        assert!(matches!(wizard.advance(), Err(WizardError::WrongStep { .. })));
        assert!(matches!(wizard.edit_again(), Err(WizardError::WrongStep { .. })));
        assert!(wizard.current_character().is_err());
        wizard.setup(1, 0).unwrap();
        assert!(matches!(wizard.setup(1, 0), Err(WizardError::WrongStep { .. })));
        assert!(wizard.sheets().is_err());
    }
}
