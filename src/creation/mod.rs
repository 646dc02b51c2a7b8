//! Character creation: the roster, per-character completion checks and the wizard
//! that walks a party from setup to finished sheets.

pub mod character;
pub mod usage;
pub mod wizard;

pub use character::{Character, CharacterDraft, CompletionIssue};
pub use usage::{also_chosen_by, usage_for, AbilityUsage};
pub use wizard::{Wizard, WizardError, WizardStep};
