//! "Also chosen by": which other characters in the roster already bought an ability.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::creation::character::Character;
use crate::data::AbilityCategory;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AbilityUsage {
    /// 1-based roster position.
    pub character_number: usize,
    pub character_name: String,
    pub rating: u32,
}

/// Other named characters holding a positive rating in `ability`, in roster order.
pub fn also_chosen_by(
    roster: &[Character],
    current_index: usize,
    category: AbilityCategory,
    ability: &str,
) -> Vec<AbilityUsage> {
    roster
        .iter()
        .enumerate()
        .filter(|(index, character)| *index != current_index && character.has_name())
        .filter_map(|(index, character)| {
            let rating = character.ledger(category).rating(ability);
            (rating > 0).then(|| AbilityUsage {
                character_number: index + 1,
                character_name: character.name.clone(),
                rating,
            })
        })
        .collect()
}

/// `also_chosen_by` for every ability any other named character has rated.
pub fn usage_for(
    roster: &[Character],
    current_index: usize,
    category: AbilityCategory,
) -> BTreeMap<String, Vec<AbilityUsage>> {
    let mut usage: BTreeMap<String, Vec<AbilityUsage>> = BTreeMap::new();
    for (index, character) in roster.iter().enumerate() {
        if index == current_index || !character.has_name() {
            continue;
        }
        for (ability, rating) in character.ledger(category).iter() {
            usage.entry(ability.to_string()).or_default().push(AbilityUsage {
                character_number: index + 1,
                character_name: character.name.clone(),
                rating,
            });
        }
    }
    usage
}
