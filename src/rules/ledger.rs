use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("rating {0} is too large (maximum is 4294967295)")]
pub struct RatingOutOfRange(pub i64);

/// Turn raw input into a stored rating. Negatives clamp to 0; values that do not
/// fit a `u32` are rejected rather than truncated.
pub fn rating_from_input(raw: i64) -> Result<u32, RatingOutOfRange> {
    u32::try_from(raw.max(0)).map_err(|_| RatingOutOfRange(raw))
}

/// Ratings a character has bought in one ability category.
///
/// Absent means 0: a zero rating is never stored. `spent` is recomputed from the
/// ratings after every change so it always equals their sum; it is a `u64` so the
/// sum of any set of `u32` ratings is exact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AbilityLedger {
    ratings: BTreeMap<String, u32>,
    spent: u64,
}

impl AbilityLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a rating. A 0 rating removes the entry.
    pub fn set_rating(&mut self, ability: &str, rating: u32) {
        if rating == 0 {
            self.ratings.remove(ability);
        } else {
            self.ratings.insert(ability.to_string(), rating);
        }
        self.recompute();
    }

    /// Step up by one. Allowed while points remain, or when the ability already
    /// carries a rating.
    pub fn increase(&mut self, ability: &str, budget: u32) -> bool {
        let current = self.rating(ability);
        if self.remaining(budget) <= 0 && current == 0 {
            return false;
        }
        let Some(next) = current.checked_add(1) else {
            return false;
        };
        self.set_rating(ability, next);
        true
    }

    pub fn decrease(&mut self, ability: &str) -> bool {
        let current = self.rating(ability);
        if current == 0 {
            return false;
        }
        self.set_rating(ability, current - 1);
        true
    }

    pub fn rating(&self, ability: &str) -> u32 {
        self.ratings.get(ability).copied().unwrap_or(0)
    }

    pub fn spent(&self) -> u64 {
        self.spent
    }

    /// Points left under `budget`; negative when overspent.
    pub fn remaining(&self, budget: u32) -> i64 {
        let spent = i64::try_from(self.spent).unwrap_or(i64::MAX);
        i64::from(budget).saturating_sub(spent)
    }

    pub fn is_overspent(&self, budget: u32) -> bool {
        self.spent > u64::from(budget)
    }

    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }

    pub fn contains(&self, ability: &str) -> bool {
        self.ratings.contains_key(ability)
    }

    /// Rated abilities in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.ratings.iter().map(|(name, rating)| (name.as_str(), *rating))
    }

    fn recompute(&mut self) {
        self.spent = self.ratings.values().map(|rating| u64::from(*rating)).sum();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sum(ledger: &AbilityLedger) -> u64 {
        ledger.iter().map(|(_, rating)| u64::from(rating)).sum()
    }

    #[test]
    fn spent_tracks_sum_of_ratings() {
        let mut ledger = AbilityLedger::new();
        ledger.set_rating("Law", 3);
        ledger.set_rating("Oral History", 2);
        ledger.set_rating("Law", 1);
        assert_eq!(ledger.spent(), 3);
        assert_eq!(ledger.spent(), sum(&ledger));
    }

    #[test]
    fn zero_removes_and_readding_starts_clean() {
        let mut ledger = AbilityLedger::new();
        ledger.set_rating("Law", 4);
        ledger.set_rating("Law", 0);
        assert!(!ledger.contains("Law"));
        assert_eq!(ledger.spent(), 0);

        ledger.set_rating("Law", 2);
        assert_eq!(ledger.rating("Law"), 2);
        assert_eq!(ledger.spent(), 2);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn negative_ratings_clamp_to_zero() {
        let mut ledger = AbilityLedger::new();
        ledger.set_rating("Law", 2);
        ledger.set_rating("Law", rating_from_input(-5).unwrap());
        assert!(ledger.is_empty());
        assert_eq!(ledger.spent(), 0);
    }

    #[test]
    fn oversized_input_is_rejected_not_truncated() {
        assert_eq!(rating_from_input(5_000_000_000), Err(RatingOutOfRange(5_000_000_000)));
        assert_eq!(rating_from_input(i64::from(u32::MAX)), Ok(u32::MAX));
    }

    #[test]
    fn spent_stays_exact_for_huge_ratings() {
        let mut ledger = AbilityLedger::new();
        ledger.set_rating("Law", u32::MAX);
        ledger.set_rating("Chemistry", 5);
        ledger.set_rating("Forensics", u32::MAX);
        assert_eq!(ledger.spent(), sum(&ledger));
        assert_eq!(ledger.spent(), 2 * u64::from(u32::MAX) + 5);
        assert!(ledger.is_overspent(60));
        assert!(ledger.remaining(60) < 0);

        assert!(!ledger.increase("Law", 60), "a maximal rating cannot step further");
        assert_eq!(ledger.rating("Law"), u32::MAX);
    }

    #[test]
    fn overspend_is_allowed_but_reported() {
        let mut ledger = AbilityLedger::new();
        ledger.set_rating("Athletics", 70);
        assert!(ledger.is_overspent(60));
        assert_eq!(ledger.remaining(60), -10);
    }

    #[test]
    fn increase_needs_points_unless_already_rated() {
        let mut ledger = AbilityLedger::new();
        ledger.set_rating("Law", 2);
        assert!(!ledger.increase("Chemistry", 2), "no points left for a new ability");
        assert!(ledger.increase("Law", 2), "already-rated abilities may keep rising");
        assert_eq!(ledger.rating("Law"), 3);
        assert!(ledger.is_overspent(2));
    }

    #[test]
    fn decrease_stops_at_zero() {
        let mut ledger = AbilityLedger::new();
        assert!(!ledger.decrease("Law"));
        ledger.set_rating("Law", 1);
        assert!(ledger.decrease("Law"));
        assert!(!ledger.contains("Law"));
        assert_eq!(ledger.spent(), 0);
    }
}
