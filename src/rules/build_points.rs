//! Build-point budgets per character.
//!
//! Investigative points shrink as the party grows so that abilities spread across
//! players; general points are flat. Two policies exist and exactly one is active.

use serde::Serialize;

use crate::data::AbilityCategory;

pub const GENERAL_BUILD_POINTS: u32 = 60;
pub const MIN_PLAYERS: u32 = 1;
pub const MAX_PLAYERS: u32 = 6;

/// Investigative points when the player count falls outside the table.
const DEFAULT_INVESTIGATIVE_POINTS: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PointsPolicy {
    /// Fixed points keyed by player count.
    PlayerTable,
    /// Share of the catalog's investigative abilities, rounded up.
    CatalogShare,
}

pub const ACTIVE_POLICY: PointsPolicy = PointsPolicy::PlayerTable;

impl PointsPolicy {
    pub fn investigative_points(self, players: u32, investigative_count: usize) -> u32 {
        match self {
            Self::PlayerTable => table_points(players),
            Self::CatalogShare => share_points(players, investigative_count),
        }
    }
}

fn table_points(players: u32) -> u32 {
    match players {
        1 => 32,
        2 => 28,
        3 => 24,
        4 => 20,
        5 => 18,
        6 => 16,
        _ => DEFAULT_INVESTIGATIVE_POINTS,
    }
}

/// Percentage of the investigative catalog each character may buy.
fn share_percent(players: u32) -> u64 {
    match players {
        0 | 1 => 100,
        2 => 80,
        3 => 60,
        4 => 55,
        _ => 50,
    }
}

fn share_points(players: u32, investigative_count: usize) -> u32 {
    let scaled = investigative_count as u64 * share_percent(players);
    let points = scaled.div_ceil(100);
    u32::try_from(points).unwrap_or(u32::MAX)
}

pub fn is_valid_player_count(players: u32) -> bool {
    (MIN_PLAYERS..=MAX_PLAYERS).contains(&players)
}

/// Both budgets for one party, computed once at setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BuildPoints {
    pub investigative: u32,
    pub general: u32,
}

impl BuildPoints {
    pub fn for_party(players: u32, investigative_count: usize) -> Self {
        Self::with_policy(ACTIVE_POLICY, players, investigative_count)
    }

    pub fn with_policy(policy: PointsPolicy, players: u32, investigative_count: usize) -> Self {
        Self {
            investigative: policy.investigative_points(players, investigative_count),
            general: GENERAL_BUILD_POINTS,
        }
    }

    pub fn for_category(&self, category: AbilityCategory) -> u32 {
        match category {
            AbilityCategory::Investigative => self.investigative,
            AbilityCategory::General => self.general,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_table_matches_for_every_party_size() {
        let expected = [(1, 32), (2, 28), (3, 24), (4, 20), (5, 18), (6, 16)];
        for (players, points) in expected {
            assert_eq!(
                PointsPolicy::PlayerTable.investigative_points(players, 0),
                points,
                "players={players}"
            );
        }
    }

    #[test]
    fn player_table_falls_back_outside_range() {
        assert_eq!(PointsPolicy::PlayerTable.investigative_points(0, 40), 20);
        assert_eq!(PointsPolicy::PlayerTable.investigative_points(9, 40), 20);
    }

    #[test]
    fn catalog_share_rounds_up() {
        // 33 abilities: 100% = 33, 80% = 26.4, 60% = 19.8, 55% = 18.15, 50% = 16.5
        let expected = [(1, 33), (2, 27), (3, 20), (4, 19), (5, 17), (6, 17)];
        for (players, points) in expected {
            assert_eq!(
                PointsPolicy::CatalogShare.investigative_points(players, 33),
                points,
                "players={players}"
            );
        }
    }

    #[test]
    fn catalog_share_of_empty_catalog_is_zero() {
        assert_eq!(PointsPolicy::CatalogShare.investigative_points(3, 0), 0);
    }

    #[test]
    fn general_budget_is_flat() {
        for players in MIN_PLAYERS..=MAX_PLAYERS {
            let budget = BuildPoints::with_policy(PointsPolicy::CatalogShare, players, 10);
            assert_eq!(budget.general, GENERAL_BUILD_POINTS);
            assert_eq!(budget.for_category(AbilityCategory::General), 60);
        }
    }

    #[test]
    fn active_policy_drives_for_party() {
        let budget = BuildPoints::for_party(4, 100);
        assert_eq!(
            budget.investigative,
            ACTIVE_POLICY.investigative_points(4, 100)
        );
    }

    #[test]
    fn player_count_bounds() {
        assert!(!is_valid_player_count(0));
        assert!(is_valid_player_count(1));
        assert!(is_valid_player_count(6));
        assert!(!is_valid_player_count(7));
    }
}
