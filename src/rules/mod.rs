//! Point-buy rules: how many build points a party gets and how a character spends them.

pub mod build_points;
pub mod ledger;

pub use build_points::{BuildPoints, PointsPolicy, ACTIVE_POLICY, GENERAL_BUILD_POINTS};
pub use ledger::{rating_from_input, AbilityLedger, RatingOutOfRange};
