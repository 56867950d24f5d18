//! Goal data structures and CSV loading

mod data;
pub mod loader;

pub use data::{GoalCategory, GoalRecord, GoalSnapshot, GoalStatus, MAX_ANNUAL_RETURN_PCT};
pub(crate) use data::{check_annual_return, check_non_negative, check_positive};
pub use loader::{load_goals, load_goals_from_reader};
