//! Goal progress and contribution handling
//!
//! These functions only report; persisting a status change is up to the caller.

use serde::{Deserialize, Serialize};

use crate::error::{ProjectionError, Result};
use crate::goal::{check_positive, GoalSnapshot, GoalStatus};

/// Accumulated amount as a percentage of the target, capped at 100.
///
/// A zero target is rejected with `DivisionUndefined` rather than reported as 0.
pub fn progress_percent(current_amount: f64, target_amount: f64) -> Result<f64> {
    if target_amount == 0.0 {
        return Err(ProjectionError::DivisionUndefined);
    }
    if !target_amount.is_finite() || target_amount < 0.0 {
        return Err(ProjectionError::amount("target amount", target_amount));
    }
    Ok((current_amount / target_amount * 100.0).min(100.0))
}

pub fn is_goal_complete(current_amount: f64, target_amount: f64) -> bool {
    current_amount >= target_amount
}

/// Result of adding a one-off contribution to a goal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionOutcome {
    pub current_amount: f64,
    pub completed: bool,
}

impl ContributionOutcome {
    /// Status to persist: active goals that crossed the target become completed
    pub fn next_status(&self, status: GoalStatus) -> GoalStatus {
        match status {
            GoalStatus::Active if self.completed => GoalStatus::Completed,
            other => other,
        }
    }
}

/// Add `amount` to the goal's current amount and report whether the target is met.
///
/// Status is not checked; callers decide whether paused or completed goals
/// accept contributions.
pub fn apply_contribution(goal: &GoalSnapshot, amount: f64) -> Result<ContributionOutcome> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(ProjectionError::amount("contribution", amount));
    }
    check_positive("target amount", goal.target_amount)?;

    let current_amount = goal.current_amount + amount;
    let completed = is_goal_complete(current_amount, goal.target_amount);
    if completed && !is_goal_complete(goal.current_amount, goal.target_amount) {
        log::debug!("goal '{}' reached its target of {:.2}", goal.title, goal.target_amount);
    }

    Ok(ContributionOutcome { current_amount, completed })
}
