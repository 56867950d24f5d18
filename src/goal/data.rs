//! Goal data structures and boundary validation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ProjectionError, Result};
use crate::projection::parse_target_date;

/// Upper bound on the expected annual return, in percent
pub const MAX_ANNUAL_RETURN_PCT: f64 = 30.0;

/// Lifecycle status of a goal, owned by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    #[default]
    Active,
    Completed,
    Paused,
}

impl GoalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalStatus::Active => "active",
            GoalStatus::Completed => "completed",
            GoalStatus::Paused => "paused",
        }
    }
}

/// What the goal is saving for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalCategory {
    Retirement,
    EmergencyFund,
    House,
    Education,
    Travel,
    InvestmentGrowth,
    #[default]
    Other,
}

impl GoalCategory {
    /// Display label used in summaries and reports
    pub fn label(&self) -> &'static str {
        match self {
            GoalCategory::Retirement => "Retirement",
            GoalCategory::EmergencyFund => "Emergency fund",
            GoalCategory::House => "House",
            GoalCategory::Education => "Education",
            GoalCategory::Travel => "Travel",
            GoalCategory::InvestmentGrowth => "Investments",
            GoalCategory::Other => "Other",
        }
    }
}

/// A goal as it arrives from storage, a request body or a CSV row.
///
/// Nothing here is trusted: convert with `GoalSnapshot::try_from` before
/// handing it to the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalRecord {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub category: GoalCategory,

    #[serde(default)]
    pub current_amount: f64,

    pub target_amount: f64,

    pub monthly_contribution: f64,

    /// Nominal annual return in percent
    pub expected_return: f64,

    /// ISO-8601 date or RFC 3339 timestamp
    pub target_date: String,

    #[serde(default)]
    pub status: GoalStatus,
}

/// Validated goal values consumed by the projection engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalSnapshot {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub category: GoalCategory,

    /// Amount already accumulated
    pub current_amount: f64,

    /// Amount to reach
    pub target_amount: f64,

    /// Deposit applied after each month's growth
    pub monthly_contribution: f64,

    /// Nominal annual return in percent, compounded monthly
    #[serde(rename = "expectedReturn")]
    pub expected_annual_return: f64,

    pub target_date: DateTime<Utc>,

    #[serde(default)]
    pub status: GoalStatus,
}

impl GoalSnapshot {
    /// Create an active goal with no title
    pub fn new(
        current_amount: f64,
        target_amount: f64,
        monthly_contribution: f64,
        expected_annual_return: f64,
        target_date: DateTime<Utc>,
    ) -> Self {
        Self {
            title: String::new(),
            category: GoalCategory::Other,
            current_amount,
            target_amount,
            monthly_contribution,
            expected_annual_return,
            target_date,
            status: GoalStatus::Active,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>, category: GoalCategory) -> Self {
        self.title = title.into();
        self.category = category;
        self
    }

    pub fn with_status(mut self, status: GoalStatus) -> Self {
        self.status = status;
        self
    }

    /// Validate against the default return bound
    pub fn validate(&self) -> Result<()> {
        self.validate_with_limit(MAX_ANNUAL_RETURN_PCT)
    }

    /// Validate amounts and the expected return against `max_annual_return_pct`
    pub fn validate_with_limit(&self, max_annual_return_pct: f64) -> Result<()> {
        check_non_negative("current amount", self.current_amount)?;
        check_positive("target amount", self.target_amount)?;
        check_non_negative("monthly contribution", self.monthly_contribution)?;
        check_annual_return(self.expected_annual_return, max_annual_return_pct)
    }

    pub fn is_active(&self) -> bool {
        self.status == GoalStatus::Active
    }
}

impl TryFrom<GoalRecord> for GoalSnapshot {
    type Error = ProjectionError;

    fn try_from(record: GoalRecord) -> Result<Self> {
        let target_date = parse_target_date(&record.target_date)?;
        let goal = GoalSnapshot {
            title: record.title.trim().to_string(),
            category: record.category,
            current_amount: record.current_amount,
            target_amount: record.target_amount,
            monthly_contribution: record.monthly_contribution,
            expected_annual_return: record.expected_return,
            target_date,
            status: record.status,
        };
        goal.validate()?;
        Ok(goal)
    }
}

pub(crate) fn check_non_negative(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ProjectionError::amount(field, value))
    }
}

pub(crate) fn check_positive(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ProjectionError::amount(field, value))
    }
}

pub(crate) fn check_annual_return(value: f64, max_pct: f64) -> Result<()> {
    if value.is_finite() && (0.0..=max_pct).contains(&value) {
        Ok(())
    } else {
        Err(ProjectionError::InvalidRate { value, min: 0.0, max: max_pct })
    }
}
