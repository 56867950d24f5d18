//! Goal annotations and aggregate figures for dashboards and weekly reports

use serde::Serialize;

use crate::goal::{GoalCategory, GoalSnapshot, GoalStatus};

/// A goal decorated with derived figures, serialized flat
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatedGoal {
    #[serde(flatten)]
    pub goal: GoalSnapshot,
    /// Percent of target reached, capped at 100
    pub progress: f64,
    pub months_remaining: u32,
    /// Closed-form value at the target date
    pub projected_amount: f64,
}

/// `{"goal": {...}}` response shape
#[derive(Debug, Clone, Serialize)]
pub struct GoalEnvelope {
    pub goal: AnnotatedGoal,
}

impl From<AnnotatedGoal> for GoalEnvelope {
    fn from(goal: AnnotatedGoal) -> Self {
        Self { goal }
    }
}

/// Target and saved amounts for one category
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotals {
    pub category: GoalCategory,
    pub label: &'static str,
    pub target_amount: f64,
    pub current_amount: f64,
}

/// Aggregate view over a set of goals
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_goals: usize,
    pub active_goals: usize,
    pub completed_goals: usize,
    pub paused_goals: usize,
    pub total_target: f64,
    pub total_current: f64,
    /// Not capped: over-funded goals can push this past 100
    pub overall_progress: f64,
    /// In order of first appearance
    pub categories: Vec<CategoryTotals>,
}

impl DashboardSummary {
    pub fn from_goals(goals: &[GoalSnapshot]) -> Self {
        Self::tally(goals.iter())
    }

    /// Figures for the weekly report, which only covers active goals
    pub fn weekly_report(goals: &[GoalSnapshot]) -> Self {
        Self::tally(goals.iter().filter(|g| g.is_active()))
    }

    fn tally<'a>(goals: impl Iterator<Item = &'a GoalSnapshot>) -> Self {
        let mut summary = DashboardSummary {
            total_goals: 0,
            active_goals: 0,
            completed_goals: 0,
            paused_goals: 0,
            total_target: 0.0,
            total_current: 0.0,
            overall_progress: 0.0,
            categories: Vec::new(),
        };

        for goal in goals {
            summary.total_goals += 1;
            match goal.status {
                GoalStatus::Active => summary.active_goals += 1,
                GoalStatus::Completed => summary.completed_goals += 1,
                GoalStatus::Paused => summary.paused_goals += 1,
            }
            summary.total_target += goal.target_amount;
            summary.total_current += goal.current_amount;

            match summary.categories.iter_mut().find(|c| c.category == goal.category) {
                Some(totals) => {
                    totals.target_amount += goal.target_amount;
                    totals.current_amount += goal.current_amount;
                }
                None => summary.categories.push(CategoryTotals {
                    category: goal.category,
                    label: goal.category.label(),
                    target_amount: goal.target_amount,
                    current_amount: goal.current_amount,
                }),
            }
        }

        summary.overall_progress = overall_progress(summary.total_current, summary.total_target);
        summary
    }
}

/// Combined progress across goals; 0 when there is nothing to reach
pub fn overall_progress(total_current: f64, total_target: f64) -> f64 {
    if total_target > 0.0 {
        total_current / total_target * 100.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn goal(
        title: &str,
        category: GoalCategory,
        current: f64,
        target: f64,
        status: GoalStatus,
    ) -> GoalSnapshot {
        let date = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        GoalSnapshot::new(current, target, 100.0, 5.0, date)
            .with_title(title, category)
            .with_status(status)
    }

    fn goals() -> Vec<GoalSnapshot> {
        vec![
            goal("Cushion", GoalCategory::EmergencyFund, 3000.0, 6000.0, GoalStatus::Active),
            goal("Flat", GoalCategory::House, 20_000.0, 80_000.0, GoalStatus::Active),
            goal("Rainy day", GoalCategory::EmergencyFund, 5000.0, 4000.0, GoalStatus::Completed),
            goal("Lisbon", GoalCategory::Travel, 500.0, 10_000.0, GoalStatus::Paused),
        ]
    }

    #[test]
    fn test_dashboard_summary() {
        let summary = DashboardSummary::from_goals(&goals());

        assert_eq!(summary.total_goals, 4);
        assert_eq!(summary.active_goals, 2);
        assert_eq!(summary.completed_goals, 1);
        assert_eq!(summary.paused_goals, 1);
        assert_eq!(summary.total_target, 100_000.0);
        assert_eq!(summary.total_current, 28_500.0);
        assert!((summary.overall_progress - 28.5).abs() < 1e-12);

        let labels: Vec<_> = summary.categories.iter().map(|c| c.category).collect();
        assert_eq!(
            labels,
            vec![GoalCategory::EmergencyFund, GoalCategory::House, GoalCategory::Travel]
        );
        assert_eq!(summary.categories[0].target_amount, 10_000.0);
        assert_eq!(summary.categories[0].current_amount, 8_000.0);
    }

    #[test]
    fn test_weekly_report_active_only() {
        let summary = DashboardSummary::weekly_report(&goals());
        assert_eq!(summary.total_goals, 2);
        assert_eq!(summary.completed_goals, 0);
        assert_eq!(summary.total_target, 86_000.0);
        assert_eq!(summary.total_current, 23_000.0);
    }

    #[test]
    fn test_empty_summary() {
        let summary = DashboardSummary::from_goals(&[]);
        assert_eq!(summary.total_goals, 0);
        assert_eq!(summary.overall_progress, 0.0);
        assert!(summary.categories.is_empty());
    }

    #[test]
    fn test_overall_progress_not_capped() {
        assert_eq!(overall_progress(150.0, 100.0), 150.0);
        assert_eq!(overall_progress(150.0, 0.0), 0.0);
    }

    #[test]
    fn test_envelope_shape() {
        let annotated = AnnotatedGoal {
            goal: goal("Flat", GoalCategory::House, 20_000.0, 80_000.0, GoalStatus::Active),
            progress: 25.0,
            months_remaining: 48,
            projected_amount: 31_000.0,
        };
        let value = serde_json::to_value(GoalEnvelope::from(annotated)).unwrap();

        assert_eq!(value["goal"]["title"], "Flat");
        assert_eq!(value["goal"]["targetAmount"], 80_000.0);
        assert_eq!(value["goal"]["progress"], 25.0);
        assert_eq!(value["goal"]["monthsRemaining"], 48);
        assert_eq!(value["goal"]["projectedAmount"], 31_000.0);
    }
}
