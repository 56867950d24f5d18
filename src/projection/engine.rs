//! Core projection engine for monthly goal trajectories

use chrono::{DateTime, Utc};
use rayon::prelude::*;

use super::rates::{monthly_rate, months_remaining};
use super::state::ProjectionSteps;
use super::points::Trajectory;
use crate::clock::{Clock, SystemClock};
use crate::error::{ProjectionError, Result};
use crate::goal::{GoalSnapshot, MAX_ANNUAL_RETURN_PCT};
use crate::progress::{self, ContributionOutcome};
use crate::summary::AnnotatedGoal;

/// Future value of a lump sum plus an ordinary annuity of monthly contributions.
///
/// `rate` is the monthly decimal rate. A zero rate takes the linear branch,
/// since the annuity factor divides by the rate.
pub fn projected_future_value(
    current_amount: f64,
    monthly_contribution: f64,
    rate: f64,
    months: i32,
) -> f64 {
    if months <= 0 {
        return current_amount;
    }
    if rate == 0.0 {
        return current_amount + monthly_contribution * months as f64;
    }
    let growth = (1.0 + rate).powi(months);
    current_amount * growth + monthly_contribution * ((growth - 1.0) / rate)
}

/// Step-wise projection for months `0..=months`
pub fn project_months(
    current_amount: f64,
    monthly_contribution: f64,
    rate: f64,
    months: u32,
) -> Trajectory {
    Trajectory::from_points(
        ProjectionSteps::new(current_amount, monthly_contribution, rate, months).collect(),
    )
}

/// Project a goal from `now` to its target date, one point per month
pub fn trajectory(goal: &GoalSnapshot, now: DateTime<Utc>) -> Result<Trajectory> {
    goal.validate()?;
    let months = check_horizon(months_remaining(goal.target_date, now), MAX_HORIZON_MONTHS)?;
    Ok(goal_trajectory(goal, months))
}

fn goal_trajectory(goal: &GoalSnapshot, months: u32) -> Trajectory {
    let rate = monthly_rate(goal.expected_annual_return);
    log::debug!(
        "projecting '{}' over {} months at monthly rate {:.6}",
        goal.title,
        months,
        rate
    );
    project_months(goal.current_amount, goal.monthly_contribution, rate, months)
}

/// Longest horizon projected by default (50 years)
pub const MAX_HORIZON_MONTHS: u32 = 600;

pub(crate) fn check_horizon(months: u32, max_months: u32) -> Result<u32> {
    if months > max_months {
        return Err(ProjectionError::InvalidHorizon(format!(
            "{} months exceeds the limit of {} months",
            months, max_months
        )));
    }
    Ok(months)
}

pub(crate) fn horizon_months(months: u32) -> Result<i32> {
    i32::try_from(months)
        .map_err(|_| ProjectionError::InvalidHorizon(format!("{} months is out of range", months)))
}

/// Configuration for the projection engine
#[derive(Debug, Clone)]
pub struct ProjectionConfig {
    /// Highest expected annual return (percent) accepted on a goal
    pub max_annual_return_pct: f64,

    /// Longest horizon, in months, a trajectory may cover
    pub max_horizon_months: u32,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            max_annual_return_pct: MAX_ANNUAL_RETURN_PCT,
            max_horizon_months: MAX_HORIZON_MONTHS,
        }
    }
}

/// Projection engine bound to a configuration and a clock
#[derive(Debug, Clone)]
pub struct ProjectionEngine<C: Clock = SystemClock> {
    config: ProjectionConfig,
    clock: C,
}

impl ProjectionEngine<SystemClock> {
    /// Engine reading wall-clock time
    pub fn with_system_clock(config: ProjectionConfig) -> Self {
        Self::new(config, SystemClock)
    }
}

impl Default for ProjectionEngine<SystemClock> {
    fn default() -> Self {
        Self::with_system_clock(ProjectionConfig::default())
    }
}

impl<C: Clock> ProjectionEngine<C> {
    /// Create a new projection engine with given config and clock
    pub fn new(config: ProjectionConfig, clock: C) -> Self {
        Self { config, clock }
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn validate(&self, goal: &GoalSnapshot) -> Result<()> {
        goal.validate_with_limit(self.config.max_annual_return_pct)
    }

    pub fn months_remaining(&self, goal: &GoalSnapshot) -> u32 {
        months_remaining(goal.target_date, self.clock.now())
    }

    /// Months remaining, rejected when beyond the configured horizon
    fn horizon(&self, goal: &GoalSnapshot) -> Result<u32> {
        check_horizon(self.months_remaining(goal), self.config.max_horizon_months)
    }

    /// Month-by-month trajectory up to the goal's target date
    pub fn trajectory(&self, goal: &GoalSnapshot) -> Result<Trajectory> {
        self.validate(goal)?;
        Ok(goal_trajectory(goal, self.horizon(goal)?))
    }

    /// Closed-form value at the target date, as shown next to each goal
    pub fn projected_amount(&self, goal: &GoalSnapshot) -> Result<f64> {
        self.validate(goal)?;
        let months = horizon_months(self.horizon(goal)?)?;
        Ok(projected_future_value(
            goal.current_amount,
            goal.monthly_contribution,
            monthly_rate(goal.expected_annual_return),
            months,
        ))
    }

    /// Decorate a goal with progress, months remaining and projected amount
    pub fn annotate(&self, goal: &GoalSnapshot) -> Result<AnnotatedGoal> {
        self.validate(goal)?;

        // Read the clock once so all derived figures agree
        let months_remaining = self.horizon(goal)?;
        let projected_amount = projected_future_value(
            goal.current_amount,
            goal.monthly_contribution,
            monthly_rate(goal.expected_annual_return),
            horizon_months(months_remaining)?,
        );

        Ok(AnnotatedGoal {
            goal: goal.clone(),
            progress: progress::progress_percent(goal.current_amount, goal.target_amount)?,
            months_remaining,
            projected_amount,
        })
    }

    /// Annotate many goals in parallel, preserving order
    pub fn annotate_all(&self, goals: &[GoalSnapshot]) -> Vec<Result<AnnotatedGoal>> {
        goals.par_iter().map(|goal| self.annotate(goal)).collect()
    }

    /// Add a one-off contribution; see [`progress::apply_contribution`]
    pub fn apply_contribution(
        &self,
        goal: &GoalSnapshot,
        amount: f64,
    ) -> Result<ContributionOutcome> {
        progress::apply_contribution(goal, amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::goal::GoalStatus;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
    }

    /// Goal whose target date is exactly `months` 30-day blocks away
    fn goal_in(
        months: i64,
        current: f64,
        target: f64,
        contribution: f64,
        annual: f64,
    ) -> GoalSnapshot {
        let target_date = now() + Duration::days(30 * months);
        GoalSnapshot::new(current, target, contribution, annual, target_date)
    }

    fn engine() -> ProjectionEngine<FixedClock> {
        ProjectionEngine::new(ProjectionConfig::default(), FixedClock(now()))
    }

    /// Step-wise reference: grow, then contribute
    fn reference_totals(current: f64, contribution: f64, rate: f64, months: u32) -> Vec<f64> {
        let mut total = current;
        let mut totals = vec![total];
        for _ in 0..months {
            total = total * (1.0 + rate) + contribution;
            totals.push(total);
        }
        totals
    }

    #[test]
    fn test_future_value_scenario_a() {
        let rate = monthly_rate(12.0);
        let fv = projected_future_value(1000.0, 200.0, rate, 12);
        assert_abs_diff_eq!(fv, 3663.33, epsilon = 0.01);
    }

    #[test]
    fn test_future_value_non_positive_months() {
        assert_eq!(projected_future_value(1234.5, 100.0, 0.01, 0), 1234.5);
        assert_eq!(projected_future_value(1234.5, 100.0, 0.01, -7), 1234.5);
    }

    #[test]
    fn test_zero_rate_is_linear() {
        for months in [0, 1, 7, 120, 600] {
            assert_eq!(
                projected_future_value(2500.0, 125.0, 0.0, months),
                2500.0 + 125.0 * months as f64
            );
        }
        assert!(projected_future_value(0.0, 1.0, monthly_rate(0.0), 12).is_finite());
    }

    #[test]
    fn test_trajectory_matches_stepwise_reference() {
        let goal = goal_in(12, 1000.0, 5000.0, 200.0, 12.0);
        let result = trajectory(&goal, now()).unwrap();

        let expected = reference_totals(1000.0, 200.0, monthly_rate(12.0), 12);
        assert_eq!(result.len(), 13);
        for (point, total) in result.iter().zip(&expected) {
            assert_eq!(point.projected_total, *total);
        }
        assert_abs_diff_eq!(result.summary().final_amount, 3663.33, epsilon = 0.01);
    }

    #[test]
    fn test_long_trajectory_close_to_closed_form() {
        let goal = goal_in(600, 10_000.0, 1_000_000.0, 850.0, 11.0);
        let result = trajectory(&goal, now()).unwrap();
        let closed = projected_future_value(10_000.0, 850.0, monthly_rate(11.0), 600);
        assert_relative_eq!(result.summary().final_amount, closed, max_relative = 1e-9);
    }

    #[test]
    fn test_zero_horizon_single_point() {
        let past = GoalSnapshot::new(4200.0, 9000.0, 300.0, 7.0, now() - Duration::days(5));
        let result = trajectory(&past, now()).unwrap();

        assert_eq!(result.len(), 1);
        let point = result.points[0];
        assert_eq!(point.month_index, 0);
        assert_eq!(point.invested_total, 4200.0);
        assert_eq!(point.projected_total, 4200.0);
    }

    #[test]
    fn test_base_case_and_invested_additivity() {
        let goal = goal_in(36, 750.0, 20_000.0, 250.0, 9.0);
        let result = trajectory(&goal, now()).unwrap();

        assert_eq!(result.points[0].projected_total, 750.0);
        for (k, point) in result.iter().enumerate() {
            assert_eq!(point.month_index as usize, k);
            assert_eq!(point.invested_total, 750.0 + 250.0 * k as f64);
        }
    }

    #[test]
    fn test_trajectory_monotonic() {
        for (contribution, annual) in [(0.0, 0.0), (0.0, 5.0), (100.0, 0.0), (400.0, 30.0)] {
            let goal = goal_in(120, 1000.0, 50_000.0, contribution, annual);
            let result = trajectory(&goal, now()).unwrap();
            for pair in result.points.windows(2) {
                assert!(pair[1].projected_total >= pair[0].projected_total);
                assert!(pair[1].invested_total >= pair[0].invested_total);
            }
        }
    }

    #[test]
    fn test_scenario_b_flat_goal() {
        let goal = goal_in(10, 5000.0, 5000.0, 0.0, 0.0);
        let result = trajectory(&goal, now()).unwrap();

        assert_eq!(result.len(), 11);
        assert!(result.iter().all(|p| p.projected_total == 5000.0));
        assert_eq!(result.month_reaching(goal.target_amount), Some(0));
        assert!(progress::is_goal_complete(goal.current_amount, goal.target_amount));
    }

    #[test]
    fn test_trajectory_rejects_invalid_goal() {
        let goal = goal_in(12, 1000.0, 5000.0, 200.0, 35.0);
        assert!(matches!(
            trajectory(&goal, now()),
            Err(ProjectionError::InvalidRate { .. })
        ));
    }

    #[test]
    fn test_engine_uses_clock() {
        let goal = goal_in(24, 1000.0, 10_000.0, 300.0, 6.0);
        let engine = engine();

        assert_eq!(engine.months_remaining(&goal), 24);
        assert_eq!(engine.trajectory(&goal).unwrap(), trajectory(&goal, now()).unwrap());

        let later = ProjectionEngine::new(
            ProjectionConfig::default(),
            FixedClock(now() + Duration::days(300)),
        );
        assert_eq!(later.months_remaining(&goal), 14);
    }

    #[test]
    fn test_relaxed_rate_limit() {
        let goal = goal_in(12, 1000.0, 5000.0, 200.0, 40.0);
        assert!(engine().trajectory(&goal).is_err());

        let relaxed = ProjectionEngine::new(
            ProjectionConfig {
                max_annual_return_pct: 50.0,
                ..Default::default()
            },
            FixedClock(now()),
        );
        assert_eq!(relaxed.trajectory(&goal).unwrap().len(), 13);
    }

    #[test]
    fn test_horizon_limit() {
        let at_limit = goal_in(600, 1000.0, 50_000.0, 100.0, 5.0);
        assert_eq!(trajectory(&at_limit, now()).unwrap().len(), 601);
        assert_eq!(engine().trajectory(&at_limit).unwrap().len(), 601);
        assert!(engine().annotate(&at_limit).is_ok());

        let beyond = goal_in(601, 1000.0, 50_000.0, 100.0, 5.0);
        assert!(matches!(
            trajectory(&beyond, now()),
            Err(ProjectionError::InvalidHorizon(_))
        ));
        assert!(matches!(
            engine().trajectory(&beyond),
            Err(ProjectionError::InvalidHorizon(_))
        ));
        assert!(matches!(
            engine().projected_amount(&beyond),
            Err(ProjectionError::InvalidHorizon(_))
        ));
        assert!(matches!(
            engine().annotate(&beyond),
            Err(ProjectionError::InvalidHorizon(_))
        ));
        // Out-of-range horizons are still reported as a plain count
        assert_eq!(engine().months_remaining(&beyond), 601);
    }

    #[test]
    fn test_far_target_date_rejected() {
        let goal = GoalSnapshot::new(
            1000.0,
            50_000.0,
            100.0,
            5.0,
            Utc.with_ymd_and_hms(9999, 12, 31, 0, 0, 0).unwrap(),
        );
        assert!(matches!(
            engine().trajectory(&goal),
            Err(ProjectionError::InvalidHorizon(_))
        ));
    }

    #[test]
    fn test_relaxed_horizon_limit() {
        let goal = goal_in(601, 1000.0, 50_000.0, 100.0, 5.0);
        let relaxed = ProjectionEngine::new(
            ProjectionConfig {
                max_horizon_months: 1200,
                ..Default::default()
            },
            FixedClock(now()),
        );
        assert_eq!(relaxed.trajectory(&goal).unwrap().len(), 602);
    }

    #[test]
    fn test_annotate() {
        let goal = goal_in(12, 1000.0, 4000.0, 200.0, 12.0);
        let annotated = engine().annotate(&goal).unwrap();

        assert_eq!(annotated.months_remaining, 12);
        assert_abs_diff_eq!(annotated.progress, 25.0, epsilon = 1e-12);
        assert_abs_diff_eq!(annotated.projected_amount, 3663.33, epsilon = 0.01);
        assert_eq!(
            annotated.projected_amount,
            engine().projected_amount(&goal).unwrap()
        );
    }

    #[test]
    fn test_annotate_past_goal_reports_current_amount() {
        let goal = GoalSnapshot::new(800.0, 1000.0, 50.0, 10.0, now() - Duration::days(90))
            .with_status(GoalStatus::Paused);
        let annotated = engine().annotate(&goal).unwrap();

        assert_eq!(annotated.months_remaining, 0);
        assert_eq!(annotated.projected_amount, 800.0);
        assert_eq!(annotated.goal.status, GoalStatus::Paused);
    }

    #[test]
    fn test_annotate_all_preserves_order() {
        let goals: Vec<_> = (1..=50)
            .map(|i| goal_in(i, 100.0 * i as f64, 10_000.0, 10.0, 5.0))
            .collect();
        let mut with_bad = goals.clone();
        with_bad.push(goal_in(12, 100.0, -1.0, 10.0, 5.0));

        let results = engine().annotate_all(&with_bad);
        assert_eq!(results.len(), 51);
        for (i, result) in results.iter().take(50).enumerate() {
            assert_eq!(result.as_ref().unwrap().months_remaining, i as u32 + 1);
        }
        assert!(results[50].is_err());
    }
}
