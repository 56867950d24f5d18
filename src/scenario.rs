//! Investment simulator and portfolio scenario comparison
//!
//! Runs the same step-wise projection used for goals over a horizon given in
//! years, either at a chosen return or at each preset portfolio's return.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Result;
use crate::goal::{check_annual_return, check_non_negative};
use crate::projection::{
    check_horizon, monthly_rate, project_months, ProjectionConfig, Trajectory, TrajectorySummary,
};

/// Share of a portfolio held in one asset class
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AssetAllocation {
    pub asset: &'static str,
    pub percentage: f64,
}

const fn alloc(asset: &'static str, percentage: f64) -> AssetAllocation {
    AssetAllocation { asset, percentage }
}

const CONSERVATIVE_MIX: &[AssetAllocation] = &[
    alloc("Fixed income", 80.0),
    alloc("Equities", 15.0),
    alloc("REITs", 5.0),
];

const MODERATE_MIX: &[AssetAllocation] = &[
    alloc("Fixed income", 50.0),
    alloc("Equities", 35.0),
    alloc("REITs", 10.0),
    alloc("International", 5.0),
];

const AGGRESSIVE_MIX: &[AssetAllocation] = &[
    alloc("Equities", 60.0),
    alloc("Fixed income", 20.0),
    alloc("REITs", 10.0),
    alloc("International", 10.0),
];

/// Preset portfolio profiles offered by the simulator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortfolioProfile {
    Conservative,
    Moderate,
    Aggressive,
}

impl PortfolioProfile {
    pub const ALL: [PortfolioProfile; 3] = [
        PortfolioProfile::Conservative,
        PortfolioProfile::Moderate,
        PortfolioProfile::Aggressive,
    ];

    /// Expected nominal annual return in percent
    pub fn expected_return_pct(&self) -> f64 {
        match self {
            PortfolioProfile::Conservative => 6.5,
            PortfolioProfile::Moderate => 9.2,
            PortfolioProfile::Aggressive => 12.8,
        }
    }

    /// Annualized volatility in percent (display only)
    pub fn risk_pct(&self) -> f64 {
        match self {
            PortfolioProfile::Conservative => 2.1,
            PortfolioProfile::Moderate => 4.8,
            PortfolioProfile::Aggressive => 8.5,
        }
    }

    pub fn allocation(&self) -> &'static [AssetAllocation] {
        match self {
            PortfolioProfile::Conservative => CONSERVATIVE_MIX,
            PortfolioProfile::Moderate => MODERATE_MIX,
            PortfolioProfile::Aggressive => AGGRESSIVE_MIX,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            PortfolioProfile::Conservative => "For savers who want safety and have low tolerance for risk",
            PortfolioProfile::Moderate => "Balance between risk and return for intermediate investors",
            PortfolioProfile::Aggressive => "For experienced investors seeking maximum growth",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PortfolioProfile::Conservative => "conservative",
            PortfolioProfile::Moderate => "moderate",
            PortfolioProfile::Aggressive => "aggressive",
        }
    }
}

impl fmt::Display for PortfolioProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for PortfolioProfile {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "conservative" => Ok(PortfolioProfile::Conservative),
            "moderate" => Ok(PortfolioProfile::Moderate),
            "aggressive" => Ok(PortfolioProfile::Aggressive),
            other => Err(format!(
                "unknown portfolio '{}' (expected conservative, moderate or aggressive)",
                other
            )),
        }
    }
}

/// Inputs for a simulator run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SimulationParams {
    pub initial_amount: f64,
    pub monthly_contribution: f64,
    pub horizon_years: u32,
    pub annual_return_pct: f64,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            initial_amount: 10_000.0,
            monthly_contribution: 1_000.0,
            horizon_years: 10,
            annual_return_pct: PortfolioProfile::Moderate.expected_return_pct(),
        }
    }
}

impl SimulationParams {
    pub fn months(&self) -> u32 {
        self.horizon_years.saturating_mul(12)
    }

    /// Same parameters at a different return
    pub fn at_rate(&self, annual_return_pct: f64) -> Self {
        Self { annual_return_pct, ..self.clone() }
    }
}

/// Full simulator output
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    pub params: SimulationParams,
    pub trajectory: Trajectory,
    pub summary: TrajectorySummary,
}

/// One row of a portfolio comparison
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioOutcome {
    pub profile: PortfolioProfile,
    pub expected_return_pct: f64,
    pub risk_pct: f64,
    pub summary: TrajectorySummary,
}

/// Runs simulator scenarios under a shared configuration
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new();
/// for outcome in runner.compare_profiles(&SimulationParams::default())? {
///     println!("{}: {:.2}", outcome.profile, outcome.summary.final_amount);
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    config: ProjectionConfig,
}

impl ScenarioRunner {
    /// Create runner with the default rate bounds
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ProjectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    fn validate(&self, params: &SimulationParams) -> Result<()> {
        check_non_negative("initial amount", params.initial_amount)?;
        check_non_negative("monthly contribution", params.monthly_contribution)?;
        check_annual_return(params.annual_return_pct, self.config.max_annual_return_pct)?;
        check_horizon(params.months(), self.config.max_horizon_months)?;
        Ok(())
    }

    /// Run a single simulation
    pub fn simulate(&self, params: &SimulationParams) -> Result<SimulationResult> {
        self.validate(params)?;

        let trajectory = project_months(
            params.initial_amount,
            params.monthly_contribution,
            monthly_rate(params.annual_return_pct),
            params.months(),
        );
        let summary = trajectory.summary();
        log::debug!(
            "simulated {} months at {}%: final {:.2}",
            summary.months,
            params.annual_return_pct,
            summary.final_amount
        );

        Ok(SimulationResult {
            params: params.clone(),
            trajectory,
            summary,
        })
    }

    /// Run the same parameters at several annual returns
    pub fn run_scenarios(
        &self,
        params: &SimulationParams,
        rates: &[f64],
    ) -> Result<Vec<SimulationResult>> {
        rates
            .iter()
            .map(|&rate| self.simulate(&params.at_rate(rate)))
            .collect()
    }

    /// Compare every preset portfolio for the given amounts and horizon
    pub fn compare_profiles(&self, params: &SimulationParams) -> Result<Vec<ScenarioOutcome>> {
        PortfolioProfile::ALL
            .iter()
            .map(|&profile| {
                let result = self.simulate(&params.at_rate(profile.expected_return_pct()))?;
                Ok(ScenarioOutcome {
                    profile,
                    expected_return_pct: profile.expected_return_pct(),
                    risk_pct: profile.risk_pct(),
                    summary: result.summary,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProjectionError;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_default_simulation() {
        let result = ScenarioRunner::new().simulate(&SimulationParams::default()).unwrap();

        assert_eq!(result.trajectory.len(), 121);
        assert_eq!(result.summary.months, 120);
        assert_eq!(result.summary.total_invested, 10_000.0 + 1_000.0 * 120.0);
        assert_abs_diff_eq!(result.summary.final_amount, 220_722.58, epsilon = 0.01);
        assert_abs_diff_eq!(
            result.summary.total_interest,
            result.summary.final_amount - 130_000.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_zero_year_horizon() {
        let params = SimulationParams { horizon_years: 0, ..Default::default() };
        let result = ScenarioRunner::new().simulate(&params).unwrap();
        assert_eq!(result.trajectory.len(), 1);
        assert_eq!(result.summary.final_amount, 10_000.0);
        assert_eq!(result.summary.total_interest, 0.0);
    }

    #[test]
    fn test_horizon_limit() {
        let runner = ScenarioRunner::new();

        let fifty = SimulationParams { horizon_years: 50, ..Default::default() };
        assert_eq!(runner.simulate(&fifty).unwrap().trajectory.len(), 601);

        for years in [51, 20_000, u32::MAX] {
            let params = SimulationParams { horizon_years: years, ..Default::default() };
            assert!(matches!(
                runner.simulate(&params),
                Err(ProjectionError::InvalidHorizon(_))
            ));
            assert!(matches!(
                runner.compare_profiles(&params),
                Err(ProjectionError::InvalidHorizon(_))
            ));
        }
    }

    #[test]
    fn test_relaxed_horizon_limit() {
        let runner = ScenarioRunner::with_config(ProjectionConfig {
            max_horizon_months: 100 * 12,
            ..Default::default()
        });
        let params = SimulationParams { horizon_years: 80, ..Default::default() };
        let result = runner.simulate(&params).unwrap();
        assert_eq!(result.summary.months, 960);
        assert!(result.summary.final_amount.is_finite());
    }

    #[test]
    fn test_scenario_runner_batch() {
        let runner = ScenarioRunner::new();
        let params = SimulationParams::default();

        let results = runner.run_scenarios(&params, &[3.0, 6.0, 9.0]).unwrap();
        assert_eq!(results.len(), 3);

        // Higher return should result in a higher final amount
        assert!(results[2].summary.final_amount > results[1].summary.final_amount);
        assert!(results[1].summary.final_amount > results[0].summary.final_amount);
        assert!(results.iter().all(|r| r.summary.total_invested == 130_000.0));
    }

    #[test]
    fn test_scenario_rejects_out_of_range_rate() {
        let runner = ScenarioRunner::new();
        let err = runner
            .run_scenarios(&SimulationParams::default(), &[5.0, 31.0])
            .unwrap_err();
        assert!(matches!(err, ProjectionError::InvalidRate { .. }));

        let negative = SimulationParams { initial_amount: -1.0, ..Default::default() };
        assert!(runner.simulate(&negative).is_err());
    }

    #[test]
    fn test_compare_profiles() {
        let outcomes = ScenarioRunner::new()
            .compare_profiles(&SimulationParams::default())
            .unwrap();

        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[0].profile, PortfolioProfile::Conservative);
        assert_abs_diff_eq!(outcomes[0].summary.final_amount, 187_524.99, epsilon = 0.01);
        assert_abs_diff_eq!(outcomes[1].summary.final_amount, 220_722.58, epsilon = 0.01);
        assert_abs_diff_eq!(outcomes[2].summary.final_amount, 276_880.52, epsilon = 0.01);
    }

    #[test]
    fn test_profile_presets() {
        for profile in PortfolioProfile::ALL {
            let total: f64 = profile.allocation().iter().map(|a| a.percentage).sum();
            assert_eq!(total, 100.0);
            assert_eq!(profile.as_str().parse::<PortfolioProfile>().unwrap(), profile);
        }
        assert_eq!(
            " Aggressive ".parse::<PortfolioProfile>().unwrap(),
            PortfolioProfile::Aggressive
        );
        assert!("yolo".parse::<PortfolioProfile>().is_err());
    }

    #[test]
    fn test_params_json_defaults() {
        let params: SimulationParams = serde_json::from_str(r#"{"horizonYears": 5}"#).unwrap();
        assert_eq!(params.horizon_years, 5);
        assert_eq!(params.initial_amount, 10_000.0);
        assert_eq!(params.annual_return_pct, 9.2);
    }
}
