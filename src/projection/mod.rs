//! Compound-growth projection for savings goals

mod engine;
mod rates;
mod solver;
mod state;
mod points;

pub use engine::{
    project_months, projected_future_value, trajectory, ProjectionConfig, ProjectionEngine,
    MAX_HORIZON_MONTHS,
};
pub(crate) use engine::check_horizon;
pub use rates::{monthly_rate, months_remaining, parse_target_date, DAYS_PER_MONTH};
pub use solver::{required_annual_return, required_monthly_contribution};
pub use state::{ProjectionState, ProjectionSteps};
pub use points::{ProjectionPoint, Trajectory, TrajectorySummary};
