//! Goal Projection - compound-growth engine for personal savings goals
//!
//! This library provides:
//! - Month-by-month goal trajectories with contributions compounded monthly
//! - Closed-form future value, progress and completion checks
//! - Contribution handling and status transitions
//! - Dashboard and weekly-report aggregates
//! - Investment simulator with preset portfolio comparison
//! - Solvers for the contribution or return needed to hit a target

pub mod clock;
pub mod error;
pub mod goal;
pub mod progress;
pub mod projection;
pub mod scenario;
pub mod summary;

// Re-export commonly used types
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{LoadError, ProjectionError};
pub use goal::{GoalCategory, GoalRecord, GoalSnapshot, GoalStatus};
pub use progress::{apply_contribution, is_goal_complete, progress_percent, ContributionOutcome};
pub use projection::{
    monthly_rate, months_remaining, projected_future_value, trajectory, ProjectionConfig,
    ProjectionEngine, ProjectionPoint, Trajectory,
};
pub use scenario::{PortfolioProfile, ScenarioRunner, SimulationParams};
pub use summary::{AnnotatedGoal, DashboardSummary, GoalEnvelope};
