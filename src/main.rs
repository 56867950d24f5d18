//! Goal Projection CLI
//!
//! Command-line interface for projecting goals and running the simulator

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};

use goal_projection::projection::{
    parse_target_date, required_annual_return, required_monthly_contribution, ProjectionPoint,
};
use goal_projection::{
    monthly_rate, Clock, FixedClock, GoalSnapshot, PortfolioProfile, ProjectionConfig,
    ProjectionEngine, ScenarioRunner, SimulationParams, SystemClock,
};

#[derive(Debug, Parser)]
#[command(
    name = "goal_projection",
    version,
    about = "Project savings goals and compare investment scenarios"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Project a goal month by month up to its target date
    Project {
        /// Amount already saved
        #[arg(long, default_value_t = 0.0)]
        current: f64,
        /// Amount to reach
        #[arg(long)]
        target: f64,
        /// Monthly contribution
        #[arg(long, default_value_t = 0.0)]
        contribution: f64,
        /// Expected annual return in percent
        #[arg(long = "return", default_value_t = 0.0)]
        annual_return: f64,
        /// Target date (YYYY-MM-DD or RFC 3339)
        #[arg(long)]
        target_date: String,
        /// Evaluate as of this date instead of now
        #[arg(long)]
        as_of: Option<String>,
        /// Write every month to this CSV file
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Run the investment simulator
    Simulate {
        #[arg(long, default_value_t = 10_000.0)]
        initial: f64,
        #[arg(long, default_value_t = 1_000.0)]
        contribution: f64,
        #[arg(long, default_value_t = 10)]
        years: u32,
        /// Preset portfolio supplying the expected return
        #[arg(long, default_value_t = PortfolioProfile::Moderate)]
        portfolio: PortfolioProfile,
        /// Override the portfolio's expected annual return (percent)
        #[arg(long = "return")]
        annual_return: Option<f64>,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Compare the preset portfolios side by side
    Compare {
        #[arg(long, default_value_t = 10_000.0)]
        initial: f64,
        #[arg(long, default_value_t = 1_000.0)]
        contribution: f64,
        #[arg(long, default_value_t = 10)]
        years: u32,
    },
    /// Work out the contribution or return needed to reach a target
    Solve {
        #[arg(long, default_value_t = 0.0)]
        current: f64,
        #[arg(long)]
        target: f64,
        #[arg(long, default_value_t = 0.0)]
        contribution: f64,
        #[arg(long = "return", default_value_t = 0.0)]
        annual_return: f64,
        #[arg(long)]
        target_date: String,
        #[arg(long)]
        as_of: Option<String>,
    },
}

/// CSV row for trajectory output
#[derive(Debug, Serialize)]
struct PointRow {
    #[serde(rename = "Month")]
    month: u32,
    #[serde(rename = "Invested")]
    invested: f64,
    #[serde(rename = "Projected")]
    projected: f64,
    #[serde(rename = "Interest")]
    interest: f64,
}

fn main() -> Result<()> {
    env_logger::init();

    match Cli::parse().command {
        Command::Project {
            current,
            target,
            contribution,
            annual_return,
            target_date,
            as_of,
            output,
        } => {
            let goal = GoalSnapshot::new(
                current,
                target,
                contribution,
                annual_return,
                parse_target_date(&target_date)?,
            );
            project(&goal, as_of.as_deref(), output.as_deref())
        }
        Command::Simulate {
            initial,
            contribution,
            years,
            portfolio,
            annual_return,
            output,
        } => {
            let params = SimulationParams {
                initial_amount: initial,
                monthly_contribution: contribution,
                horizon_years: years,
                annual_return_pct: annual_return.unwrap_or(portfolio.expected_return_pct()),
            };
            simulate(&params, output.as_deref())
        }
        Command::Compare {
            initial,
            contribution,
            years,
        } => {
            let params = SimulationParams {
                initial_amount: initial,
                monthly_contribution: contribution,
                horizon_years: years,
                ..Default::default()
            };
            compare(&params)
        }
        Command::Solve {
            current,
            target,
            contribution,
            annual_return,
            target_date,
            as_of,
        } => {
            let goal = GoalSnapshot::new(
                current,
                target,
                contribution,
                annual_return,
                parse_target_date(&target_date)?,
            );
            solve(&goal, as_of.as_deref())
        }
    }
}

fn pinned_clock(as_of: Option<&str>) -> Result<FixedClock> {
    let now = match as_of {
        Some(date) => parse_target_date(date)?,
        None => SystemClock.now(),
    };
    Ok(FixedClock(now))
}

fn project(goal: &GoalSnapshot, as_of: Option<&str>, output: Option<&Path>) -> Result<()> {
    let engine = ProjectionEngine::new(ProjectionConfig::default(), pinned_clock(as_of)?);
    let annotated = engine.annotate(goal)?;
    let trajectory = engine.trajectory(goal)?;

    println!("Goal projection as of {}", engine.now().format("%Y-%m-%d"));
    println!("  Target: ${:.2} by {}", goal.target_amount, goal.target_date.format("%Y-%m-%d"));
    println!("  Progress: {:.1}%", annotated.progress);
    println!("  Months remaining: {}", annotated.months_remaining);
    println!();

    print_points(trajectory.iter(), 24);

    let summary = trajectory.summary();
    println!("\nSummary:");
    println!("  Projected at target date: ${:.2}", summary.final_amount);
    println!("  Total invested: ${:.2}", summary.total_invested);
    println!("  Total interest: ${:.2}", summary.total_interest);
    match trajectory.month_reaching(goal.target_amount) {
        Some(month) => println!("  Target reached in month {}", month),
        None => println!(
            "  Short of target by ${:.2}",
            goal.target_amount - summary.final_amount
        ),
    }

    if let Some(path) = output {
        write_points(path, trajectory.iter())?;
        println!("\nFull trajectory written to: {}", path.display());
    }
    Ok(())
}

fn simulate(params: &SimulationParams, output: Option<&Path>) -> Result<()> {
    let result = ScenarioRunner::new().simulate(params)?;

    println!(
        "Simulation: ${:.2} initial, ${:.2}/month, {} years at {}% a year",
        params.initial_amount,
        params.monthly_contribution,
        params.horizon_years,
        params.annual_return_pct
    );
    println!();

    // Year-end rows only
    print_points(
        result.trajectory.iter().filter(|p| p.month_index % 12 == 0),
        usize::MAX,
    );

    println!("\nSummary:");
    println!("  Final amount: ${:.2}", result.summary.final_amount);
    println!("  Total invested: ${:.2}", result.summary.total_invested);
    println!("  Total interest: ${:.2}", result.summary.total_interest);

    if let Some(path) = output {
        write_points(path, result.trajectory.iter())?;
        println!("\nFull trajectory written to: {}", path.display());
    }
    Ok(())
}

fn compare(params: &SimulationParams) -> Result<()> {
    let outcomes = ScenarioRunner::new().compare_profiles(params)?;

    println!(
        "Portfolio comparison: ${:.2} initial, ${:.2}/month, {} years",
        params.initial_amount, params.monthly_contribution, params.horizon_years
    );
    println!(
        "{:<14} {:>8} {:>8} {:>16} {:>16}",
        "Portfolio", "Return", "Risk", "Final", "Interest"
    );
    println!("{}", "-".repeat(66));
    for outcome in &outcomes {
        println!(
            "{:<14} {:>7.1}% {:>7.1}% {:>16.2} {:>16.2}",
            outcome.profile,
            outcome.expected_return_pct,
            outcome.risk_pct,
            outcome.summary.final_amount,
            outcome.summary.total_interest,
        );
    }
    println!();
    for profile in PortfolioProfile::ALL {
        let mix: Vec<String> = profile
            .allocation()
            .iter()
            .map(|a| format!("{} {}%", a.asset, a.percentage))
            .collect();
        println!("  {:<14} {}", profile, mix.join(", "));
        println!("  {:<14} {}", "", profile.description());
    }
    Ok(())
}

fn solve(goal: &GoalSnapshot, as_of: Option<&str>) -> Result<()> {
    let engine = ProjectionEngine::new(ProjectionConfig::default(), pinned_clock(as_of)?);
    engine.validate(goal)?;
    let months = engine.months_remaining(goal);

    println!("Months remaining: {}", months);

    let needed = required_monthly_contribution(
        goal.current_amount,
        goal.target_amount,
        monthly_rate(goal.expected_annual_return),
        months,
    )?;
    println!(
        "  Contribution needed at {}%: ${:.2}/month (planned ${:.2})",
        goal.expected_annual_return, needed, goal.monthly_contribution
    );

    let max_pct = engine.config().max_annual_return_pct;
    match required_annual_return(
        goal.current_amount,
        goal.monthly_contribution,
        goal.target_amount,
        months,
        max_pct,
    )? {
        Some(pct) => println!("  Return needed with planned contribution: {:.2}% a year", pct),
        None => println!("  Not reachable with planned contribution below {}% a year", max_pct),
    }
    Ok(())
}

fn print_points<'a>(points: impl Iterator<Item = &'a ProjectionPoint>, limit: usize) {
    println!("{:>5} {:>14} {:>14} {:>14}", "Month", "Invested", "Projected", "Interest");
    println!("{}", "-".repeat(50));

    let mut shown = 0;
    let mut hidden = 0;
    for point in points {
        if shown < limit {
            println!(
                "{:>5} {:>14.2} {:>14.2} {:>14.2}",
                point.month_index,
                point.invested_total,
                point.projected_total,
                point.interest(),
            );
            shown += 1;
        } else {
            hidden += 1;
        }
    }
    if hidden > 0 {
        println!("... ({} more months)", hidden);
    }
}

fn write_points<'a>(path: &Path, points: impl Iterator<Item = &'a ProjectionPoint>) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("unable to create {}", path.display()))?;
    for point in points {
        writer.serialize(PointRow {
            month: point.month_index,
            invested: point.invested_total,
            projected: point.projected_total,
            interest: point.interest(),
        })?;
    }
    writer.flush()?;
    Ok(())
}
