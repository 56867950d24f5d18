//! Annotate every goal in a CSV export
//!
//! Outputs progress, months remaining and projected amount per goal, plus
//! the dashboard totals

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;

use goal_projection::goal::load_goals;
use goal_projection::projection::parse_target_date;
use goal_projection::{
    Clock, DashboardSummary, FixedClock, ProjectionConfig, ProjectionEngine, SystemClock,
};

#[derive(Debug, Parser)]
#[command(name = "run_goals", about = "Annotate goals from a CSV export")]
struct Args {
    /// Goals CSV (title,category,currentAmount,targetAmount,monthlyContribution,expectedReturn,targetDate,status)
    input: PathBuf,

    #[arg(long, default_value = "goal_annotations.csv")]
    output: PathBuf,

    /// Evaluate as of this date instead of now
    #[arg(long)]
    as_of: Option<String>,

    /// Allow expected returns up to this percentage
    #[arg(long, default_value_t = ProjectionConfig::default().max_annual_return_pct)]
    max_return: f64,

    /// Reject goals whose target date is more than this many months away
    #[arg(long, default_value_t = ProjectionConfig::default().max_horizon_months)]
    max_horizon: u32,
}

#[derive(Debug, Serialize)]
struct AnnotationRow<'a> {
    #[serde(rename = "Title")]
    title: &'a str,
    #[serde(rename = "Category")]
    category: &'static str,
    #[serde(rename = "Status")]
    status: &'static str,
    #[serde(rename = "Current")]
    current: f64,
    #[serde(rename = "Target")]
    target: f64,
    #[serde(rename = "ProgressPct")]
    progress: f64,
    #[serde(rename = "MonthsRemaining")]
    months_remaining: u32,
    #[serde(rename = "Projected")]
    projected: f64,
    #[serde(rename = "OnTrack")]
    on_track: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let start = Instant::now();
    println!("Loading goals from {}...", args.input.display());

    let goals = load_goals(&args.input)
        .with_context(|| format!("failed to load {}", args.input.display()))?;
    println!("Loaded {} goals in {:?}", goals.len(), start.elapsed());

    let now = match args.as_of.as_deref() {
        Some(date) => parse_target_date(date)?,
        None => SystemClock.now(),
    };
    let engine = ProjectionEngine::new(
        ProjectionConfig {
            max_annual_return_pct: args.max_return,
            max_horizon_months: args.max_horizon,
        },
        FixedClock(now),
    );

    println!("Annotating as of {}...", now.format("%Y-%m-%d"));
    let proj_start = Instant::now();

    // Annotate in parallel
    let annotations = engine
        .annotate_all(&goals)
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;

    println!("Annotations complete in {:?}", proj_start.elapsed());

    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("failed to create {}", args.output.display()))?;
    for annotated in &annotations {
        let goal = &annotated.goal;
        writer.serialize(AnnotationRow {
            title: &goal.title,
            category: goal.category.label(),
            status: goal.status.as_str(),
            current: goal.current_amount,
            target: goal.target_amount,
            progress: annotated.progress,
            months_remaining: annotated.months_remaining,
            projected: annotated.projected_amount,
            on_track: annotated.projected_amount >= goal.target_amount,
        })?;
    }
    writer.flush()?;
    println!("Output written to {}", args.output.display());

    let summary = DashboardSummary::from_goals(&goals);
    println!("\nDashboard Summary:");
    println!(
        "  Goals: {} ({} active, {} completed, {} paused)",
        summary.total_goals, summary.active_goals, summary.completed_goals, summary.paused_goals
    );
    println!(
        "  Saved: ${:.2} of ${:.2} ({:.1}%)",
        summary.total_current, summary.total_target, summary.overall_progress
    );
    for category in &summary.categories {
        println!(
            "  {:<16} ${:>14.2} / ${:>14.2}",
            category.label, category.current_amount, category.target_amount
        );
    }

    let weekly = DashboardSummary::weekly_report(&goals);
    println!("\nWeekly report (active goals): {:.1}% overall", weekly.overall_progress);

    println!("\nTotal time: {:?}", start.elapsed());
    Ok(())
}
