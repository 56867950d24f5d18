//! Load goals from CSV exports
//!
//! Expected headers:
//! `title,category,currentAmount,targetAmount,monthlyContribution,expectedReturn,targetDate,status`

use csv::Reader;
use std::path::Path;

use super::{GoalRecord, GoalSnapshot};
use crate::error::LoadError;

/// Load all goals from a CSV file
pub fn load_goals<P: AsRef<Path>>(path: P) -> Result<Vec<GoalSnapshot>, LoadError> {
    let reader = Reader::from_path(path)?;
    collect_goals(reader)
}

/// Load goals from any reader (e.g., string buffer, request body)
pub fn load_goals_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<GoalSnapshot>, LoadError> {
    collect_goals(Reader::from_reader(reader))
}

fn collect_goals<R: std::io::Read>(mut reader: Reader<R>) -> Result<Vec<GoalSnapshot>, LoadError> {
    let mut goals = Vec::new();

    for (idx, result) in reader.deserialize().enumerate() {
        let record: GoalRecord = result?;
        let goal = GoalSnapshot::try_from(record).map_err(|source| {
            log::warn!("rejecting goal row {}: {}", idx + 1, source);
            LoadError::Goal { row: idx + 1, source }
        })?;
        goals.push(goal);
    }

    log::debug!("loaded {} goals", goals.len());
    Ok(goals)
}
