//! Running state for month-by-month compounding

use super::points::ProjectionPoint;

/// Balance of a goal at a point in time during projection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionState {
    /// Elapsed months (0 = today)
    pub month_index: u32,

    /// Principal paid in so far, without growth
    pub invested_total: f64,

    /// Compounded balance
    pub projected_total: f64,
}

impl ProjectionState {
    /// Initialize state from the amount already saved
    pub fn from_amount(current_amount: f64) -> Self {
        Self {
            month_index: 0,
            invested_total: current_amount,
            projected_total: current_amount,
        }
    }

    /// Grow one month, then add that month's contribution
    pub fn advance_month(&mut self, rate: f64, monthly_contribution: f64) {
        self.month_index += 1;
        self.projected_total = self.projected_total * (1.0 + rate) + monthly_contribution;
        self.invested_total += monthly_contribution;
    }

    pub fn point(&self) -> ProjectionPoint {
        ProjectionPoint {
            month_index: self.month_index,
            invested_total: self.invested_total,
            projected_total: self.projected_total,
        }
    }
}

/// Lazy, restartable sequence of projection points for months `0..=months`.
///
/// Clone before iterating to replay the same sequence.
#[derive(Debug, Clone)]
pub struct ProjectionSteps {
    state: ProjectionState,
    rate: f64,
    monthly_contribution: f64,
    months: u32,
    started: bool,
}

impl ProjectionSteps {
    pub fn new(current_amount: f64, monthly_contribution: f64, rate: f64, months: u32) -> Self {
        Self {
            state: ProjectionState::from_amount(current_amount),
            rate,
            monthly_contribution,
            months,
            started: false,
        }
    }

    fn remaining(&self) -> usize {
        let left = self.months - self.state.month_index;
        if self.started {
            left as usize
        } else {
            left as usize + 1
        }
    }
}

impl Iterator for ProjectionSteps {
    type Item = ProjectionPoint;

    fn next(&mut self) -> Option<ProjectionPoint> {
        if !self.started {
            self.started = true;
            return Some(self.state.point());
        }
        if self.state.month_index >= self.months {
            return None;
        }
        self.state.advance_month(self.rate, self.monthly_contribution);
        Some(self.state.point())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining();
        (n, Some(n))
    }
}

impl ExactSizeIterator for ProjectionSteps {}
