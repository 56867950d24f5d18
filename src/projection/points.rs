//! Projection output structures

use serde::{Deserialize, Serialize};

/// One month of a projected trajectory
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionPoint {
    pub month_index: u32,
    /// Principal contributed so far (no growth)
    pub invested_total: f64,
    /// Compounded value at this month
    pub projected_total: f64,
}

impl ProjectionPoint {
    /// Accumulated interest at this month
    pub fn interest(&self) -> f64 {
        self.projected_total - self.invested_total
    }
}

/// Month-by-month projection, always holding at least the month-0 point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub points: Vec<ProjectionPoint>,
}

impl Trajectory {
    pub(crate) fn from_points(points: Vec<ProjectionPoint>) -> Self {
        debug_assert!(!points.is_empty());
        Self { points }
    }

    /// Number of points (months + 1)
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProjectionPoint> {
        self.points.iter()
    }

    /// Point at the end of the horizon
    pub fn final_point(&self) -> Option<&ProjectionPoint> {
        self.points.last()
    }

    /// First month whose projected balance reaches `target`, if any
    pub fn month_reaching(&self, target: f64) -> Option<u32> {
        self.points
            .iter()
            .find(|p| p.projected_total >= target)
            .map(|p| p.month_index)
    }

    /// Get summary statistics
    pub fn summary(&self) -> TrajectorySummary {
        let (months, final_amount, total_invested) = self
            .points
            .last()
            .map(|p| (p.month_index, p.projected_total, p.invested_total))
            .unwrap_or((0, 0.0, 0.0));

        TrajectorySummary {
            months,
            final_amount,
            total_invested,
            total_interest: final_amount - total_invested,
        }
    }
}

impl<'a> IntoIterator for &'a Trajectory {
    type Item = &'a ProjectionPoint;
    type IntoIter = std::slice::Iter<'a, ProjectionPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

/// Summary statistics for a trajectory
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrajectorySummary {
    pub months: u32,
    pub final_amount: f64,
    pub total_invested: f64,
    pub total_interest: f64,
}
