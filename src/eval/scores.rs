//! Per-item scores and their summary.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Per-instruction metrics, in scoring order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scores {
    /// Distance from the final viewpoint to the goal.
    pub nav_errors: Vec<f64>,
    /// Distance from the closest visited viewpoint to the goal.
    pub oracle_errors: Vec<f64>,
    pub trajectory_steps: Vec<usize>,
    /// Summed distance between consecutive visited viewpoints.
    pub trajectory_lengths: Vec<f64>,
}

impl Scores {
    pub fn len(&self) -> usize {
        self.nav_errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nav_errors.is_empty()
    }

    /// Reduces to means and success rates at `error_margin`.
    pub fn summarize(&self, error_margin: f64, model_score: Option<f64>) -> ScoreSummary {
        let steps: Vec<f64> = self.trajectory_steps.iter().map(|&s| s as f64).collect();
        ScoreSummary {
            nav_error: mean(&self.nav_errors),
            oracle_error: mean(&self.oracle_errors),
            steps: mean(&steps),
            lengths: mean(&self.trajectory_lengths),
            success_rate: rate_below(&self.nav_errors, error_margin),
            oracle_rate: rate_below(&self.oracle_errors, error_margin),
            model_score,
        }
    }
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn rate_below(values: &[f64], margin: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().filter(|&&v| v < margin).count() as f64 / values.len() as f64
}

/// Mean metrics over a scored submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreSummary {
    pub nav_error: f64,
    pub oracle_error: f64,
    pub steps: f64,
    pub lengths: f64,
    /// Fraction of navigation errors below the error margin.
    pub success_rate: f64,
    /// Fraction of oracle errors below the error margin.
    pub oracle_rate: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_score: Option<f64>,
}

impl fmt::Display for ScoreSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  Navigation error:  {:.2}", self.nav_error)?;
        writeln!(f, "  Oracle error:      {:.2}", self.oracle_error)?;
        writeln!(f, "  Steps:             {:.2}", self.steps)?;
        writeln!(f, "  Path length:       {:.2}", self.lengths)?;
        writeln!(f, "  Success rate:      {:.1}%", self.success_rate * 100.0)?;
        write!(f, "  Oracle rate:       {:.1}%", self.oracle_rate * 100.0)?;
        if let Some(score) = self.model_score {
            write!(f, "\n  Model score:       {:.4}", score)?;
        }
        Ok(())
    }
}
