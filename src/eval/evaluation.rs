//! Offline trajectory scoring against a labelled dataset.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::error::EvalError;
use super::scores::{mean, ScoreSummary, Scores};
use super::submission::{read_submission, Submission, TrajectoryPoint};
use crate::dataset::{load_splits, DatasetRecord};
use crate::graph::NavGraphIndex;

/// Success threshold on navigation and oracle error, in metres.
pub const DEFAULT_ERROR_MARGIN: f64 = 3.0;

/// Configuration for [`Evaluation::from_config`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    pub splits: Vec<String>,
    pub data_dir: PathBuf,
    pub connectivity_dir: PathBuf,
    pub error_margin: f64,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            splits: vec!["val_seen".to_string()],
            data_dir: PathBuf::from("tasks/R2R/data"),
            connectivity_dir: PathBuf::from("connectivity"),
            error_margin: DEFAULT_ERROR_MARGIN,
        }
    }
}

/// Scores submitted trajectories against reference paths.
///
/// Ground truth is keyed by `path_id`; every instruction variant `j` of a
/// record contributes an expected id `"{path_id}_{j}"`.
#[derive(Debug, Clone)]
pub struct Evaluation {
    gt: HashMap<u64, DatasetRecord>,
    /// Expected instr_id → path_id.
    expected: BTreeMap<String, u64>,
    index: Arc<NavGraphIndex>,
    error_margin: f64,
}

impl Evaluation {
    pub fn new(records: Vec<DatasetRecord>, index: Arc<NavGraphIndex>) -> Self {
        let mut gt = HashMap::new();
        let mut expected = BTreeMap::new();
        for record in records {
            for id in record.instr_ids() {
                expected.insert(id, record.path_id);
            }
            gt.insert(record.path_id, record);
        }
        Self {
            gt,
            expected,
            index,
            error_margin: DEFAULT_ERROR_MARGIN,
        }
    }

    pub fn with_error_margin(mut self, error_margin: f64) -> Self {
        self.error_margin = error_margin;
        self
    }

    /// Loads the configured splits and the graphs of their scans.
    pub fn from_config(config: &EvalConfig) -> Result<Self, EvalError> {
        let records = load_splits(&config.data_dir, &config.splits)?;
        let scans: BTreeSet<&str> = records.iter().map(|r| r.scan.as_str()).collect();
        let index = Arc::new(NavGraphIndex::load(&config.connectivity_dir, scans)?);
        info!(
            "Evaluating {} paths from splits: {}",
            records.len(),
            config.splits.join(",")
        );
        Ok(Self::new(records, index).with_error_margin(config.error_margin))
    }

    pub fn error_margin(&self) -> f64 {
        self.error_margin
    }

    pub fn expected_ids(&self) -> impl Iterator<Item = &str> {
        self.expected.keys().map(|s| s.as_str())
    }

    pub fn index(&self) -> &Arc<NavGraphIndex> {
        &self.index
    }

    /// Scores every expected result in `results`.
    ///
    /// Results for unknown instr_ids are ignored.
    ///
    /// # Errors
    ///
    /// * [`EvalError::MalformedTrajectory`] when a trajectory is empty or does
    ///   not start at the reference start viewpoint
    /// * [`EvalError::IncompleteSubmission`] when expected ids are missing
    /// * [`EvalError::PartialModelScores`] when some, but not all, results carry a score
    /// * [`EvalError::Graph`] when a visited viewpoint is unknown or unreachable
    pub fn score(&self, results: &Submission) -> Result<(ScoreSummary, Scores), EvalError> {
        let mut remaining: BTreeSet<&str> = self.expected_ids().collect();
        let mut scores = Scores::default();
        let mut model_scores = Vec::new();
        let mut ignored = 0usize;

        for (instr_id, entry) in results {
            let Some(record) = self.expected.get(instr_id).and_then(|pid| self.gt.get(pid)) else {
                debug!("Ignoring result for unexpected instruction {}", instr_id);
                ignored += 1;
                continue;
            };
            remaining.remove(instr_id.as_str());
            self.score_item(instr_id, record, &entry.trajectory, &mut scores)?;
            if let Some(score) = entry.score {
                model_scores.push(score);
            }
        }
        if ignored > 0 {
            warn!("Ignored {} results with unexpected instruction ids", ignored);
        }

        if !remaining.is_empty() {
            return Err(EvalError::IncompleteSubmission {
                missing: remaining.len(),
                expected: self.expected.len(),
            });
        }

        let model_score = if model_scores.is_empty() {
            None
        } else if model_scores.len() == scores.len() {
            Some(mean(&model_scores))
        } else {
            return Err(EvalError::PartialModelScores {
                scored: scores.len(),
                with_score: model_scores.len(),
            });
        };
        Ok((scores.summarize(self.error_margin, model_score), scores))
    }

    /// Reads a submission file in either supported form and scores it.
    pub fn score_file(&self, path: &Path) -> Result<(ScoreSummary, Scores), EvalError> {
        self.score(&read_submission(path)?)
    }

    fn score_item(
        &self,
        instr_id: &str,
        record: &DatasetRecord,
        trajectory: &[TrajectoryPoint],
        scores: &mut Scores,
    ) -> Result<(), EvalError> {
        let start = record.start().unwrap_or_default();
        let found = trajectory.first().map(TrajectoryPoint::viewpoint);
        let (Some(first), Some(last)) = (found, trajectory.last()) else {
            return Err(malformed(instr_id, start, None));
        };
        if first != start {
            return Err(malformed(instr_id, start, Some(first)));
        }

        let scan = record.scan.as_str();
        let goal = record.goal().unwrap_or_default();
        let nav_error = self.index.distance(scan, last.viewpoint(), goal)?;
        let mut oracle_error = f64::INFINITY;
        for point in trajectory {
            oracle_error = oracle_error.min(self.index.distance(scan, point.viewpoint(), goal)?);
        }
        let mut length = 0.0;
        for pair in trajectory.windows(2) {
            length += self.index.distance(scan, pair[0].viewpoint(), pair[1].viewpoint())?;
        }

        scores.nav_errors.push(nav_error);
        scores.oracle_errors.push(oracle_error);
        scores.trajectory_steps.push(trajectory.len() - 1);
        scores.trajectory_lengths.push(length);
        Ok(())
    }
}

fn malformed(instr_id: &str, expected: &str, found: Option<&str>) -> EvalError {
    EvalError::MalformedTrajectory {
        instr_id: instr_id.to_string(),
        expected: expected.to_string(),
        found: found.map(str::to_string),
    }
}
