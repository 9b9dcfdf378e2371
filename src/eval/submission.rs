//! Submission format.
//!
//! On disk a submission is either a mapping
//! `{instr_id: {trajectory, score?}}` or a list
//! `[{instr_id, trajectory, score?}]`; both load into a [`Submission`].

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::EvalError;
use crate::Id;

/// One visited pose: `(viewpoint, heading, elevation)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryPoint(pub Id, pub f64, pub f64);

impl TrajectoryPoint {
    pub fn new(viewpoint: impl Into<Id>, heading: f64, elevation: f64) -> Self {
        Self(viewpoint.into(), heading, elevation)
    }

    pub fn viewpoint(&self) -> &str {
        &self.0
    }
}

pub type Trajectory = Vec<TrajectoryPoint>;

/// Result for one instruction.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SubmissionEntry {
    pub trajectory: Trajectory,
    /// Optional model-supplied scalar, averaged into the summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

/// Results keyed by instr_id.
pub type Submission = BTreeMap<String, SubmissionEntry>;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ListedEntry {
    instr_id: String,
    trajectory: Trajectory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    score: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SubmissionFile {
    Map(Submission),
    List(Vec<ListedEntry>),
}

impl From<SubmissionFile> for Submission {
    fn from(file: SubmissionFile) -> Self {
        match file {
            SubmissionFile::Map(map) => map,
            SubmissionFile::List(list) => list
                .into_iter()
                .map(|e| {
                    let entry = SubmissionEntry {
                        trajectory: e.trajectory,
                        score: e.score,
                    };
                    (e.instr_id, entry)
                })
                .collect(),
        }
    }
}

/// Parses either submission form from JSON text.
pub fn parse_submission(text: &str) -> Result<Submission, serde_json::Error> {
    serde_json::from_str::<SubmissionFile>(text).map(Submission::from)
}

pub fn read_submission(path: &Path) -> Result<Submission, EvalError> {
    let display = path.display().to_string();
    let text = fs::read_to_string(path).map_err(|source| EvalError::Io {
        path: display.clone(),
        source,
    })?;
    parse_submission(&text).map_err(|source| EvalError::Parse { path: display, source })
}

/// Writes `submission` in list form.
pub fn write_submission(path: &Path, submission: &Submission) -> Result<(), EvalError> {
    let display = path.display().to_string();
    let list: Vec<ListedEntry> = submission
        .iter()
        .map(|(id, e)| ListedEntry {
            instr_id: id.clone(),
            trajectory: e.trajectory.clone(),
            score: e.score,
        })
        .collect();
    let text = serde_json::to_string_pretty(&list).map_err(|source| EvalError::Parse {
        path: display.clone(),
        source,
    })?;
    fs::write(path, text).map_err(|source| EvalError::Io { path: display, source })
}
