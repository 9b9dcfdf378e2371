use thiserror::Error;

use crate::dataset::DatasetError;
use crate::graph::GraphError;
use crate::Id;

/// Errors raised while scoring a submission.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("Trajectory for {instr_id} starts at {found:?}, expected {expected}")]
    MalformedTrajectory {
        instr_id: String,
        expected: Id,
        found: Option<Id>,
    },

    #[error("Missing {missing} of {expected} instruction ids")]
    IncompleteSubmission { missing: usize, expected: usize },

    #[error("Only {with_score} of {scored} scored results carry a model score")]
    PartialModelScores { scored: usize, with_score: usize },

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error("Could not read submission {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed submission {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
