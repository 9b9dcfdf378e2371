//! Trajectory evaluation.
//!
//! An [`Evaluation`] holds reference paths and the graph index; it scores a
//! [`Submission`] into per-item [`Scores`] and a [`ScoreSummary`].

pub mod error;
pub mod evaluation;
pub mod scores;
pub mod submission;


pub use error::EvalError;
pub use evaluation::{EvalConfig, Evaluation, DEFAULT_ERROR_MARGIN};
pub use scores::{ScoreSummary, Scores};
pub use submission::{
    parse_submission, read_submission, write_submission, Submission, SubmissionEntry, Trajectory,
    TrajectoryPoint,
};
