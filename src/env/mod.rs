//! Episode orchestration.
//!
//! [`NavEnvironment`] owns the shuffled dataset cursor, the lockstep
//! simulator batch and the teacher oracle, and turns simulator states into
//! [`Observation`]s.

pub mod batch;
pub mod config;
pub mod cursor;
pub mod error;
pub mod observation;

pub use batch::NavEnvironment;
pub use config::EnvConfig;
pub use cursor::DatasetCursor;
pub use error::EnvError;
pub use observation::{Observation, ObservationBuilder};
