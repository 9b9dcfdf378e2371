//! Simulator sessions and the lockstep batch adapter.
//!
//! A [`Simulator`] is the authoritative source of an agent's position and
//! camera. [`EnvBatch`] drives `B` of them in lockstep and binds image
//! features to their states; [`GraphSimulator`] is a render-free session
//! over the navigation graph.

pub mod action;
pub mod batch;
pub mod error;
pub mod graph_sim;
pub mod session;
pub mod state;

pub use action::{Action, SimpleAction};
pub use batch::EnvBatch;
pub use error::SimulatorError;
pub use graph_sim::{GraphSimulator, SimulatorConfig};
pub use session::Simulator;
pub use state::{NavigableCandidate, SimState};
