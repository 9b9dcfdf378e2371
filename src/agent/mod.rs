//! Baseline agents and the rollout driver.

pub mod random;
pub mod rollout;
pub mod shortest;
pub mod stop;
pub mod trait_;

pub use random::RandomAgent;
pub use rollout::{rollout, rollout_batch};
pub use shortest::ShortestAgent;
pub use stop::StopAgent;
pub use trait_::Agent;
