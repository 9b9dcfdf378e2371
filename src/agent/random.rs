//! Random walk baseline.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::trait_::Agent;
use crate::env::Observation;
use crate::simulator::Action;

/// Forward moves taken before stopping.
pub const DEFAULT_WALK_LENGTH: i32 = 5;

/// Turns right a random number of times, then walks forward.
///
/// At episode start each slot draws a turn count in `0..12`. Once turned,
/// it moves onto the nearest visible candidate `walk_length` times, turning
/// right whenever nothing is in view, and then stops.
#[derive(Debug, Clone)]
pub struct RandomAgent {
    rng: StdRng,
    walk_length: i32,
    /// Per slot: negative while turning, then forward moves taken.
    steps: Vec<i32>,
}

impl RandomAgent {
    pub fn new(seed: u64) -> Self {
        Self::with_walk_length(seed, DEFAULT_WALK_LENGTH)
    }

    pub fn with_walk_length(seed: u64, walk_length: i32) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            walk_length,
            steps: Vec::new(),
        }
    }
}

impl Agent for RandomAgent {
    fn begin_episode(&mut self, observations: &[Observation]) {
        self.steps = (0..observations.len())
            .map(|_| self.rng.gen_range(-11..1))
            .collect();
    }

    fn act(&mut self, observations: &[Observation]) -> Vec<Action> {
        if self.steps.len() != observations.len() {
            self.begin_episode(observations);
        }
        observations
            .iter()
            .zip(self.steps.iter_mut())
            .map(|(o, steps)| {
                if *steps < 0 {
                    *steps += 1;
                    Action::TURN_RIGHT
                } else if *steps >= self.walk_length {
                    Action::NOOP
                } else if o.navigable.len() > 1 {
                    *steps += 1;
                    Action::move_to(1)
                } else {
                    Action::TURN_RIGHT
                }
            })
            .collect()
    }

    fn name(&self) -> &str {
        "random"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils;

    #[test]
    fn turns_then_walks_then_stops() {
        let mut env = test_utils::env(2, 5);
        let mut agent = RandomAgent::with_walk_length(3, 2);
        let mut obs = env.reset().unwrap();
        agent.begin_episode(&obs);
        let turns: Vec<i32> = agent.steps.iter().map(|s| -s).collect();
        assert!(turns.iter().all(|t| (0..12).contains(t)));

        let mut history = vec![Vec::new(); 2];
        for _ in 0..40 {
            let actions = agent.act(&obs);
            for (h, a) in history.iter_mut().zip(&actions) {
                h.push(*a);
            }
            obs = env.step(&actions).unwrap();
        }
        for (slot, actions) in history.iter().enumerate() {
            let leading_turns = actions.iter().take_while(|a| **a == Action::TURN_RIGHT).count();
            assert!(leading_turns >= turns[slot] as usize);
            assert!(actions.iter().filter(|a| a.is_move()).count() <= 2);
            assert_eq!(actions.last(), Some(&Action::NOOP));
        }
    }

    #[test]
    fn same_seed_same_choices() {
        let mut env = test_utils::env(2, 5);
        let obs = env.reset().unwrap();
        let mut a = RandomAgent::new(9);
        let mut b = RandomAgent::new(9);
        a.begin_episode(&obs);
        b.begin_episode(&obs);
        assert_eq!(a.steps, b.steps);
        assert_eq!(a.act(&obs), b.act(&obs));
    }
}
