//! Running agents through the environment.

use tracing::{debug, info};

use super::trait_::Agent;
use crate::env::{EnvError, NavEnvironment, Observation};
use crate::eval::{Submission, SubmissionEntry, Trajectory, TrajectoryPoint};
use crate::simulator::Action;

fn point(o: &Observation) -> TrajectoryPoint {
    TrajectoryPoint::new(o.viewpoint.clone(), o.heading, o.elevation)
}

/// Runs one minibatch episode for at most `max_steps` steps.
///
/// A slot ends the step it emits [`Action::NOOP`]; ended slots keep receiving
/// no-ops and stop recording. Each trajectory holds the start pose followed by
/// one pose per action taken before the slot ended.
pub fn rollout_batch(
    env: &mut NavEnvironment,
    agent: &mut dyn Agent,
    max_steps: usize,
) -> Result<Vec<(String, Trajectory)>, EnvError> {
    let mut obs = env.reset()?;
    agent.begin_episode(&obs);
    let mut trajectories: Vec<(String, Trajectory)> = obs
        .iter()
        .map(|o| (o.instr_id.clone(), vec![point(o)]))
        .collect();
    let mut ended = vec![false; obs.len()];

    for _ in 0..max_steps {
        let mut actions = agent.act(&obs);
        for (done, action) in ended.iter_mut().zip(actions.iter_mut()) {
            if *done {
                *action = Action::NOOP;
            } else if action.is_noop() {
                *done = true;
            }
        }
        if ended.iter().all(|e| *e) {
            break;
        }
        obs = env.step(&actions)?;
        for ((o, (_, trajectory)), done) in obs.iter().zip(trajectories.iter_mut()).zip(&ended) {
            if !*done {
                trajectory.push(point(o));
            }
        }
        debug!(
            "{} of {} slots still running",
            ended.iter().filter(|e| !**e).count(),
            ended.len()
        );
    }
    Ok(trajectories)
}

/// Collects trajectories from `agent` into a submission.
///
/// With `episodes` set, runs that many minibatches. Otherwise rewinds the
/// dataset cursor and runs minibatches until an instruction repeats, which
/// covers every instruction once.
pub fn rollout(
    env: &mut NavEnvironment,
    agent: &mut dyn Agent,
    max_steps: usize,
    episodes: Option<usize>,
) -> Result<Submission, EnvError> {
    let mut results = Submission::new();
    match episodes {
        Some(n) => {
            for _ in 0..n {
                for (id, trajectory) in rollout_batch(env, agent, max_steps)? {
                    results.insert(id, entry(trajectory));
                }
            }
        }
        None => {
            env.reset_epoch();
            loop {
                let mut looped = false;
                for (id, trajectory) in rollout_batch(env, agent, max_steps)? {
                    if results.contains_key(&id) {
                        looped = true;
                    } else {
                        results.insert(id, entry(trajectory));
                    }
                }
                if looped || results.len() >= env.num_items() {
                    break;
                }
            }
        }
    }
    info!(
        "Agent {} produced {} trajectories",
        agent.name(),
        results.len()
    );
    Ok(results)
}

fn entry(trajectory: Trajectory) -> SubmissionEntry {
    SubmissionEntry {
        trajectory,
        score: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{ShortestAgent, StopAgent};
    use crate::test_utils;

    #[test]
    fn stop_agent_records_only_the_start() {
        let mut env = test_utils::env(2, 1);
        let trajectories = rollout_batch(&mut env, &mut StopAgent, 10).unwrap();
        for ((id, trajectory), item) in trajectories.iter().zip(env.batch()) {
            assert_eq!(id, &item.instr_id);
            assert_eq!(trajectory.len(), 1);
            assert_eq!(Some(trajectory[0].viewpoint()), item.start());
        }
    }

    #[test]
    fn shortest_agent_trajectories_end_at_the_goal() {
        let mut env = test_utils::env(2, 1);
        let trajectories = rollout_batch(&mut env, &mut ShortestAgent, 40).unwrap();
        for ((_, trajectory), item) in trajectories.iter().zip(env.batch()) {
            assert_eq!(trajectory.last().map(TrajectoryPoint::viewpoint), item.goal());
            assert!(trajectory.len() >= item.path.len());
        }
    }

    #[test]
    fn max_steps_bounds_trajectories() {
        let mut env = test_utils::env(2, 1);
        let trajectories = rollout_batch(&mut env, &mut ShortestAgent, 1).unwrap();
        assert!(trajectories.iter().all(|(_, t)| t.len() <= 2));
    }

    #[test]
    fn full_rollout_covers_every_instruction_once() {
        for batch_size in 1..=3 {
            let mut env = test_utils::env(batch_size, 7);
            let submission = rollout(&mut env, &mut StopAgent, 5, None).unwrap();
            assert_eq!(submission.len(), 4);
            assert!(submission.contains_key("1_1"));
        }
    }

    #[test]
    fn fixed_episode_count() {
        let mut env = test_utils::env(1, 7);
        let submission = rollout(&mut env, &mut StopAgent, 5, Some(2)).unwrap();
        assert_eq!(submission.len(), 2);
    }
}
