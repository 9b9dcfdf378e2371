//! Episode orchestration over a batch of simulator sessions.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, info};

use super::config::EnvConfig;
use super::cursor::DatasetCursor;
use super::error::EnvError;
use super::observation::{Observation, ObservationBuilder};
use crate::dataset::{expand, load_splits, DatasetError, InstructionItem, Tokenizer};
use crate::features::FeatureStore;
use crate::graph::NavGraphIndex;
use crate::oracle::ShortestPathOracle;
use crate::simulator::{Action, EnvBatch, GraphSimulator, Simulator};

/// Batched instruction-following environment.
///
/// Each [`reset`](Self::reset) draws a minibatch of instructions and starts
/// every session at its item's first path viewpoint; each
/// [`step`](Self::step) advances all sessions in lockstep. Observations carry
/// the shortest-path teacher action toward the item's goal.
pub struct NavEnvironment {
    cursor: DatasetCursor<InstructionItem>,
    sims: EnvBatch,
    observations: ObservationBuilder,
    batch: Vec<InstructionItem>,
}

impl NavEnvironment {
    /// Creates an environment over pre-built parts.
    ///
    /// # Arguments
    ///
    /// * `items` - Instruction items; shuffled with `seed`
    /// * `sims` - Simulator batch; its size is the minibatch size
    /// * `oracle` - Teacher over the graphs the sessions navigate
    /// * `seed` - Shuffle seed
    ///
    /// # Errors
    ///
    /// Fails with [`EnvError::BatchTooLarge`] when there are fewer items than sessions.
    pub fn new(
        items: Vec<InstructionItem>,
        sims: EnvBatch,
        oracle: ShortestPathOracle,
        seed: u64,
    ) -> Result<Self, EnvError> {
        let cursor = DatasetCursor::new(items, sims.batch_size(), seed)?;
        Ok(Self {
            cursor,
            sims,
            observations: ObservationBuilder::new(oracle),
            batch: Vec::new(),
        })
    }

    /// Loads datasets, graphs and features from disk and wires graph-backed sessions.
    pub fn from_config(config: &EnvConfig, tokenizer: Option<&dyn Tokenizer>) -> Result<Self, EnvError> {
        let records = load_splits(&config.data_dir, &config.splits)?;
        let items = expand(&records, tokenizer);
        if items.is_empty() {
            return Err(DatasetError::EmptyDataset(config.splits.clone()).into());
        }

        let scans: BTreeSet<&str> = items.iter().map(|i| i.scan.as_str()).collect();
        let index = Arc::new(NavGraphIndex::load(&config.connectivity_dir, scans)?);
        let features: Arc<dyn FeatureStore> = Arc::from(config.features.build()?);

        let sim_config = config.simulator;
        let sims = EnvBatch::with_sessions(config.batch_size, features, || {
            Box::new(GraphSimulator::new(index.clone(), sim_config)) as Box<dyn Simulator>
        });
        let env = Self::new(items, sims, ShortestPathOracle::new(index), config.seed)?;
        info!(
            "NavEnvironment loaded with {} instructions, using splits: {}",
            env.cursor.len(),
            config.splits.join(",")
        );
        Ok(env)
    }

    /// Draws the next minibatch and starts a new episode in every session.
    pub fn reset(&mut self) -> Result<Vec<Observation>, EnvError> {
        let batch = self.cursor.next_minibatch();
        let scans: Vec<&str> = batch.iter().map(|i| i.scan.as_str()).collect();
        let starts = batch
            .iter()
            .map(|i| i.start().ok_or_else(|| EnvError::EmptyPath(i.instr_id.clone())))
            .collect::<Result<Vec<_>, _>>()?;
        let headings: Vec<f64> = batch.iter().map(|i| i.heading).collect();

        self.sims.new_episodes(&scans, &starts, &headings)?;
        self.batch = batch;
        debug!(
            "Reset {} episodes at cursor position {}",
            self.batch.len(),
            self.cursor.position()
        );
        self.observe()
    }

    /// Applies one full action per slot.
    pub fn step(&mut self, actions: &[Action]) -> Result<Vec<Observation>, EnvError> {
        self.sims.make_actions(actions)?;
        self.observe()
    }

    /// Applies one simple action code per slot.
    pub fn step_simple(&mut self, codes: &[usize]) -> Result<Vec<Observation>, EnvError> {
        self.sims.make_simple_actions(codes)?;
        self.observe()
    }

    /// Observations of the current states, without acting.
    pub fn observe(&self) -> Result<Vec<Observation>, EnvError> {
        let states = self.sims.get_states()?;
        self.observations.build_batch(&self.batch, states)
    }

    /// Rewinds the dataset cursor; the next [`reset`](Self::reset) restarts the epoch.
    pub fn reset_epoch(&mut self) {
        self.cursor.reset_epoch();
    }

    /// Items of the current minibatch, slot order.
    pub fn batch(&self) -> &[InstructionItem] {
        &self.batch
    }

    pub fn batch_size(&self) -> usize {
        self.sims.batch_size()
    }

    /// Number of instruction items.
    pub fn num_items(&self) -> usize {
        self.cursor.len()
    }

    pub fn items(&self) -> &[InstructionItem] {
        self.cursor.items()
    }

    pub fn index(&self) -> &Arc<NavGraphIndex> {
        self.observations.oracle().index()
    }

    pub fn features(&self) -> &Arc<dyn FeatureStore> {
        self.sims.features()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulator::SimulatorError;
    use crate::test_utils;

    #[test]
    fn reset_starts_every_slot_on_its_path() {
        let mut env = test_utils::env(2, 4);
        let obs = env.reset().unwrap();
        assert_eq!(obs.len(), 2);
        for (o, item) in obs.iter().zip(env.batch()) {
            assert_eq!(o.instr_id, item.instr_id);
            assert_eq!(Some(o.viewpoint.as_str()), item.start());
            assert_eq!(o.step, 0);
            assert_eq!(o.feature.len(), env.features().feature_dim());
            assert_eq!(o.navigable[0].viewpoint, o.viewpoint);
        }
    }

    #[test]
    fn teacher_leads_every_slot_to_its_goal() {
        let mut env = test_utils::env(3, 3);
        let mut obs = env.reset().unwrap();
        for _ in 0..40 {
            let actions: Vec<Action> = obs.iter().map(|o| o.teacher).collect();
            if actions.iter().all(Action::is_noop) {
                break;
            }
            obs = env.step(&actions).unwrap();
        }
        for (o, item) in obs.iter().zip(env.batch()) {
            assert_eq!(Some(o.viewpoint.as_str()), item.goal());
            assert!(o.teacher.is_noop());
        }
    }

    #[test]
    fn step_checks_arity_and_codes() {
        let mut env = test_utils::env(2, 4);
        env.reset().unwrap();
        assert!(matches!(
            env.step(&[Action::NOOP]),
            Err(EnvError::Simulator(SimulatorError::BatchSizeMismatch { .. }))
        ));
        assert!(matches!(
            env.step_simple(&[1, 7]),
            Err(EnvError::Simulator(SimulatorError::InvalidAction(7)))
        ));
        let obs = env.step_simple(&[1, 2]).unwrap();
        assert!(obs.iter().all(|o| o.step == 1));
    }

    #[test]
    fn reset_epoch_replays_the_first_batch() {
        let mut env = test_utils::env(2, 4);
        env.reset().unwrap();
        let first: Vec<String> = env.batch().iter().map(|i| i.instr_id.clone()).collect();
        env.reset().unwrap();
        env.reset_epoch();
        env.reset().unwrap();
        let again: Vec<String> = env.batch().iter().map(|i| i.instr_id.clone()).collect();
        assert_eq!(first, again);
    }

    #[test]
    fn failed_reset_keeps_the_current_episodes() {
        let index = test_utils::index();
        let mut items = test_utils::items();
        items[1].path = vec!["Z".into()];
        let sims = test_utils::sims(index.clone(), 2);
        let mut env = NavEnvironment::new(items, sims, ShortestPathOracle::new(index), 0).unwrap();

        let mut failed = None;
        for _ in 0..4 {
            let before: Vec<String> = env.batch().iter().map(|i| i.instr_id.clone()).collect();
            match env.reset() {
                Ok(_) => continue,
                Err(err) => {
                    failed = Some((before, err));
                    break;
                }
            }
        }
        let (before, err) = failed.expect("the unknown start is drawn within two epochs");
        assert!(matches!(err, EnvError::Simulator(SimulatorError::Graph(_))));
        let after: Vec<String> = env.batch().iter().map(|i| i.instr_id.clone()).collect();
        assert_eq!(before, after);
        if !after.is_empty() {
            let obs = env.observe().unwrap();
            for (o, item) in obs.iter().zip(env.batch()) {
                assert_eq!(o.instr_id, item.instr_id);
                assert_eq!(o.scan, item.scan);
            }
        }
    }

    #[test]
    fn batch_larger_than_dataset_is_rejected() {
        let index = test_utils::index();
        let sims = test_utils::sims(index.clone(), 9);
        let err = NavEnvironment::new(test_utils::items(), sims, ShortestPathOracle::new(index), 0);
        assert!(matches!(err, Err(EnvError::BatchTooLarge { batch_size: 9, .. })));
    }
}
