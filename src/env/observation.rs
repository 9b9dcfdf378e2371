//! Per-slot observations.

use serde::Serialize;

use super::error::EnvError;
use crate::dataset::InstructionItem;
use crate::oracle::ShortestPathOracle;
use crate::simulator::{Action, NavigableCandidate, SimState};
use crate::Id;

/// What an agent sees for one batch slot after a reset or step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Observation {
    pub instr_id: String,
    pub scan: Id,
    pub viewpoint: Id,
    pub view_index: usize,
    pub heading: f64,
    pub elevation: f64,
    pub feature: Vec<f32>,
    pub step: usize,
    pub navigable: Vec<NavigableCandidate>,
    pub instruction: String,
    /// Next shortest-path action toward the reference goal.
    pub teacher: Action,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instr_encoding: Option<Vec<usize>>,
}

/// Assembles observations from simulator states and their batch items.
#[derive(Debug, Clone)]
pub struct ObservationBuilder {
    oracle: ShortestPathOracle,
}

impl ObservationBuilder {
    pub fn new(oracle: ShortestPathOracle) -> Self {
        Self { oracle }
    }

    pub fn oracle(&self) -> &ShortestPathOracle {
        &self.oracle
    }

    /// Builds one observation; the teacher goal is the item's last path viewpoint.
    pub fn build(
        &self,
        item: &InstructionItem,
        feature: Vec<f32>,
        state: SimState,
    ) -> Result<Observation, EnvError> {
        let goal = item
            .goal()
            .ok_or_else(|| EnvError::EmptyPath(item.instr_id.clone()))?;
        let teacher = self.oracle.teacher_action(&state, goal)?;
        Ok(Observation {
            instr_id: item.instr_id.clone(),
            scan: state.scan,
            viewpoint: state.viewpoint,
            view_index: state.view_index,
            heading: state.heading,
            elevation: state.elevation,
            feature,
            step: state.step,
            navigable: state.navigable,
            instruction: item.instruction.clone(),
            teacher,
            instr_encoding: item.instr_encoding.clone(),
        })
    }

    /// Builds observations slot by slot; `items` and `states` are parallel.
    pub fn build_batch(
        &self,
        items: &[InstructionItem],
        states: Vec<(Vec<f32>, SimState)>,
    ) -> Result<Vec<Observation>, EnvError> {
        items
            .iter()
            .zip(states)
            .map(|(item, (feature, state))| self.build(item, feature, state))
            .collect()
    }
}
