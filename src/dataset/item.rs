//! Per-instruction episode items.

use serde::{Deserialize, Serialize};

use super::record::{instr_id, DatasetRecord};
use super::tokenizer::Tokenizer;
use crate::Id;

/// One (path, instruction variant) pair, the unit an episode is built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstructionItem {
    pub path_id: u64,
    pub scan: Id,
    pub path: Vec<Id>,
    pub heading: f64,
    pub instruction: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instr_encoding: Option<Vec<usize>>,
    pub instr_id: String,
}

impl InstructionItem {
    pub fn start(&self) -> Option<&str> {
        self.path.first().map(|s| s.as_str())
    }

    /// Final viewpoint of the reference path; the oracle's goal.
    pub fn goal(&self) -> Option<&str> {
        self.path.last().map(|s| s.as_str())
    }
}

/// Splits every record into one item per instruction variant.
///
/// Items keep record order, variants in instruction order. When a tokenizer
/// is given each item also carries its encoded instruction.
pub fn expand(records: &[DatasetRecord], tokenizer: Option<&dyn Tokenizer>) -> Vec<InstructionItem> {
    records
        .iter()
        .flat_map(|record| {
            record
                .instructions
                .iter()
                .enumerate()
                .map(move |(j, instruction)| InstructionItem {
                    path_id: record.path_id,
                    scan: record.scan.clone(),
                    path: record.path.clone(),
                    heading: record.heading,
                    instruction: instruction.clone(),
                    instr_encoding: tokenizer.map(|t| t.encode_sentence(instruction)),
                    instr_id: instr_id(record.path_id, j),
                })
        })
        .collect()
}
