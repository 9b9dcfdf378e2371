//! Instruction datasets.
//!
//! Records are loaded per named split, then expanded into one
//! [`InstructionItem`] per instruction variant. Optionally each item carries a
//! tokenized instruction.

pub mod error;
pub mod item;
pub mod record;
pub mod tokenizer;

pub use error::DatasetError;
pub use item::{expand, InstructionItem};
pub use record::{instr_id, load_split, load_splits, parse_instr_id, DatasetRecord};
pub use tokenizer::{Tokenizer, VocabTokenizer};
