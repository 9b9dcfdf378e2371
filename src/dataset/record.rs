//! Raw dataset records and split loading.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use super::error::DatasetError;
use crate::Id;

/// One labelled trajectory with its instruction variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetRecord {
    pub path_id: u64,
    pub scan: Id,
    /// Reference path, start viewpoint first.
    pub path: Vec<Id>,
    /// Start heading in radians.
    pub heading: f64,
    pub instructions: Vec<String>,
    /// Reference path length, when provided by the dataset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
}

impl DatasetRecord {
    pub fn start(&self) -> Option<&str> {
        self.path.first().map(|s| s.as_str())
    }

    pub fn goal(&self) -> Option<&str> {
        self.path.last().map(|s| s.as_str())
    }

    /// `"{path_id}_{variant}"` for every instruction variant.
    pub fn instr_ids(&self) -> impl Iterator<Item = String> + '_ {
        (0..self.instructions.len()).map(move |j| instr_id(self.path_id, j))
    }
}

/// Identifier of one (path, instruction variant) pair.
pub fn instr_id(path_id: u64, variant: usize) -> String {
    format!("{}_{}", path_id, variant)
}

/// Splits an instr_id back into `(path_id, variant)`.
pub fn parse_instr_id(id: &str) -> Option<(u64, usize)> {
    let (path, variant) = id.split_once('_')?;
    Some((path.parse().ok()?, variant.parse().ok()?))
}

/// Location of a named split: `{data_dir}/R2R_{split}.json`.
pub fn split_path(data_dir: &Path, split: &str) -> PathBuf {
    data_dir.join(format!("R2R_{}.json", split))
}

/// Loads one named split.
pub fn load_split(data_dir: &Path, split: &str) -> Result<Vec<DatasetRecord>, DatasetError> {
    let path = split_path(data_dir, split);
    let display = path.display().to_string();
    let text = fs::read_to_string(&path).map_err(|source| DatasetError::Io {
        path: display.clone(),
        source,
    })?;
    let records: Vec<DatasetRecord> =
        serde_json::from_str(&text).map_err(|source| DatasetError::Parse { path: display, source })?;
    info!("Loaded {} paths from split {}", records.len(), split);
    Ok(records)
}

/// Loads and concatenates several splits in order.
pub fn load_splits<S: AsRef<str>>(data_dir: &Path, splits: &[S]) -> Result<Vec<DatasetRecord>, DatasetError> {
    let mut all = Vec::new();
    for split in splits {
        all.extend(load_split(data_dir, split.as_ref())?);
    }
    Ok(all)
}

#[cfg(test)]
mod tests {
    use super::*;

    const JSON: &str = r#"[
        {"path_id": 4, "scan": "S", "path": ["A", "B", "C"], "heading": 0.5,
         "instructions": ["walk north", "go to the end"], "distance": 2.0},
        {"path_id": 9, "scan": "T", "path": ["P", "Q"], "heading": 0.0,
         "instructions": ["step east"]}
    ]"#;

    #[test]
    fn parses_records() {
        let records: Vec<DatasetRecord> = serde_json::from_str(JSON).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].start(), Some("A"));
        assert_eq!(records[0].goal(), Some("C"));
        assert_eq!(records[1].distance, None);
        assert_eq!(records[0].instr_ids().collect::<Vec<_>>(), ["4_0", "4_1"]);
    }

    #[test]
    fn instr_id_parsing() {
        assert_eq!(parse_instr_id("123_2"), Some((123, 2)));
        assert_eq!(parse_instr_id("abc_2"), None);
        assert_eq!(parse_instr_id("123"), None);
    }

    #[test]
    fn loads_splits_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(split_path(dir.path(), "train"), JSON).unwrap();
        std::fs::write(split_path(dir.path(), "val_seen"), "[]").unwrap();
        let records = load_splits(dir.path(), &["train", "val_seen"]).unwrap();
        assert_eq!(records.len(), 2);
        assert!(matches!(
            load_split(dir.path(), "test"),
            Err(DatasetError::Io { .. })
        ));
    }
}
