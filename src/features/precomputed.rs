//! In-memory feature table loaded from a TSV file.
//!
//! Columns: `scanId, viewpointId, image_w, image_h, vfov, features`, where
//! `features` is the base64 encoding of a little-endian `f32` array of shape
//! `[36, D]`.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::info;

use super::error::FeatureError;
use super::{check_view_index, FeatureStore};
use crate::geometry::VIEW_COUNT;
use crate::Id;

/// One parsed TSV row.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    pub scan: Id,
    pub viewpoint: Id,
    pub image_w: u32,
    pub image_h: u32,
    pub vfov: u32,
    /// Row-major `[36, D]` values.
    pub values: Vec<f32>,
}

/// Camera parameters recorded alongside the features.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraInfo {
    pub image_w: u32,
    pub image_h: u32,
    pub vfov: u32,
}

/// Precomputed features held in memory, keyed by scan then viewpoint.
#[derive(Debug, Clone)]
pub struct PrecomputedFeatures {
    table: HashMap<Id, HashMap<Id, Vec<f32>>>,
    dim: usize,
    camera: Option<CameraInfo>,
}

impl PrecomputedFeatures {
    /// Loads every row of the TSV file at `path`.
    pub fn load(path: &Path) -> Result<Self, FeatureError> {
        info!("Loading image features from {}", path.display());
        let rows = read_rows(path)?;
        let store = Self::from_rows(rows)?;
        info!(
            "Loaded features for {} viewpoints",
            store.table.values().map(|m| m.len()).sum::<usize>()
        );
        Ok(store)
    }

    /// Builds the table from already-decoded rows.
    ///
    /// All rows must share the width of the first row.
    pub fn from_rows(rows: Vec<FeatureRow>) -> Result<Self, FeatureError> {
        let mut table: HashMap<Id, HashMap<Id, Vec<f32>>> = HashMap::new();
        let mut dim = 0;
        let mut camera = None;

        for (line, row) in rows.into_iter().enumerate() {
            if row.values.is_empty() || row.values.len() % VIEW_COUNT != 0 {
                return Err(FeatureError::Decode {
                    line: line + 1,
                    reason: format!("{} values is not a multiple of {}", row.values.len(), VIEW_COUNT),
                });
            }
            let row_dim = row.values.len() / VIEW_COUNT;
            if dim == 0 {
                dim = row_dim;
            } else if row_dim != dim {
                return Err(FeatureError::Decode {
                    line: line + 1,
                    reason: format!("width {} differs from {}", row_dim, dim),
                });
            }
            camera = Some(CameraInfo {
                image_w: row.image_w,
                image_h: row.image_h,
                vfov: row.vfov,
            });
            table.entry(row.scan).or_default().insert(row.viewpoint, row.values);
        }

        Ok(Self { table, dim, camera })
    }

    /// Camera parameters of the last loaded row, if any.
    pub fn camera(&self) -> Option<CameraInfo> {
        self.camera
    }

    pub fn contains(&self, scan: &str, viewpoint: &str) -> bool {
        self.table.get(scan).is_some_and(|m| m.contains_key(viewpoint))
    }
}

impl FeatureStore for PrecomputedFeatures {
    fn get(&self, scan: &str, viewpoint: &str, view_index: usize) -> Result<Vec<f32>, FeatureError> {
        check_view_index(view_index)?;
        let values = self
            .table
            .get(scan)
            .and_then(|m| m.get(viewpoint))
            .ok_or_else(|| FeatureError::not_found(scan, viewpoint))?;
        let start = view_index * self.dim;
        Ok(values[start..start + self.dim].to_vec())
    }

    fn feature_dim(&self) -> usize {
        self.dim
    }

    fn name(&self) -> &str {
        "precomputed"
    }
}

fn open(path: &Path) -> Result<BufReader<File>, FeatureError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| FeatureError::Io {
            path: path.display().to_string(),
            source,
        })
}

fn lines(path: &Path) -> Result<impl Iterator<Item = Result<(usize, String), FeatureError>>, FeatureError> {
    let display = path.display().to_string();
    Ok(open(path)?.lines().enumerate().filter_map(move |(i, line)| match line {
        Ok(l) if l.trim().is_empty() => None,
        Ok(l) => Some(Ok((i + 1, l))),
        Err(source) => Some(Err(FeatureError::Io {
            path: display.clone(),
            source,
        })),
    }))
}

/// Parses one TSV line into a [`FeatureRow`].
pub fn parse_row(line_no: usize, line: &str) -> Result<FeatureRow, FeatureError> {
    let decode_err = |reason: String| FeatureError::Decode { line: line_no, reason };
    let cols: Vec<&str> = line.split('\t').collect();
    if cols.len() != 6 {
        return Err(decode_err(format!("expected 6 columns, found {}", cols.len())));
    }
    let int = |s: &str, name: &str| {
        s.trim()
            .parse::<u32>()
            .map_err(|e| decode_err(format!("{}: {}", name, e)))
    };
    let bytes = STANDARD
        .decode(cols[5].trim())
        .map_err(|e| decode_err(format!("base64: {}", e)))?;
    if bytes.len() % 4 != 0 {
        return Err(decode_err(format!("{} bytes is not a whole number of f32", bytes.len())));
    }
    let values = bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect();

    Ok(FeatureRow {
        scan: cols[0].to_string(),
        viewpoint: cols[1].to_string(),
        image_w: int(cols[2], "image_w")?,
        image_h: int(cols[3], "image_h")?,
        vfov: int(cols[4], "vfov")?,
        values,
    })
}

/// Reads and decodes every row of a feature TSV file.
pub fn read_rows(path: &Path) -> Result<Vec<FeatureRow>, FeatureError> {
    lines(path)?
        .map(|line| {
            let (no, text) = line?;
            parse_row(no, &text)
        })
        .collect()
}

/// Reads only the `(scan, viewpoint)` keys of a feature TSV file.
pub fn read_keys(path: &Path) -> Result<HashMap<Id, HashSet<Id>>, FeatureError> {
    let mut keys: HashMap<Id, HashSet<Id>> = HashMap::new();
    for line in lines(path)? {
        let (no, text) = line?;
        let mut cols = text.split('\t');
        match (cols.next(), cols.next()) {
            (Some(scan), Some(vp)) => {
                keys.entry(scan.to_string()).or_default().insert(vp.to_string());
            }
            _ => {
                return Err(FeatureError::Decode {
                    line: no,
                    reason: "missing scan or viewpoint column".into(),
                })
            }
        }
    }
    Ok(keys)
}

/// Encodes a row in the TSV layout read by [`parse_row`].
pub fn encode_row(row: &FeatureRow) -> String {
    let bytes: Vec<u8> = row.values.iter().flat_map(|v| v.to_le_bytes()).collect();
    format!(
        "{}\t{}\t{}\t{}\t{}\t{}",
        row.scan,
        row.viewpoint,
        row.image_w,
        row.image_h,
        row.vfov,
        STANDARD.encode(bytes)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(scan: &str, vp: &str, dim: usize, offset: f32) -> FeatureRow {
        FeatureRow {
            scan: scan.into(),
            viewpoint: vp.into(),
            image_w: 640,
            image_h: 480,
            vfov: 60,
            values: (0..VIEW_COUNT * dim).map(|i| i as f32 + offset).collect(),
        }
    }

    #[test]
    fn get_returns_view_row() {
        let store = PrecomputedFeatures::from_rows(vec![row("S", "A", 4, 0.0)]).unwrap();
        assert_eq!(store.feature_dim(), 4);
        assert_eq!(store.get("S", "A", 2).unwrap(), vec![8.0, 9.0, 10.0, 11.0]);
    }

    #[test]
    fn missing_key_is_feature_not_found() {
        let store = PrecomputedFeatures::from_rows(vec![row("S", "A", 2, 0.0)]).unwrap();
        let err = store.get("S", "B", 0).unwrap_err();
        assert!(matches!(err, FeatureError::FeatureNotFound { .. }));
        assert!(store.get("S", "A", 36).is_err());
    }

    #[test]
    fn mismatched_widths_rejected() {
        let err = PrecomputedFeatures::from_rows(vec![row("S", "A", 2, 0.0), row("S", "B", 3, 0.0)])
            .unwrap_err();
        assert!(matches!(err, FeatureError::Decode { line: 2, .. }));
    }

    #[test]
    fn tsv_file_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feats.tsv");
        let text = format!(
            "{}\n{}\n",
            encode_row(&row("S", "A", 2, 0.5)),
            encode_row(&row("T", "P", 2, 100.0))
        );
        std::fs::write(&path, text).unwrap();

        let store = PrecomputedFeatures::load(&path).unwrap();
        assert_eq!(store.get("T", "P", 0).unwrap(), vec![100.0, 101.0]);
        assert_eq!(store.get("S", "A", 35).unwrap(), vec![70.5, 71.5]);
        assert_eq!(
            store.camera(),
            Some(CameraInfo {
                image_w: 640,
                image_h: 480,
                vfov: 60
            })
        );

        let keys = read_keys(&path).unwrap();
        assert!(keys["S"].contains("A"));
        assert!(keys["T"].contains("P"));
    }

    #[test]
    fn short_line_is_decode_error() {
        let err = parse_row(7, "S\tA\t640").unwrap_err();
        assert!(matches!(err, FeatureError::Decode { line: 7, .. }));
    }
}
