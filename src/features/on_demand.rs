//! Lazily read `.npy` feature arrays.
//!
//! Each viewpoint has its own file `{dir}/{scan}/{viewpoint}.npy` holding a
//! little-endian `f32` array whose leading dimension is the 36 views. A lookup
//! maps the file and copies out a single view without reading the rest.

use std::fs::File;
use std::path::{Path, PathBuf};

use memmap2::Mmap;

use super::error::FeatureError;
use super::{check_view_index, FeatureStore};
use crate::geometry::VIEW_COUNT;

const NPY_MAGIC: &[u8] = b"\x93NUMPY";

/// Parsed `.npy` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NpyHeader {
    pub shape: Vec<usize>,
    /// Byte offset of the array data.
    pub data_offset: usize,
}

impl NpyHeader {
    /// Number of floats per leading-dimension row.
    pub fn row_width(&self) -> usize {
        self.shape.iter().skip(1).product()
    }
}

/// Parses the header of a `.npy` file (format versions 1 through 3).
///
/// Only C-ordered little-endian `f32` arrays are accepted.
pub fn parse_header(bytes: &[u8]) -> Result<NpyHeader, String> {
    if bytes.len() < 10 || &bytes[..6] != NPY_MAGIC {
        return Err("missing NUMPY magic".into());
    }
    let (len, start) = match bytes[6] {
        1 => (u16::from_le_bytes([bytes[8], bytes[9]]) as usize, 10),
        2 | 3 if bytes.len() >= 12 => (
            u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]) as usize,
            12,
        ),
        v => return Err(format!("unsupported format version {}", v)),
    };
    let dict = bytes
        .get(start..start + len)
        .ok_or("truncated header")
        .and_then(|b| std::str::from_utf8(b).map_err(|_| "header is not UTF-8"))?;

    let descr = dict_value(dict, "descr").ok_or("missing descr")?;
    if !descr.contains("<f4") {
        return Err(format!("unsupported dtype {}", descr));
    }
    let fortran = dict_value(dict, "fortran_order").ok_or("missing fortran_order")?;
    if fortran.starts_with("True") {
        return Err("Fortran-ordered arrays are not supported".into());
    }
    let shape_src = dict_value(dict, "shape").ok_or("missing shape")?;
    let open = shape_src.find('(').ok_or("malformed shape")?;
    let close = shape_src.find(')').ok_or("malformed shape")?;
    let shape = shape_src[open + 1..close]
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<usize>().map_err(|e| format!("shape: {}", e)))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(NpyHeader {
        shape,
        data_offset: start + len,
    })
}

/// Text following `'key':` in a header dict literal.
fn dict_value<'a>(dict: &'a str, key: &str) -> Option<&'a str> {
    let pattern = format!("'{}':", key);
    let at = dict.find(&pattern)?;
    Some(dict[at + pattern.len()..].trim_start())
}

/// Feature store reading one `.npy` file per lookup.
#[derive(Debug, Clone)]
pub struct OnDemandFeatures {
    root: PathBuf,
    row_width: usize,
}

impl OnDemandFeatures {
    pub fn new(root: PathBuf, row_width: usize) -> Self {
        Self { root, row_width }
    }

    pub fn path_of(&self, scan: &str, viewpoint: &str) -> PathBuf {
        self.root.join(scan).join(format!("{}.npy", viewpoint))
    }

    fn read_view(&self, path: &Path, view_index: usize) -> Result<Vec<f32>, FeatureError> {
        let display = path.display().to_string();
        let npy_err = |reason: String| FeatureError::Npy {
            path: display.clone(),
            reason,
        };
        let file = File::open(path).map_err(|source| FeatureError::Io {
            path: display.clone(),
            source,
        })?;
        // SAFETY: the map is read-only and dropped before returning; feature
        // files are not modified while an environment is running.
        let map = unsafe { Mmap::map(&file) }.map_err(|source| FeatureError::Io {
            path: display.clone(),
            source,
        })?;

        let header = parse_header(&map).map_err(&npy_err)?;
        if header.shape.first() != Some(&VIEW_COUNT) {
            return Err(npy_err(format!("leading dimension {:?} is not {}", header.shape.first(), VIEW_COUNT)));
        }
        if header.row_width() != self.row_width {
            return Err(npy_err(format!(
                "row width {} differs from configured {}",
                header.row_width(),
                self.row_width
            )));
        }

        let row_bytes = self.row_width * 4;
        let start = header.data_offset + view_index * row_bytes;
        let bytes = map
            .get(start..start + row_bytes)
            .ok_or_else(|| npy_err("file is shorter than its header claims".into()))?;
        Ok(bytes
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect())
    }
}

impl FeatureStore for OnDemandFeatures {
    fn get(&self, scan: &str, viewpoint: &str, view_index: usize) -> Result<Vec<f32>, FeatureError> {
        check_view_index(view_index)?;
        let path = self.path_of(scan, viewpoint);
        if !path.exists() {
            return Err(FeatureError::not_found(scan, viewpoint));
        }
        self.read_view(&path, view_index)
    }

    fn feature_dim(&self) -> usize {
        self.row_width
    }

    fn name(&self) -> &str {
        "on-demand"
    }
}
