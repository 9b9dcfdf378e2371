use thiserror::Error;

use crate::Id;

/// Errors raised by feature stores.
#[derive(Debug, Error)]
pub enum FeatureError {
    #[error("No features for viewpoint {viewpoint} in scan {scan}")]
    FeatureNotFound { scan: Id, viewpoint: Id },

    #[error("View index {index} out of range (store holds {views} views)")]
    ViewIndexOutOfRange { index: usize, views: usize },

    #[error("Feature I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not decode feature row at line {line}: {reason}")]
    Decode { line: usize, reason: String },

    #[error("Malformed .npy file {path}: {reason}")]
    Npy { path: String, reason: String },
}

impl FeatureError {
    pub(crate) fn not_found(scan: &str, viewpoint: &str) -> Self {
        FeatureError::FeatureNotFound {
            scan: scan.to_string(),
            viewpoint: viewpoint.to_string(),
        }
    }
}
