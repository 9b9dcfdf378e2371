use thiserror::Error;

/// Errors raised while loading instruction datasets.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Could not read dataset {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed dataset {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Dataset splits {0:?} contain no instructions")]
    EmptyDataset(Vec<String>),
}
