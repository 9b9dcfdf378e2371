use thiserror::Error;

use crate::Id;

/// Errors raised by navigation graph loading and lookups.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("Unknown scan: {0}")]
    UnknownScan(Id),

    #[error("Unknown viewpoint {viewpoint} in scan {scan}")]
    UnknownViewpoint { scan: Id, viewpoint: Id },

    #[error("Viewpoint {to} is unreachable from {from} in scan {scan}")]
    Unreachable { scan: Id, from: Id, to: Id },

    #[error("Could not read navigation graph for scan {scan}: {source}")]
    Io {
        scan: Id,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed connectivity data for scan {scan}: {source}")]
    Parse {
        scan: Id,
        #[source]
        source: serde_json::Error,
    },
}

impl GraphError {
    pub(crate) fn unknown_viewpoint(scan: &str, viewpoint: &str) -> Self {
        GraphError::UnknownViewpoint {
            scan: scan.to_string(),
            viewpoint: viewpoint.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_scan_display() {
        let e = GraphError::UnknownScan("17DRP5sb8fy".into());
        assert_eq!(e.to_string(), "Unknown scan: 17DRP5sb8fy");
    }

    #[test]
    fn unknown_viewpoint_display() {
        let e = GraphError::unknown_viewpoint("S", "vp9");
        assert_eq!(e.to_string(), "Unknown viewpoint vp9 in scan S");
    }
}
