//! Error types for the input boundary.
//!
//! The path-finding operations themselves are total and never fail. Errors
//! only arise while loading or validating caller input.

use std::path::PathBuf;

use thiserror::Error;

/// Which end of a link a problem was found on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointSide {
    Source,
    Target,
}

impl std::fmt::Display for EndpointSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EndpointSide::Source => write!(f, "source"),
            EndpointSide::Target => write!(f, "target"),
        }
    }
}

#[derive(Debug, Error)]
pub enum MeshPathError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("link {index} has an empty {side} id")]
    EmptyEndpoint { index: usize, side: EndpointSide },

    #[error("invalid option {name}={value}: {reason}")]
    InvalidOption {
        name: &'static str,
        value: String,
        reason: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, MeshPathError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = MeshPathError::EmptyEndpoint {
            index: 4,
            side: EndpointSide::Target,
        };
        assert_eq!(err.to_string(), "link 4 has an empty target id");

        let err = MeshPathError::InvalidOption {
            name: "max_paths",
            value: "0".to_string(),
            reason: "must be at least 1",
        };
        assert_eq!(err.to_string(), "invalid option max_paths=0: must be at least 1");
    }
}
