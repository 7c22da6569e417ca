//! Error types for head management.
//!
//! The merge, dedup and synchronization paths never fail: dropping or
//! ignoring bad input is policy there, and head markup is parsed with error
//! recovery. `HeadError` only covers reading declaration files.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the head library.
#[derive(Debug, Error)]
pub enum HeadError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML (de)serialization error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Declaration file exceeds the size limit.
    #[error("Declaration file {} is {size} bytes, limit is {limit}", .path.display())]
    DeclarationTooLarge {
        path: PathBuf,
        size: u64,
        limit: u64,
    },

    /// Declaration file has an extension we cannot read.
    #[error("Unsupported declaration file '{}': expected .yaml, .yml or .json", .0.display())]
    UnsupportedDeclaration(PathBuf),
}

/// Result type alias for head operations.
pub type Result<T> = std::result::Result<T, HeadError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_too_large_display() {
        let err = HeadError::DeclarationTooLarge {
            path: PathBuf::from("page.yaml"),
            size: 20,
            limit: 10,
        };
        assert_eq!(
            err.to_string(),
            "Declaration file page.yaml is 20 bytes, limit is 10"
        );
    }

    #[test]
    fn test_unsupported_declaration_display() {
        let err = HeadError::UnsupportedDeclaration(PathBuf::from("page.toml"));
        assert!(err.to_string().contains("page.toml"));
        assert!(err.to_string().contains(".json"));
    }
}
