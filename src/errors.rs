//! Errors raised at the I/O and configuration boundary.
//!
//! Classification, display tiering and aggregation never fail; only reading
//! input files, settings and group registries can.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// File system errors
    #[error("Failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Entity input that is not a list of records
    #[error("Invalid entity input from {origin}: {message}")]
    InvalidInput { origin: String, message: String },

    /// Settings file that does not parse
    #[error("Configuration error in {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },

    /// Group registry that does not parse
    #[error("Invalid group registry in {origin}: {message}")]
    Registry { origin: String, message: String },
}

impl Error {
    pub fn invalid_input(origin: impl Into<String>, message: impl ToString) -> Self {
        Self::InvalidInput {
            origin: origin.into(),
            message: message.to_string(),
        }
    }

    pub fn registry(origin: impl Into<String>, message: impl ToString) -> Self {
        Self::Registry {
            origin: origin.into(),
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_source() {
        let err = Error::Io {
            path: PathBuf::from("fleet.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert_eq!(err.to_string(), "Failed to access fleet.json: missing");

        let err = Error::invalid_input("stdin", "expected a JSON array");
        assert_eq!(
            err.to_string(),
            "Invalid entity input from stdin: expected a JSON array"
        );
    }

    #[test]
    fn test_io_error_keeps_source() {
        use std::error::Error as _;
        let err = Error::Io {
            path: PathBuf::from("x"),
            source: std::io::Error::other("boom"),
        };
        assert!(err.source().is_some());
    }
}
