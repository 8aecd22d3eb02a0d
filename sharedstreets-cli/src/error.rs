//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and the process exit code.

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::process;

use sharedstreets::config::ConfigFileError;
use sharedstreets::source::SourceError;
use sharedstreets::GraphError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Bad command-line value
    InvalidArgument(String),
    /// Failed to create the service or its runtime
    ServiceCreation(String),
    /// A tile or bounding-box request failed
    Request(GraphError),
    /// Failed to read an input file
    FileRead { path: PathBuf, error: io::Error },
    /// Failed to write output
    FileWrite { path: PathBuf, error: io::Error },
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Request(GraphError::UnresolvedIntersections { .. }) => {
                eprintln!();
                eprintln!("Some geometries point at intersections no covering tile contains.");
                eprintln!("Try a slightly larger bounding box, or check that every tile");
                eprintln!("around the area is published by the configured source.");
            }
            CliError::Request(GraphError::TooManyTiles { .. }) => {
                eprintln!();
                eprintln!("Query a smaller bounding box, or raise max_covering_tiles in the");
                eprintln!("[source] section of config.ini.");
            }
            CliError::Request(GraphError::Timeout(_)) => {
                eprintln!();
                eprintln!("Raise request_timeout in the [source] section of config.ini");
                eprintln!("or query a smaller bounding box.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            CliError::ServiceCreation(msg) => write!(f, "Failed to create service: {}", msg),
            CliError::Request(e) => write!(f, "Request failed: {}", e),
            CliError::FileRead { path, error } => {
                write!(f, "Failed to read file '{}': {}", path.display(), error)
            }
            CliError::FileWrite { path, error } => {
                write!(f, "Failed to write file '{}': {}", path.display(), error)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Request(e) => Some(e),
            CliError::FileRead { error, .. } => Some(error),
            CliError::FileWrite { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl From<GraphError> for CliError {
    fn from(e: GraphError) -> Self {
        CliError::Request(e)
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<SourceError> for CliError {
    fn from(e: SourceError) -> Self {
        CliError::ServiceCreation(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_request_error_keeps_source() {
        let err = CliError::from(GraphError::Cancelled);
        assert_eq!(err.to_string(), "Request failed: request cancelled");
        assert!(err.source().is_some());
    }

    #[test]
    fn test_file_read_names_path() {
        let err = CliError::FileRead {
            path: PathBuf::from("/tmp/missing.pbf"),
            error: io::Error::new(io::ErrorKind::NotFound, "no such file"),
        };
        assert_eq!(
            err.to_string(),
            "Failed to read file '/tmp/missing.pbf': no such file"
        );
    }

    #[test]
    fn test_source_error_maps_to_service_creation() {
        let err = CliError::from(SourceError::InvalidTemplate("bad".to_string()));
        assert!(matches!(err, CliError::ServiceCreation(_)));
    }
}
