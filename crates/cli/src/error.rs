//! Structured CLI errors with meaningful exit codes.
//!
//! Exit code scheme:
//! - 0:  success
//! - 2:  clap arg parse error (automatic, before our code runs)
//! - 10: session error (bad dimensions, bad config, scheduler failure)
//! - 11: I/O error (PNG write, seed file read/write)
//! - 12: input error (bad color, bad JSON params)
//! - 13: serialization error

use plexus_core::PlexusError;
use std::fmt;

/// Errors produced by CLI operations, each mapped to a distinct exit code.
#[derive(Debug)]
pub enum CliError {
    /// A core error other than I/O or color parsing.
    Session(PlexusError),
    /// An I/O error (file write, snapshot rendering).
    Io(String),
    /// A user input error (bad color, bad JSON params).
    Input(String),
    /// A serialization error (JSON output failure).
    Serialization(String),
}

impl CliError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Session(_) => 10,
            CliError::Io(_) => 11,
            CliError::Input(_) => 12,
            CliError::Serialization(_) => 13,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Session(e) => write!(f, "{e}"),
            CliError::Io(msg) => write!(f, "{msg}"),
            CliError::Input(msg) => write!(f, "{msg}"),
            CliError::Serialization(msg) => write!(f, "{msg}"),
        }
    }
}

impl From<PlexusError> for CliError {
    fn from(e: PlexusError) -> Self {
        match e {
            PlexusError::Io(msg) => CliError::Io(msg),
            PlexusError::InvalidColor(msg) => CliError::Input(format!("invalid color: {msg}")),
            other => CliError::Session(other),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Serialization(e.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_error_exit_code_is_10() {
        let err = CliError::Session(PlexusError::ClockUnavailable);
        assert_eq!(err.exit_code(), 10);
    }

    #[test]
    fn io_error_exit_code_is_11() {
        assert_eq!(CliError::Io("write failed".into()).exit_code(), 11);
    }

    #[test]
    fn input_error_exit_code_is_12() {
        assert_eq!(CliError::Input("bad params".into()).exit_code(), 12);
    }

    #[test]
    fn serialization_error_exit_code_is_13() {
        assert_eq!(CliError::Serialization("json fail".into()).exit_code(), 13);
    }

    #[test]
    fn from_plexus_io_routes_to_cli_io() {
        let cli_err = CliError::from(PlexusError::Io("disk full".into()));
        assert_eq!(cli_err.exit_code(), 11);
        assert!(cli_err.to_string().contains("disk full"));
    }

    #[test]
    fn from_plexus_color_routes_to_input() {
        let cli_err = CliError::from(PlexusError::InvalidColor("zz".into()));
        assert_eq!(cli_err.exit_code(), 12);
        assert!(cli_err.to_string().contains("zz"));
    }

    #[test]
    fn from_plexus_dimensions_routes_to_session() {
        let cli_err = CliError::from(PlexusError::InvalidDimensions {
            width: 0.0,
            height: 10.0,
        });
        assert_eq!(cli_err.exit_code(), 10);
    }

    #[test]
    fn from_std_io_error_routes_to_io() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "seed.json");
        assert_eq!(CliError::from(io).exit_code(), 11);
    }

    #[test]
    fn from_serde_json_error_routes_to_serialization() {
        let bad = serde_json::from_str::<serde_json::Value>("{invalid").unwrap_err();
        assert_eq!(CliError::from(bad).exit_code(), 13);
    }
}
