use std::error::Error;
use std::fmt;

use linger_types::TypeTag;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerError {
    /// The type tag is not in the tracker's catalog.
    UnknownType { kind: TypeTag },
    Serialize(String),
}

impl fmt::Display for TrackerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownType { kind } => write!(f, "unknown async resource type: {kind}"),
            Self::Serialize(message) => write!(f, "failed to serialize report: {message}"),
        }
    }
}

impl Error for TrackerError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidNumber { var: &'static str, value: String },
    ZeroStackFrames { var: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidNumber { var, value } => {
                write!(f, "{var} must be a non-negative integer, got {value:?}")
            }
            Self::ZeroStackFrames { var } => write!(f, "{var} must be at least 1"),
        }
    }
}

impl Error for ConfigError {}
