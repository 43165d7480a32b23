use thiserror::Error;

/// Errors raised while constructing cycles or dependency trees.
///
/// These are fatal: an invalid definition is never coerced into a valid one.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("invalid {field} field '{value}': {reason}")]
    InvalidField {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("{field} value {value} out of range {min}-{max}")]
    OutOfRange {
        field: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },

    #[error("invalid duration '{0}'")]
    InvalidDuration(String),

    #[error("invalid timestamp '{0}'")]
    InvalidTimestamp(String),

    #[error("invalid interval: {0}")]
    InvalidInterval(String),

    #[error("threshold {0} must lie within [0, 1]")]
    InvalidThreshold(f64),

    #[error("{operator} requires {expected}, got {actual} operand(s)")]
    InvalidArity {
        operator: &'static str,
        expected: &'static str,
        actual: usize,
    },

    #[error("{0}")]
    Other(String),
}

/// Result alias for construction-time operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Failures reported by evaluation-time collaborators (job lookup, I/O probe).
///
/// The evaluator never propagates these to its caller: they degrade the
/// affected predicate to "unresolved".
#[derive(Error, Debug)]
pub enum CollaboratorError {
    #[error("collaborator unavailable: {0}")]
    Unavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
