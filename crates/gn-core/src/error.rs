use thiserror::Error;

/// Errors raised by the core. All are local precondition failures; nothing
/// here is transient or retryable.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GravError {
    /// Caller passed a value outside the operation's domain.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Intensity is zero, negative or non-finite where a delay must be computed.
    #[error("degenerate state: {0}")]
    DegenerateState(String),

    /// Operation is not valid in the scheduler's current state.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// A sample line could not be parsed.
    #[error("invalid sample on line {line}: {reason}")]
    InvalidSample { line: usize, reason: String },

    /// Configuration failed to parse or validate.
    #[error("config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, GravError>;
