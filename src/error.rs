use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A row of the input could not be parsed into item tokens.
    #[error("malformed input at line {line}: {reason}")]
    Format { line: usize, reason: String },

    #[error("failed to read transactions")]
    Io(#[from] std::io::Error),

    /// Rule extraction was asked for a consequent that never occurs
    /// in any transaction.
    #[error("unknown item: {0}")]
    UnknownItem(String),

    #[error("invalid {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

impl Error {
    pub(crate) fn format(line: usize, reason: impl Into<String>) -> Self {
        Error::Format {
            line,
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_parameter(name: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
