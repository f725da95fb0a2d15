//! Error types for the register viewer.

/// Convenient wrapper around `Result` for [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while decoding, fetching, or configuring register views.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A lane or scalar value is not a valid hexadecimal literal.
    #[error("malformed hex literal '{0}'")]
    MalformedHex(String),
    /// A decimal lane value could not be read as a number.
    #[error("malformed numeric literal '{0}'")]
    MalformedNumber(String),
    /// Bit width outside of `{8, 16, 32, 64}`.
    #[error("unsupported bit width {0}")]
    UnsupportedWidth(u32),
    /// A request issued against the debug session failed.
    #[error("debug session request '{expression}' failed: {reason}")]
    Session {
        /// Expression that was evaluated.
        expression: String,
        /// Reason reported by the session.
        reason: String,
    },
    /// A command-line option received a value it does not accept.
    #[error("invalid value '{value}' for {option}")]
    InvalidOption {
        /// Name of the option.
        option: &'static str,
        /// Value that was rejected.
        value: String,
    },
    /// A command-line option that no flag accepts.
    #[error("unrecognized command-line option '{0}'")]
    UnrecognizedOption(String),
    /// A command-line option given without its value.
    #[error("missing value for '{0}'")]
    MissingValue(String),
    /// Reading the register dump failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
