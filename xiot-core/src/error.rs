use thiserror::Error;

/// Main error type for xiot device sessions
#[derive(Error, Debug)]
pub enum XiotError {
    /// An operation needing the protocol client ran before it was created
    #[error("client not created")]
    ClientNotCreated,

    #[error("client already created")]
    ClientAlreadyCreated,

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Timeout")]
    Timeout,

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for xiot operations
pub type XiotResult<T> = Result<T, XiotError>;
