//! Error types for DishaIO

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// DishaIO error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Serial port error
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No complete frame within the timeout budget
    #[error("Frame timeout")]
    Timeout,

    /// Frame payload does not match the telemetry schema
    #[error("Schema error: expected {expected}-byte payload, got {actual}")]
    Schema {
        /// Payload length required by the message schema
        expected: usize,
        /// Payload length declared by the frame header
        actual: usize,
    },

    /// Wire-format decode failure on the network side
    #[error("Format error: {0}")]
    Format(String),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether this error is fatal to the owning loop.
    ///
    /// Transport-level failures (serial device gone, socket unusable) end the
    /// session; everything else is recoverable and the loop continues.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Serial(_) | Error::Io(_))
    }
}
