//! Error types for k40-rgb-core.

use thiserror::Error;

/// Core library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Out-of-range or unparsable user input, or a wrong argument count.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// No matching USB device was enumerated.
    #[error("device not found (VID=0x{vid:04X} PID=0x{pid:04X})")]
    DeviceNotFound { vid: u16, pid: u16 },

    /// The transport reported an error for a control transfer.
    #[error("failed to {operation}: {reason}")]
    TransferFailed {
        operation: &'static str,
        reason: String,
    },

    /// Status buffer shorter than the decoder needs.
    #[error("malformed status response: {len} bytes (minimum {min})")]
    MalformedResponse { len: usize, min: usize },
}

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, Error>;
