//! Error types

use std::collections::TryReserveError;

use thiserror::Error;

/// Enum to hold various error types
#[derive(Debug, Error)]
pub enum RawlineError {
    /// Raw mode was requested on something that is not a terminal, or
    /// the terminal refused the configuration.
    #[error("device is not a terminal")]
    NotATty,
    /// Line editing was requested on a device that is not a terminal.
    #[error("line editing is not supported on this device")]
    NotSupported,
    /// Cursor position report did not have the shape `ESC [ row ; col R`.
    #[error("invalid escape sequence in terminal reply")]
    InvalidEscapeSequence,
    /// Text contains a code point without a printable width.
    #[error("invalid character")]
    InvalidCharacter,
    #[error("out of memory")]
    OutOfMemory(#[from] TryReserveError),
    #[error("read error: {0:?}")]
    ReadError(embedded_io::ErrorKind),
    #[error("write error: {0:?}")]
    WriteError(embedded_io::ErrorKind),
}

impl embedded_io::Error for RawlineError {
    fn kind(&self) -> embedded_io::ErrorKind {
        match *self {
            RawlineError::NotATty | RawlineError::NotSupported => {
                embedded_io::ErrorKind::Unsupported
            }
            RawlineError::InvalidEscapeSequence | RawlineError::InvalidCharacter => {
                embedded_io::ErrorKind::InvalidData
            }
            RawlineError::OutOfMemory(_) => embedded_io::ErrorKind::OutOfMemory,
            RawlineError::ReadError(kind) | RawlineError::WriteError(kind) => kind,
        }
    }
}
