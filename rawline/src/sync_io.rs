//! Blocking IO for the editor.
//!
//! The editor talks to its devices through [`embedded_io`] traits, so any
//! byte stream can stand in for the terminal. [`StdinWrapper`] and
//! [`StdoutWrapper`] adapt the process' standard streams.

use core::fmt;
use std::io::{Read, Stdin, Stdout, Write};

use embedded_io::Error;

use crate::error::RawlineError;

pub trait SyncIO {
    /// Read into `buf`, returning the number of bytes read. `0` means the
    /// input device was closed.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, RawlineError>;
    fn write(&mut self, buf: &[u8]) -> Result<(), RawlineError>;
    fn flush(&mut self) -> Result<(), RawlineError>;
}

pub struct IO<R, W>
where
    R: embedded_io::Read,
    W: embedded_io::Write,
{
    input: R,
    output: W,
}

impl<R, W> IO<R, W>
where
    R: embedded_io::Read,
    W: embedded_io::Write,
{
    /// Create IO wrapper from input and output
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Consume wrapper and return input and output as tuple
    pub fn take(self) -> (R, W) {
        (self.input, self.output)
    }
}

impl<R, W> SyncIO for IO<R, W>
where
    R: embedded_io::Read,
    W: embedded_io::Write,
{
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, RawlineError> {
        self.input
            .read(buf)
            .map_err(|e| RawlineError::ReadError(e.kind()))
    }

    fn write(&mut self, buf: &[u8]) -> Result<(), RawlineError> {
        self.output
            .write_all(buf)
            .map_err(|e| RawlineError::WriteError(e.kind()))
    }

    fn flush(&mut self) -> Result<(), RawlineError> {
        self.output
            .flush()
            .map_err(|e| RawlineError::WriteError(e.kind()))
    }
}

impl<R, W> fmt::Write for IO<R, W>
where
    R: embedded_io::Read,
    W: embedded_io::Write,
{
    fn write_str(&mut self, s: &str) -> fmt::Result {
        SyncIO::write(self, s.as_bytes()).or(Err(fmt::Error))
    }
}

impl Default for IO<StdinWrapper, StdoutWrapper> {
    fn default() -> Self {
        Self::new(StdinWrapper::new(), StdoutWrapper::new())
    }
}

/// Wrapper for [`std::io::Stdin`]
pub struct StdinWrapper(Stdin);

impl StdinWrapper {
    pub fn new() -> Self {
        Self(std::io::stdin())
    }

    pub fn new_with(val: Stdin) -> Self {
        Self(val)
    }
}

impl Default for StdinWrapper {
    fn default() -> Self {
        Self::new()
    }
}

impl embedded_io::ErrorType for StdinWrapper {
    type Error = embedded_io::ErrorKind;
}

impl embedded_io::Read for StdinWrapper {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        loop {
            match self.0.read(buf) {
                Ok(len) => break Ok(len),
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => break Err(e.kind().into()),
            }
        }
    }
}

/// Wrapper for [`std::io::Stdout`]
pub struct StdoutWrapper(Stdout);

impl StdoutWrapper {
    pub fn new() -> Self {
        Self(std::io::stdout())
    }

    pub fn new_with(val: Stdout) -> Self {
        Self(val)
    }
}

impl Default for StdoutWrapper {
    fn default() -> Self {
        Self::new()
    }
}

impl embedded_io::ErrorType for StdoutWrapper {
    type Error = embedded_io::ErrorKind;
}

impl embedded_io::Write for StdoutWrapper {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.0.write(buf).map_err(|e| e.kind().into())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.0.flush().map_err(|e| e.kind().into())
    }
}
