//! Cursor position reports and terminal width detection.

use crate::error::RawlineError;
use crate::output::{UintToBytes, UINT_DIGITS};
use crate::sync_io::SyncIO;
use crate::terminal::TerminalControl;

/// Width assumed by callers when the terminal cannot tell.
pub const DEFAULT_COLUMNS: usize = 80;

/// Device status report request, answered with `ESC [ row ; column R`.
const CURSOR_POSITION_REQUEST: &[u8] = b"\x1b[6n";

/// Longest cursor position report accepted.
const REPLY_CAPACITY: usize = 32;

/// Cursor position as reported by the terminal, counting from 1.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Cursor {
    pub row: usize,
    pub column: usize,
}

impl Cursor {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

/// Parse a complete `ESC [ row ; column R` reply.
pub fn parse_cursor_position(reply: &[u8]) -> Result<Cursor, RawlineError> {
    let body = reply
        .strip_prefix(b"\x1b[")
        .and_then(|body| body.strip_suffix(b"R"))
        .ok_or(RawlineError::InvalidEscapeSequence)?;

    let body = core::str::from_utf8(body).map_err(|_| RawlineError::InvalidEscapeSequence)?;

    let (row, column) = body
        .split_once(';')
        .ok_or(RawlineError::InvalidEscapeSequence)?;

    let parse = |n: &str| {
        if n.is_empty() || !n.bytes().all(|b| b.is_ascii_digit()) {
            return Err(RawlineError::InvalidEscapeSequence);
        }

        n.parse::<usize>()
            .map_err(|_| RawlineError::InvalidEscapeSequence)
    };

    Ok(Cursor::new(parse(row)?, parse(column)?))
}

/// Ask the terminal where the cursor is and return its column, counting
/// from 1.
pub fn get_cursor_position<IO: SyncIO>(io: &mut IO) -> Result<usize, RawlineError> {
    io.write(CURSOR_POSITION_REQUEST)?;
    io.flush()?;

    let mut reply = [0u8; REPLY_CAPACITY];
    let mut len = 0;

    while len < reply.len() {
        let mut byte = [0u8];

        if io.read(&mut byte)? == 0 {
            break;
        }

        reply[len] = byte[0];
        len += 1;

        if byte[0] == b'R' {
            return parse_cursor_position(&reply[..len]).map(|cursor| cursor.column);
        }
    }

    Err(RawlineError::InvalidEscapeSequence)
}

/// Width of the terminal in columns.
///
/// The window size query is tried first. If it fails or reports zero,
/// the cursor is pushed to the right margin and its position read back,
/// after which it is returned to where it was.
pub fn get_columns<T, IO>(terminal: &T, io: &mut IO) -> Result<usize, RawlineError>
where
    T: TerminalControl,
    IO: SyncIO,
{
    if let Ok(columns) = terminal.window_columns() {
        if columns > 0 {
            return Ok(columns as usize);
        }
    }

    let start = get_cursor_position(io)?;

    io.write(b"\x1b[999C")?;
    let columns = get_cursor_position(io)?;

    if columns > start {
        let steps = UintToBytes::<UINT_DIGITS>::from_uint(columns - start)
            .ok_or(RawlineError::InvalidEscapeSequence)?;

        io.write(b"\x1b[")?;
        io.write(steps.as_bytes())?;
        io.write(b"D")?;
        io.flush()?;
    }

    Ok(columns)
}
