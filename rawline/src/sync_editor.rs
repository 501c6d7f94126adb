//! Blocking line editor.
//!
//! [`Editor`] owns the IO wrapper, the raw mode controller and the line
//! buffer. Each call to [`Editor::readline`] puts the terminal in raw
//! mode, feeds keystrokes to the IO-free [`Line`] and writes its output
//! until the line is submitted, input ends or the user interrupts.

use tracing::debug;

use crate::core::Line;
use crate::cursor::get_columns;
use crate::error::RawlineError;
use crate::line_buffer::LineBuffer;
use crate::output::{Output, OutputItem};
use crate::sync_io::{SyncIO, IO};
use crate::terminal::{RawMode, TerminalControl};

/// How an editing session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditResult {
    /// Enter was pressed.
    Line(String),
    /// Ctrl-D on an empty line, or the input device was closed.
    EndOfInput,
    /// Ctrl-C was pressed. Whatever was typed is discarded.
    Interrupted,
}

#[derive(Debug, Copy, Clone)]
enum Finished {
    Line,
    EndOfInput,
    Interrupted,
}

/// Line editor
pub struct Editor<R, W, T>
where
    R: embedded_io::Read,
    W: embedded_io::Write,
    T: TerminalControl,
{
    io: IO<R, W>,
    raw_mode: RawMode<T>,
    buffer: LineBuffer,
}

impl<R, W, T> Editor<R, W, T>
where
    R: embedded_io::Read,
    W: embedded_io::Write,
    T: TerminalControl,
{
    pub fn new(io: IO<R, W>, terminal: T) -> Self {
        Self {
            io,
            raw_mode: RawMode::new(terminal),
            buffer: LineBuffer::new(),
        }
    }

    /// IO wrapper, for writing to the terminal between lines.
    pub fn io(&mut self) -> &mut IO<R, W> {
        &mut self.io
    }

    pub fn raw_mode(&mut self) -> &mut RawMode<T> {
        &mut self.raw_mode
    }

    fn handle_output(
        output: Output<'_>,
        io: &mut IO<R, W>,
    ) -> Result<Option<Finished>, RawlineError> {
        let mut finished = None;

        for item in output {
            if let Some(bytes) = item.get_bytes() {
                io.write(bytes)?;
            }

            match item {
                OutputItem::Line => finished = Some(Finished::Line),
                OutputItem::EndOfInput => finished = Some(Finished::EndOfInput),
                OutputItem::Interrupted => finished = Some(Finished::Interrupted),
                OutputItem::Slice(_) | OutputItem::UintToBytes(_) => (),
            }
        }

        io.flush()?;

        Ok(finished)
    }

    /// Read a line, showing `prompt` in front of it.
    ///
    /// Fails with [`RawlineError::NotSupported`] without touching the
    /// device if the input is not a terminal. The terminal is back in
    /// its original mode when this returns, also on error.
    pub fn readline(&mut self, prompt: &str) -> Result<EditResult, RawlineError> {
        if !self.raw_mode.terminal().is_tty() {
            return Err(RawlineError::NotSupported);
        }

        let mut line = Line::new(prompt, &mut self.buffer)?;
        let _session = self.raw_mode.session()?;

        Self::handle_output(line.reset(), &mut self.io)?;

        let finished = loop {
            let mut byte = [0];

            if self.io.read(&mut byte)? == 0 {
                debug!("input closed");
                break Finished::EndOfInput;
            }

            if let Some(finished) = Self::handle_output(line.advance(byte[0])?, &mut self.io)? {
                break finished;
            }
        };

        let result = match finished {
            Finished::Line => EditResult::Line(self.buffer.take()),
            Finished::EndOfInput => {
                self.buffer.truncate();
                EditResult::EndOfInput
            }
            Finished::Interrupted => {
                self.buffer.truncate();
                EditResult::Interrupted
            }
        };

        debug!(?finished, "line finished");

        Ok(result)
    }

    /// Width of the terminal in columns.
    pub fn columns(&mut self) -> Result<usize, RawlineError> {
        let session = self.raw_mode.session()?;

        get_columns(session.terminal(), &mut self.io)
    }
}
