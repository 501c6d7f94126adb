//! IO-free line editing.
//!
//! [`Line`] consumes one input byte at a time, applies the resulting
//! edit to the buffer and returns an [`Output`] describing what to write
//! to the terminal. It never touches a device, so the whole editing
//! behavior can be driven and inspected from tests.

use tracing::trace;

use crate::error::RawlineError;
use crate::input::{Action, ControlCharacter as Ctrl, Key, Literal, Parser};
use crate::line_buffer::LineBuffer;
use crate::output::{Output, OutputAction};
use crate::utf8::Utf8Char;
use crate::width::{display_width, display_width_lossy};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Command {
    Ignore,
    Insert(Utf8Char),
    InsertLiteral(Literal),
    MoveLeft,
    MoveRight,
    MoveStart,
    MoveEnd,
    MoveWordLeft,
    MoveWordRight,
    DeleteForward,
    DeleteBackward,
    DeleteWordBackward,
    Transpose,
    Submit,
    EndOfInput,
    Interrupt,
}

pub struct Line<'a> {
    buffer: &'a mut LineBuffer,
    parser: Parser,
    prompt: &'a str,
    prompt_width: usize,
    cursor: usize,
}

impl<'a> Line<'a> {
    /// Fails with [`RawlineError::InvalidCharacter`] if the prompt holds a
    /// character without a printable width.
    pub fn new(prompt: &'a str, buffer: &'a mut LineBuffer) -> Result<Self, RawlineError> {
        let prompt_width = display_width(prompt.as_bytes())?;

        Ok(Self {
            buffer,
            parser: Parser::new(),
            prompt,
            prompt_width,
            cursor: 0,
        })
    }

    /// Byte offset of the cursor in the buffer.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Zero-based terminal column of the cursor.
    pub fn column(&self) -> usize {
        self.prompt_width + display_width_lossy(&self.buffer.as_str()[..self.cursor])
    }

    pub fn buffer(&self) -> &LineBuffer {
        self.buffer
    }

    /// Start a fresh line and render the prompt.
    pub fn reset(&mut self) -> Output<'_> {
        self.buffer.truncate();
        self.parser = Parser::new();
        self.cursor = 0;

        self.output(OutputAction::Render)
    }

    fn output(&self, action: OutputAction) -> Output<'_> {
        Output::new(
            self.prompt.as_bytes(),
            self.buffer.as_slice(),
            self.column(),
            action,
        )
    }

    fn command(&self, action: Action) -> Command {
        match action {
            Action::Ignore | Action::InvalidUtf8 => Command::Ignore,
            Action::Print(c) => Command::Insert(c),
            Action::Literal(literal) => Command::InsertLiteral(literal),
            Action::Key(key) => match key {
                Key::Left => Command::MoveLeft,
                Key::Right => Command::MoveRight,
                Key::Home => Command::MoveStart,
                Key::End => Command::MoveEnd,
                Key::Delete => Command::DeleteForward,
                Key::WordLeft => Command::MoveWordLeft,
                Key::WordRight => Command::MoveWordRight,
            },
            Action::ControlCharacter(c) => match c {
                Ctrl::CtrlA => Command::MoveStart,
                Ctrl::CtrlB => Command::MoveLeft,
                Ctrl::CtrlC => Command::Interrupt,
                Ctrl::CtrlD if self.buffer.is_empty() => Command::EndOfInput,
                Ctrl::CtrlD => Command::DeleteForward,
                Ctrl::CtrlE => Command::MoveEnd,
                Ctrl::CtrlF => Command::MoveRight,
                Ctrl::CtrlH | Ctrl::Backspace => Command::DeleteBackward,
                Ctrl::CarriageReturn => Command::Submit,
                Ctrl::CtrlT => Command::Transpose,
                Ctrl::CtrlW => Command::DeleteWordBackward,
                _ => Command::Ignore,
            },
        }
    }

    fn insert(&mut self, s: &str) -> Result<OutputAction, RawlineError> {
        self.cursor = self.buffer.insert_str(self.cursor, s)?;

        Ok(OutputAction::Render)
    }

    fn transpose(&mut self) {
        if self.cursor == 0 {
            return;
        }

        // At the end of the line the last two characters are swapped and
        // the cursor stays put.
        let pos = if self.cursor == self.buffer.len() {
            self.buffer.previous_char(self.cursor)
        } else {
            Some(self.cursor)
        };

        if let Some(end) = pos.and_then(|pos| self.buffer.swap_chars(pos)) {
            self.cursor = end;
        }
    }

    fn apply(&mut self, command: Command) -> Result<OutputAction, RawlineError> {
        match command {
            Command::Ignore => return Ok(OutputAction::Nothing),
            Command::Insert(c) => {
                if c.to_char().is_control() {
                    return Ok(OutputAction::Nothing);
                }

                return self.insert(c.as_str());
            }
            Command::InsertLiteral(literal) => {
                trace!(literal = literal.as_str(), "inserting unrecognized escape sequence");

                return self.insert(literal.as_str());
            }
            Command::MoveLeft => {
                if let Some(pos) = self.buffer.previous_char(self.cursor) {
                    self.cursor = pos;
                }
            }
            Command::MoveRight => {
                if let Some(pos) = self.buffer.next_char(self.cursor) {
                    self.cursor = pos;
                }
            }
            Command::MoveStart => self.cursor = 0,
            Command::MoveEnd => self.cursor = self.buffer.len(),
            Command::MoveWordLeft => self.cursor = self.buffer.previous_word(self.cursor),
            Command::MoveWordRight => self.cursor = self.buffer.next_word(self.cursor),
            Command::DeleteForward => {
                self.buffer.delete(self.cursor);
            }
            Command::DeleteBackward => {
                if let Some(pos) = self.buffer.previous_char(self.cursor) {
                    self.buffer.delete(pos);
                    self.cursor = pos;
                }
            }
            Command::DeleteWordBackward => {
                self.cursor = self.buffer.delete_previous_word(self.cursor);
            }
            Command::Transpose => self.transpose(),
            Command::Submit => return Ok(OutputAction::Submit),
            Command::EndOfInput => return Ok(OutputAction::EndOfInput),
            Command::Interrupt => {
                self.cursor = self.buffer.len();

                return Ok(OutputAction::Interrupt);
            }
        }

        Ok(OutputAction::Render)
    }

    /// Feed one input byte.
    pub fn advance(&mut self, byte: u8) -> Result<Output<'_>, RawlineError> {
        let mut action = OutputAction::Nothing;
        let mut next = Some(byte);

        while let Some(byte) = next {
            let input = self.parser.advance(byte);
            let command = self.command(input);

            action = action.then(self.apply(command)?);
            next = self.parser.take_pending();
        }

        Ok(self.output(action))
    }
}
