//! Input decoding.
//!
//! [`Parser`] turns the raw byte stream from the keyboard into
//! [`Action`]s: printable characters, control characters and the
//! handful of escape sequences the editor understands. Escape sequences
//! outside that set are handed back as literal bytes so nothing the user
//! typed is silently lost.

use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::utf8::{sequence_len, Utf8Char, Utf8Decoder, Utf8DecoderStatus};

#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Eq, PartialEq, Copy, Clone, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum ControlCharacter {
    NUL = 0x0,
    CtrlA = 0x1,
    CtrlB = 0x2,
    CtrlC = 0x3,
    CtrlD = 0x4,
    CtrlE = 0x5,
    CtrlF = 0x6,
    CtrlG = 0x7,
    CtrlH = 0x8,
    Tab = 0x9,
    LineFeed = 0xA,
    CtrlK = 0xB,
    CtrlL = 0xC,
    CarriageReturn = 0xD,
    CtrlN = 0xE,
    CtrlO = 0xF,
    CtrlP = 0x10,
    CtrlQ = 0x11,
    CtrlR = 0x12,
    CtrlS = 0x13,
    CtrlT = 0x14,
    CtrlU = 0x15,
    CtrlV = 0x16,
    CtrlW = 0x17,
    CtrlX = 0x18,
    CtrlY = 0x19,
    CtrlZ = 0x1A,
    Escape = 0x1B,
    FS = 0x1C,
    GS = 0x1D,
    RS = 0x1E,
    US = 0x1F,
    Backspace = 0x7F,
}

/// Keys reported through escape sequences.
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum Key {
    Left,
    Right,
    Home,
    End,
    Delete,
    WordLeft,
    WordRight,
}

/// Longest unrecognized sequence handed back, `[1;5` plus one byte.
const LITERAL_CAPACITY: usize = 5;

/// Bytes of an escape sequence the parser did not recognize, minus the
/// leading ESC.
#[derive(Eq, PartialEq, Copy, Clone)]
pub struct Literal {
    buf: [u8; LITERAL_CAPACITY],
    len: u8,
}

impl core::fmt::Debug for Literal {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("Literal")
            .field(&String::from_utf8_lossy(self.as_bytes()))
            .finish()
    }
}

impl Literal {
    fn new(prefix: &[u8]) -> Self {
        let mut buf = [0; LITERAL_CAPACITY];
        let len = prefix.len().min(LITERAL_CAPACITY);
        buf[..len].copy_from_slice(&prefix[..len]);

        Self {
            buf,
            len: len as u8,
        }
    }

    fn push(mut self, byte: u8) -> Self {
        if (self.len as usize) < LITERAL_CAPACITY {
            self.buf[self.len as usize] = byte;
            self.len += 1;
        }

        self
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len as usize]
    }

    pub fn as_str(&self) -> &str {
        // Only printable ASCII is ever pushed.
        core::str::from_utf8(self.as_bytes()).unwrap_or_default()
    }
}

#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum Action {
    Ignore,
    Print(Utf8Char),
    InvalidUtf8,
    ControlCharacter(ControlCharacter),
    Key(Key),
    Literal(Literal),
}

#[derive(Debug, Eq, PartialEq)]
enum State {
    Ground,
    Utf8Sequence(Utf8Decoder),
    SeenEsc,
    Escape,
    EscapeOne,
    EscapeOneSemi,
    EscapeOneSemiFive,
    EscapeThree,
}

impl State {
    /// Bytes consumed since ESC in an escape state.
    fn prefix(&self) -> &'static [u8] {
        match self {
            State::Escape => b"[",
            State::EscapeOne => b"[1",
            State::EscapeOneSemi => b"[1;",
            State::EscapeOneSemiFive => b"[1;5",
            State::EscapeThree => b"[3",
            State::Ground | State::Utf8Sequence(_) | State::SeenEsc => b"",
        }
    }
}

fn is_printable_ascii(byte: u8) -> bool {
    (0x20..=0x7e).contains(&byte)
}

pub struct Parser {
    state: State,
    pending: Option<u8>,
}

impl Parser {
    pub fn new() -> Self {
        Self {
            state: State::Ground,
            pending: None,
        }
    }

    /// Byte that ended an unrecognized escape sequence without being
    /// part of it. It must be fed back through [`Parser::advance`].
    pub fn take_pending(&mut self) -> Option<u8> {
        self.pending.take()
    }

    fn transition(&mut self, state: State) -> Action {
        self.state = state;
        Action::Ignore
    }

    fn key(&mut self, key: Key) -> Action {
        self.state = State::Ground;
        Action::Key(key)
    }

    fn reject(&mut self, byte: u8) -> Action {
        let literal = Literal::new(self.state.prefix());
        self.state = State::Ground;

        if is_printable_ascii(byte) {
            Action::Literal(literal.push(byte))
        } else {
            self.pending = Some(byte);
            Action::Literal(literal)
        }
    }

    fn ground(&mut self, byte: u8) -> Action {
        match byte {
            0x1b => self.transition(State::SeenEsc),
            0x0..=0x1a | 0x1c..=0x1f | 0x7f => match ControlCharacter::try_from(byte) {
                Ok(c) => Action::ControlCharacter(c),
                Err(_) => Action::Ignore,
            },
            0x20..=0x7e | 0x80..=0xff => {
                let mut decoder = Utf8Decoder::new();

                match decoder.advance(byte) {
                    Utf8DecoderStatus::Continuation => {
                        self.transition(State::Utf8Sequence(decoder))
                    }
                    Utf8DecoderStatus::Done(c) => Action::Print(c),
                    Utf8DecoderStatus::Error => Action::InvalidUtf8,
                }
            }
        }
    }

    pub fn advance(&mut self, byte: u8) -> Action {
        match self.state {
            State::Ground => self.ground(byte),
            State::Utf8Sequence(ref mut decoder) => match decoder.advance(byte) {
                Utf8DecoderStatus::Continuation => Action::Ignore,
                Utf8DecoderStatus::Done(c) => {
                    self.state = State::Ground;
                    Action::Print(c)
                }
                Utf8DecoderStatus::Error => {
                    self.state = State::Ground;

                    // A byte that can start a character ends the broken
                    // sequence and is decoded on its own.
                    if sequence_len(byte).is_some() {
                        self.pending = Some(byte);
                    }

                    Action::InvalidUtf8
                }
            },
            State::SeenEsc => match byte {
                b'[' => self.transition(State::Escape),
                _ => {
                    // Not an escape sequence, handle the byte as a
                    // regular key.
                    self.state = State::Ground;
                    self.advance(byte)
                }
            },
            State::Escape => match byte {
                b'D' => self.key(Key::Left),
                b'C' => self.key(Key::Right),
                b'H' => self.key(Key::Home),
                b'F' => self.key(Key::End),
                b'1' => self.transition(State::EscapeOne),
                b'3' => self.transition(State::EscapeThree),
                _ => self.reject(byte),
            },
            State::EscapeOne => match byte {
                b';' => self.transition(State::EscapeOneSemi),
                _ => self.reject(byte),
            },
            State::EscapeOneSemi => match byte {
                b'5' => self.transition(State::EscapeOneSemiFive),
                _ => self.reject(byte),
            },
            State::EscapeOneSemiFive => match byte {
                b'C' => self.key(Key::WordRight),
                b'D' => self.key(Key::WordLeft),
                _ => self.reject(byte),
            },
            State::EscapeThree => match byte {
                b'~' => self.key(Key::Delete),
                _ => self.reject(byte),
            },
        }
    }
}
