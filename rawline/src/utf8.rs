//! Incremental UTF-8 decoding.
//!
//! Input arrives one byte at a time, so characters are assembled by a
//! small state machine rather than by `core::str::from_utf8`.

#[derive(Debug, Eq, PartialEq, Copy, Clone)]
enum Utf8ByteType {
    SingleByte,
    Continuation,
    Start(u8),
    Invalid,
}

fn utf8_byte_type(byte: u8) -> Utf8ByteType {
    if byte & 0b1000_0000 == 0 {
        Utf8ByteType::SingleByte
    } else if byte & 0b1100_0000 == 0b1000_0000 {
        Utf8ByteType::Continuation
    } else if byte & 0b1110_0000 == 0b1100_0000 {
        Utf8ByteType::Start(2)
    } else if byte & 0b1111_0000 == 0b1110_0000 {
        Utf8ByteType::Start(3)
    } else if byte & 0b1111_1000 == 0b1111_0000 {
        Utf8ByteType::Start(4)
    } else {
        Utf8ByteType::Invalid
    }
}

/// Number of bytes in the character starting with `byte`, or `None` if
/// `byte` cannot start a character.
pub(crate) fn sequence_len(byte: u8) -> Option<usize> {
    match utf8_byte_type(byte) {
        Utf8ByteType::SingleByte => Some(1),
        Utf8ByteType::Start(len) => Some(len as usize),
        Utf8ByteType::Continuation | Utf8ByteType::Invalid => None,
    }
}

/// A single encoded character, stored inline.
#[derive(Eq, PartialEq, Copy, Clone)]
pub struct Utf8Char {
    buf: [u8; 4],
    len: u8,
}

impl core::fmt::Debug for Utf8Char {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("Utf8Char").field(&self.to_char()).finish()
    }
}

impl Utf8Char {
    pub fn from_char(c: char) -> Self {
        let mut buf = [0; 4];
        let len = c.encode_utf8(&mut buf).len();

        Self {
            buf,
            len: len as u8,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len as usize]
    }

    pub fn as_str(&self) -> &str {
        // Only the decoder and `from_char` construct values, and both
        // reject malformed sequences.
        core::str::from_utf8(self.as_bytes()).unwrap_or_default()
    }

    pub fn to_char(&self) -> char {
        self.as_str().chars().next().unwrap_or(char::REPLACEMENT_CHARACTER)
    }
}

#[derive(Debug, Eq, PartialEq)]
pub enum Utf8DecoderStatus {
    Continuation,
    Done(Utf8Char),
    Error,
}

/// Decoder for a single character. Feed bytes with
/// [`Utf8Decoder::advance`] until it reports `Done` or `Error`.
#[derive(Debug, Eq, PartialEq)]
pub struct Utf8Decoder {
    buf: [u8; 4],
    pos: usize,
    expected: usize,
}

impl Utf8Decoder {
    pub fn new() -> Self {
        Self {
            buf: [0; 4],
            pos: 0,
            expected: 0,
        }
    }

    fn finish(&self) -> Utf8DecoderStatus {
        let bytes = &self.buf[..self.pos];

        // Overlong encodings and surrogates pass the bit pattern checks
        // but are still invalid.
        match core::str::from_utf8(bytes) {
            Ok(_) => Utf8DecoderStatus::Done(Utf8Char {
                buf: self.buf,
                len: self.pos as u8,
            }),
            Err(_) => Utf8DecoderStatus::Error,
        }
    }

    pub fn advance(&mut self, byte: u8) -> Utf8DecoderStatus {
        if self.pos == 0 {
            self.expected = match sequence_len(byte) {
                Some(len) => len,
                None => return Utf8DecoderStatus::Error,
            };
        } else if self.pos >= self.expected
            || utf8_byte_type(byte) != Utf8ByteType::Continuation
        {
            return Utf8DecoderStatus::Error;
        }

        self.buf[self.pos] = byte;
        self.pos += 1;

        if self.pos == self.expected {
            self.finish()
        } else {
            Utf8DecoderStatus::Continuation
        }
    }
}

/// Iterator decoding a byte slice into characters. Yields `None` for
/// every malformed sequence.
pub struct Utf8Chars<'a> {
    bytes: &'a [u8],
}

impl<'a> Utf8Chars<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }
}

impl Iterator for Utf8Chars<'_> {
    type Item = Option<char>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut decoder = Utf8Decoder::new();

        for (i, &byte) in self.bytes.iter().enumerate() {
            match decoder.advance(byte) {
                Utf8DecoderStatus::Continuation => continue,
                Utf8DecoderStatus::Done(c) => {
                    self.bytes = &self.bytes[i + 1..];
                    return Some(Some(c.to_char()));
                }
                Utf8DecoderStatus::Error => {
                    self.bytes = &self.bytes[i.max(1)..];
                    return Some(None);
                }
            }
        }

        if self.bytes.is_empty() {
            None
        } else {
            // Truncated sequence at the end of input
            self.bytes = &[];
            Some(None)
        }
    }
}
