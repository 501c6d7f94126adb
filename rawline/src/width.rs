//! Display width of text in terminal columns.
//!
//! Widths come from the Unicode tables in [`unicode_width`] and do not
//! depend on the process locale.

use unicode_width::UnicodeWidthChar;

use crate::error::RawlineError;
use crate::utf8::Utf8Chars;

/// Columns occupied by `bytes` when printed.
///
/// Fails with [`RawlineError::InvalidCharacter`] if the bytes are not
/// valid UTF-8 or contain a character without a printable width, such
/// as a control character.
pub fn display_width(bytes: &[u8]) -> Result<usize, RawlineError> {
    Utf8Chars::new(bytes).try_fold(0, |width, c| {
        let c = c.ok_or(RawlineError::InvalidCharacter)?;
        let w = UnicodeWidthChar::width(c).ok_or(RawlineError::InvalidCharacter)?;

        Ok(width + w)
    })
}

/// Like [`display_width`], but counts unprintable characters as zero
/// columns instead of failing.
pub fn display_width_lossy(s: &str) -> usize {
    s.chars()
        .map(|c| UnicodeWidthChar::width(c).unwrap_or(0))
        .sum()
}
