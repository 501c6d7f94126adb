//! Text being edited.
//!
//! All positions are byte offsets into the UTF-8 encoded line. Every
//! operation keeps positions on character boundaries, so a multi-byte
//! character is always inserted, deleted or moved as a whole.

use core::ops::Range;

use crate::error::RawlineError;

const SPACE: char = ' ';

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LineBuffer {
    buf: String,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self { buf: String::new() }
    }

    pub fn as_slice(&self) -> &[u8] {
        self.buf.as_bytes()
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn truncate(&mut self) {
        self.buf.clear();
    }

    /// Hand the line over, leaving the buffer empty.
    pub fn take(&mut self) -> String {
        core::mem::take(&mut self.buf)
    }

    /// Insert `s` at `pos`, returning the position after it.
    pub fn insert_str(&mut self, pos: usize, s: &str) -> Result<usize, RawlineError> {
        self.buf.try_reserve(s.len())?;
        self.buf.insert_str(pos, s);

        Ok(pos + s.len())
    }

    /// Start of the character before `pos`.
    pub fn previous_char(&self, pos: usize) -> Option<usize> {
        self.buf[..pos].char_indices().next_back().map(|(i, _)| i)
    }

    /// End of the character starting at `pos`.
    pub fn next_char(&self, pos: usize) -> Option<usize> {
        self.buf[pos..].chars().next().map(|c| pos + c.len_utf8())
    }

    /// Delete the character starting at `pos`. Returns `false` if there
    /// is nothing to delete.
    pub fn delete(&mut self, pos: usize) -> bool {
        if pos < self.buf.len() {
            self.buf.remove(pos);
            true
        } else {
            false
        }
    }

    fn delete_range(&mut self, range: Range<usize>) {
        self.buf.replace_range(range, "");
    }

    /// Start of the word before `pos`: trailing spaces are skipped, then
    /// the run of non-space characters before them.
    pub fn previous_word(&self, pos: usize) -> usize {
        let before = &self.buf[..pos];
        let words = before.trim_end_matches(SPACE);

        words.trim_end_matches(|c: char| c != SPACE).len()
    }

    /// End of the word at `pos`: the run of non-space characters is
    /// skipped, then any spaces after it.
    pub fn next_word(&self, pos: usize) -> usize {
        let after = &self.buf[pos..];
        let rest = after.trim_start_matches(|c: char| c != SPACE);
        let rest = rest.trim_start_matches(SPACE);

        self.buf.len() - rest.len()
    }

    /// Delete the word before `pos`, returning the new cursor position.
    pub fn delete_previous_word(&mut self, pos: usize) -> usize {
        let start = self.previous_word(pos);

        self.delete_range(start..pos);

        start
    }

    /// Swap the character before `pos` with the one at `pos`, returning
    /// the position after both. Returns `None` if either is missing.
    pub fn swap_chars(&mut self, pos: usize) -> Option<usize> {
        let start = self.previous_char(pos)?;
        let end = self.next_char(pos)?;

        let swapped: String = self.buf[pos..end]
            .chars()
            .chain(self.buf[start..pos].chars())
            .collect();

        self.buf.replace_range(start..end, &swapped);

        Some(end)
    }
}
