//! Rawline is a small line editor for ANSI terminals. It switches the
//! terminal to raw mode, reads keystrokes one byte at a time and repaints
//! the line after every edit, giving the user a cursor they can move and
//! a line they can edit before pressing Enter.
//!
//! Features:
//! - Emacs style keybindings (Ctrl-A/E/B/F/H/W/T/D/C)
//! - Arrow, Home, End, Delete and Ctrl-arrow word movement
//! - UTF-8 editing with wide character aware cursor placement
//! - Terminal mode restored on every exit path
//!
//! The core is a state machine taking bytes as input and yielding
//! iterators over byte slices. It does no IO, so editing behavior is
//! tested without a terminal. [`sync_editor::Editor`] drives it over
//! [`embedded_io`] streams, by default stdin and stdout.
//!
//! # Example
//! ```no_run
//! use rawline::builder::EditorBuilder;
//! use rawline::sync_editor::EditResult;
//! use std::fmt::Write;
//!
//! let mut editor = EditorBuilder::new().build();
//!
//! while let Ok(EditResult::Line(line)) = editor.readline("> ") {
//!     write!(editor.io(), "Read: '{}'\r\n", line).unwrap();
//! }
//! ```

pub mod builder;
mod core;
pub mod cursor;
pub mod error;
mod input;
pub mod line_buffer;
mod output;
pub mod sync_editor;
pub mod sync_io;
pub mod terminal;
mod utf8;
pub mod width;

#[cfg(test)]
pub(crate) mod testlib;

pub use builder::EditorBuilder;
pub use error::RawlineError;
pub use sync_editor::{EditResult, Editor};
