//! Builder for editors

use crate::sync_editor::Editor;
use crate::sync_io::{StdinWrapper, StdoutWrapper, IO};
use crate::terminal::{TerminalControl, Tty};

/// Builder for [`Editor`].
///
/// By default the editor reads from stdin, writes to stdout and switches
/// the terminal behind stdin to raw mode. Each part can be replaced.
///
/// # Example
/// ```no_run
/// use rawline::builder::EditorBuilder;
///
/// let mut editor = EditorBuilder::new().build();
/// ```
pub struct EditorBuilder<R, W, T> {
    input: R,
    output: W,
    terminal: T,
}

impl EditorBuilder<StdinWrapper, StdoutWrapper, Tty> {
    pub fn new() -> Self {
        Self {
            input: StdinWrapper::new(),
            output: StdoutWrapper::new(),
            terminal: Tty::stdio(),
        }
    }
}

impl Default for EditorBuilder<StdinWrapper, StdoutWrapper, Tty> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R, W, T> EditorBuilder<R, W, T> {
    /// Read keystrokes from `input` instead of stdin.
    pub fn with_input<R2: embedded_io::Read>(self, input: R2) -> EditorBuilder<R2, W, T> {
        EditorBuilder {
            input,
            output: self.output,
            terminal: self.terminal,
        }
    }

    /// Write to `output` instead of stdout.
    pub fn with_output<W2: embedded_io::Write>(self, output: W2) -> EditorBuilder<R, W2, T> {
        EditorBuilder {
            input: self.input,
            output,
            terminal: self.terminal,
        }
    }

    /// Control the terminal mode through `terminal`. Should be set along
    /// with the input when the input is not stdin.
    pub fn with_terminal<T2: TerminalControl>(self, terminal: T2) -> EditorBuilder<R, W, T2> {
        EditorBuilder {
            input: self.input,
            output: self.output,
            terminal,
        }
    }
}

impl<R, W, T> EditorBuilder<R, W, T>
where
    R: embedded_io::Read,
    W: embedded_io::Write,
    T: TerminalControl,
{
    pub fn build(self) -> Editor<R, W, T> {
        Editor::new(IO::new(self.input, self.output), self.terminal)
    }
}
