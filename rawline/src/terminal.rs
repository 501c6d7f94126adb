//! Terminal mode control.
//!
//! [`TerminalControl`] is the seam to the operating system: TTY
//! detection, termios get/set and the window size query. [`Tty`]
//! implements it with `libc` for a pair of file descriptors.
//!
//! [`RawMode`] switches a terminal between canonical and raw mode. It
//! remembers the configuration found when raw mode was entered and puts
//! it back on [`RawMode::disable_raw_mode`], on drop of a
//! [`RawModeGuard`] and on drop of the controller itself, so the user's
//! terminal is restored however the editing session ends.

#![allow(unsafe_code)]

use std::io;
use std::os::unix::io::{AsRawFd, RawFd};

use tracing::{debug, warn};

use crate::error::RawlineError;

pub trait TerminalControl {
    /// Whether the input device is an interactive terminal.
    fn is_tty(&self) -> bool;

    fn get_attributes(&self) -> io::Result<libc::termios>;

    fn set_attributes(&mut self, termios: &libc::termios) -> io::Result<()>;

    /// Width of the terminal window, `0` if unknown.
    fn window_columns(&self) -> io::Result<u16>;
}

/// Terminal reached through file descriptors.
#[derive(Debug, Copy, Clone)]
pub struct Tty {
    input: RawFd,
    output: RawFd,
}

impl Tty {
    pub fn new<I: AsRawFd, O: AsRawFd>(input: &I, output: &O) -> Self {
        Self {
            input: input.as_raw_fd(),
            output: output.as_raw_fd(),
        }
    }

    /// Terminal connected to the process' stdin and stdout.
    pub fn stdio() -> Self {
        Self {
            input: libc::STDIN_FILENO,
            output: libc::STDOUT_FILENO,
        }
    }
}

impl Default for Tty {
    fn default() -> Self {
        Self::stdio()
    }
}

impl TerminalControl for Tty {
    fn is_tty(&self) -> bool {
        // SAFETY: isatty is safe to call with any fd
        unsafe { libc::isatty(self.input) == 1 }
    }

    fn get_attributes(&self) -> io::Result<libc::termios> {
        // SAFETY: an all-zero termios is a valid value to be overwritten
        let mut termios: libc::termios = unsafe { std::mem::zeroed() };

        // SAFETY: tcgetattr is safe when passed a valid termios struct
        if unsafe { libc::tcgetattr(self.input, &mut termios) } == -1 {
            Err(io::Error::last_os_error())
        } else {
            Ok(termios)
        }
    }

    fn set_attributes(&mut self, termios: &libc::termios) -> io::Result<()> {
        // SAFETY: tcsetattr is safe when passed a valid termios struct
        if unsafe { libc::tcsetattr(self.input, libc::TCSAFLUSH, termios) } == -1 {
            Err(io::Error::last_os_error())
        } else {
            Ok(())
        }
    }

    fn window_columns(&self) -> io::Result<u16> {
        // SAFETY: an all-zero winsize is a valid value to be overwritten
        let mut size: libc::winsize = unsafe { std::mem::zeroed() };

        // SAFETY: ioctl with TIOCGWINSZ is safe when passed a valid winsize struct
        if unsafe { libc::ioctl(self.output, libc::TIOCGWINSZ, &mut size) } == -1 {
            Err(io::Error::last_os_error())
        } else {
            Ok(size.ws_col)
        }
    }
}

/// Raw version of `original`: no echo, no line buffering, no signal
/// characters, no input or output processing, blocking single byte
/// reads.
pub fn make_raw(original: &libc::termios) -> libc::termios {
    let mut raw = *original;

    raw.c_iflag &= !(libc::BRKINT | libc::ICRNL | libc::INPCK | libc::ISTRIP | libc::IXON);
    raw.c_oflag &= !libc::OPOST;
    raw.c_cflag |= libc::CS8;
    raw.c_lflag &= !(libc::ECHO | libc::ICANON | libc::IEXTEN | libc::ISIG);
    raw.c_cc[libc::VMIN] = 1;
    raw.c_cc[libc::VTIME] = 0;

    raw
}

/// Raw mode controller for one terminal.
pub struct RawMode<T: TerminalControl> {
    terminal: T,
    original: Option<libc::termios>,
}

impl<T: TerminalControl> RawMode<T> {
    pub fn new(terminal: T) -> Self {
        Self {
            terminal,
            original: None,
        }
    }

    pub fn terminal(&self) -> &T {
        &self.terminal
    }

    pub fn is_active(&self) -> bool {
        self.original.is_some()
    }

    /// Enter raw mode. Does nothing if raw mode is already active.
    pub fn enable_raw_mode(&mut self) -> Result<(), RawlineError> {
        if self.is_active() {
            return Ok(());
        }

        if !self.terminal.is_tty() {
            return Err(RawlineError::NotATty);
        }

        let original = self
            .terminal
            .get_attributes()
            .map_err(|_| RawlineError::NotATty)?;

        self.terminal
            .set_attributes(&make_raw(&original))
            .map_err(|_| RawlineError::NotATty)?;

        self.original = Some(original);
        debug!("raw mode enabled");

        Ok(())
    }

    /// Leave raw mode. Does nothing if raw mode is not active. Failure to
    /// restore the terminal is logged and otherwise ignored.
    pub fn disable_raw_mode(&mut self) {
        if let Some(original) = self.original.take() {
            match self.terminal.set_attributes(&original) {
                Ok(()) => debug!("raw mode disabled"),
                Err(err) => warn!(%err, "failed to restore terminal mode"),
            }
        }
    }

    /// Enter raw mode for the lifetime of the returned guard.
    pub fn session(&mut self) -> Result<RawModeGuard<'_, T>, RawlineError> {
        self.enable_raw_mode()?;

        Ok(RawModeGuard { mode: self })
    }
}

impl<T: TerminalControl> Drop for RawMode<T> {
    fn drop(&mut self) {
        self.disable_raw_mode();
    }
}

/// Restores the terminal when dropped.
pub struct RawModeGuard<'a, T: TerminalControl> {
    mode: &'a mut RawMode<T>,
}

impl<T: TerminalControl> RawModeGuard<'_, T> {
    pub fn terminal(&self) -> &T {
        self.mode.terminal()
    }
}

impl<T: TerminalControl> Drop for RawModeGuard<'_, T> {
    fn drop(&mut self) {
        self.mode.disable_raw_mode();
    }
}
