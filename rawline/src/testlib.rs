use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use std::thread;
use std::thread::JoinHandle;

use crossbeam::channel::{unbounded, Receiver, Sender};
use unicode_width::UnicodeWidthChar;

use crate::cursor::Cursor;
use crate::input::ControlCharacter;
use crate::terminal::TerminalControl;
use crate::utf8::{Utf8Decoder, Utf8DecoderStatus};

pub mod csi {
    pub const LEFT: &str = "\x1b[D";
    pub const RIGHT: &str = "\x1b[C";
    pub const HOME: &str = "\x1b[H";
    pub const END: &str = "\x1b[F";
    pub const DELETE: &str = "\x1b[3~";
    pub const WORD_LEFT: &str = "\x1b[1;5D";
    pub const WORD_RIGHT: &str = "\x1b[1;5C";
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Cell {
    Empty,
    Text(String),
    WideTail,
}

enum MockState {
    Ground,
    Utf8(Utf8Decoder),
    Escape,
    Csi(Vec<u8>),
}

/// Single line ANSI terminal. Lines grow without wrapping and the
/// cursor stops at the right margin.
pub struct MockTerminal {
    state: MockState,
    screen: Vec<Vec<Cell>>,
    pub cursor: Cursor,
    columns: usize,
    pub bell: bool,
    pub terminal_tx: Sender<Option<u8>>,
    pub terminal_rx: Receiver<Option<u8>>,
    pub keyboard_tx: Sender<u8>,
    pub keyboard_rx: Receiver<u8>,
}

impl MockTerminal {
    pub fn new(columns: usize) -> Self {
        let (terminal_tx, terminal_rx) = unbounded();
        let (keyboard_tx, keyboard_rx) = unbounded();

        Self {
            state: MockState::Ground,
            screen: vec![Vec::new()],
            cursor: Cursor::new(0, 0),
            columns,
            bell: false,
            terminal_tx,
            terminal_rx,
            keyboard_tx,
            keyboard_rx,
        }
    }

    pub fn get_cursor(&self) -> Cursor {
        self.cursor
    }

    fn line_as_string(line: &[Cell]) -> String {
        let s: String = line
            .iter()
            .map(|cell| match cell {
                Cell::Empty => " ",
                Cell::Text(s) => s.as_str(),
                Cell::WideTail => "",
            })
            .collect();

        s.trim_end_matches(' ').to_string()
    }

    pub fn current_line_as_string(&self) -> String {
        Self::line_as_string(&self.screen[self.cursor.row])
    }

    pub fn screen_as_string(&self) -> String {
        let mut lines: Vec<String> = self
            .screen
            .iter()
            .map(|line| Self::line_as_string(line))
            .collect();

        while lines.last().is_some_and(|line| line.is_empty()) {
            lines.pop();
        }

        lines.join("\n")
    }

    fn print(&mut self, c: char) {
        let width = c.width().unwrap_or(0);
        let column = self.cursor.column;
        let line = &mut self.screen[self.cursor.row];

        if width == 0 {
            if let Some(Cell::Text(s)) = column.checked_sub(1).and_then(|i| line.get_mut(i)) {
                s.push(c);
            }

            return;
        }

        if line.len() < column + width {
            line.resize(column + width, Cell::Empty);
        }

        line[column] = Cell::Text(c.to_string());

        if width == 2 {
            line[column + 1] = Cell::WideTail;
        }

        self.cursor.column = (column + width).min(self.columns - 1);
    }

    fn line_feed(&mut self) {
        self.cursor.row += 1;

        if self.screen.len() <= self.cursor.row {
            self.screen.push(Vec::new());
        }
    }

    fn csi(&mut self, params: &[u8], final_byte: u8) -> Option<Vec<u8>> {
        let params = std::str::from_utf8(params).unwrap();
        let count = |default: usize| params.parse::<usize>().unwrap_or(default);

        match final_byte {
            b'C' => {
                self.cursor.column = (self.cursor.column + count(1))
                    .min(self.columns - 1)
                    .max(self.cursor.column);
            }
            b'D' => self.cursor.column = self.cursor.column.saturating_sub(count(1)),
            b'K' => {
                assert!(params.is_empty() || params == "0", "unsupported erase {params:?}");

                let column = self.cursor.column;
                self.screen[self.cursor.row].truncate(column);
            }
            b'n' if params == "6" => {
                return Some(
                    format!("\x1b[{};{}R", self.cursor.row + 1, self.cursor.column + 1)
                        .into_bytes(),
                );
            }
            _ => unimplemented!("CSI {params} {}", final_byte as char),
        }

        None
    }

    fn utf8(&mut self, mut decoder: Utf8Decoder, byte: u8) {
        match decoder.advance(byte) {
            Utf8DecoderStatus::Continuation => self.state = MockState::Utf8(decoder),
            Utf8DecoderStatus::Done(c) => self.print(c.to_char()),
            Utf8DecoderStatus::Error => panic!("invalid utf-8 written to terminal"),
        }
    }

    /// Feed one byte written by the editor. Returns the terminal's reply,
    /// if any.
    pub fn advance(&mut self, byte: u8) -> Option<Vec<u8>> {
        match std::mem::replace(&mut self.state, MockState::Ground) {
            MockState::Ground => match byte {
                0x1b => self.state = MockState::Escape,
                b'\r' => self.cursor.column = 0,
                b'\n' => self.line_feed(),
                0x07 => self.bell = true,
                0x00..=0x1f | 0x7f => (),
                _ => self.utf8(Utf8Decoder::new(), byte),
            },
            MockState::Utf8(decoder) => self.utf8(decoder, byte),
            MockState::Escape => {
                assert_eq!(byte, b'[', "unsupported escape sequence");
                self.state = MockState::Csi(Vec::new());
            }
            MockState::Csi(mut params) => match byte {
                0x30..=0x3f => {
                    params.push(byte);
                    self.state = MockState::Csi(params);
                }
                _ => return self.csi(&params, byte),
            },
        }

        None
    }

    pub fn write(&mut self, bytes: &[u8]) -> Vec<u8> {
        bytes
            .iter()
            .filter_map(|&b| self.advance(b))
            .flatten()
            .collect()
    }

    pub fn listen(&mut self) {
        while let Ok(Some(byte)) = self.terminal_rx.recv() {
            if let Some(reply) = self.advance(byte) {
                for b in reply {
                    self.keyboard_tx.send(b).unwrap();
                }
            }
        }
    }

    pub fn start_thread(mut self) -> JoinHandle<Self> {
        thread::spawn(move || {
            self.listen();
            self
        })
    }
}

struct DeviceState {
    terminal: MockTerminal,
    keyboard: VecDeque<u8>,
    pending: Vec<u8>,
    written: Vec<u8>,
    muted: bool,
    read_error: Option<embedded_io::ErrorKind>,
    write_error: Option<embedded_io::ErrorKind>,
    flushes: usize,
}

/// Keyboard and screen sharing one [`MockTerminal`]. Clones share state,
/// so one handle can be passed as input and another as output.
#[derive(Clone)]
pub struct MockDevice {
    state: Rc<RefCell<DeviceState>>,
}

impl MockDevice {
    pub fn new(columns: usize) -> Self {
        Self {
            state: Rc::new(RefCell::new(DeviceState {
                terminal: MockTerminal::new(columns),
                keyboard: VecDeque::new(),
                pending: Vec::new(),
                written: Vec::new(),
                muted: false,
                read_error: None,
                write_error: None,
                flushes: 0,
            })),
        }
    }

    pub fn type_input(&self, input: impl AsByteVec) {
        self.state.borrow_mut().keyboard.extend(input.as_byte_vec());
    }

    /// Put text on the screen as if printed before the editor started.
    pub fn write_screen(&self, s: &str) {
        self.state.borrow_mut().terminal.write(s.as_bytes());
    }

    /// Stop answering cursor position requests.
    pub fn mute(&self) {
        self.state.borrow_mut().muted = true;
    }

    pub fn fail_reads(&self, kind: embedded_io::ErrorKind) {
        self.state.borrow_mut().read_error = Some(kind);
    }

    pub fn fail_writes(&self, kind: embedded_io::ErrorKind) {
        self.state.borrow_mut().write_error = Some(kind);
    }

    pub fn written(&self) -> Vec<u8> {
        self.state.borrow().written.clone()
    }

    pub fn cursor(&self) -> Cursor {
        self.state.borrow().terminal.get_cursor()
    }

    pub fn current_line(&self) -> String {
        self.state.borrow().terminal.current_line_as_string()
    }

    pub fn screen(&self) -> String {
        self.state.borrow().terminal.screen_as_string()
    }

    pub fn flushes(&self) -> usize {
        self.state.borrow().flushes
    }

    pub fn unread(&self) -> usize {
        self.state.borrow().keyboard.len()
    }
}

impl embedded_io::ErrorType for MockDevice {
    type Error = embedded_io::ErrorKind;
}

impl embedded_io::Read for MockDevice {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let mut state = self.state.borrow_mut();

        if let Some(kind) = state.read_error {
            return Err(kind);
        }

        match (buf.first_mut(), state.keyboard.pop_front()) {
            (Some(slot), Some(byte)) => {
                *slot = byte;
                Ok(1)
            }
            (None, Some(byte)) => {
                state.keyboard.push_front(byte);
                Ok(0)
            }
            (_, None) => Ok(0),
        }
    }
}

impl embedded_io::Write for MockDevice {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        let mut state = self.state.borrow_mut();

        if let Some(kind) = state.write_error {
            return Err(kind);
        }

        state.pending.extend_from_slice(buf);
        state.written.extend_from_slice(buf);

        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();
        let pending = std::mem::take(&mut state.pending);
        let reply = state.terminal.write(&pending);

        if !state.muted {
            state.keyboard.extend(reply);
        }

        state.flushes += 1;

        Ok(())
    }
}

/// Typical canonical mode settings.
pub fn cooked_termios() -> libc::termios {
    // SAFETY: termios is plain data
    let mut termios: libc::termios = unsafe { std::mem::zeroed() };

    termios.c_iflag = libc::BRKINT | libc::ICRNL | libc::IXON;
    termios.c_oflag = libc::OPOST;
    termios.c_cflag = libc::CS8 | libc::CREAD;
    termios.c_lflag = libc::ECHO | libc::ICANON | libc::ISIG | libc::IEXTEN;
    termios.c_cc[libc::VMIN] = 1;
    termios.c_cc[libc::VTIME] = 3;

    termios
}

struct TtyState {
    tty: bool,
    termios: libc::termios,
    columns: u16,
    fail_set: bool,
    fail_window_size: bool,
    syscalls: usize,
}

/// In-memory terminal driver. Clones share state.
#[derive(Clone)]
pub struct MockTty {
    state: Arc<Mutex<TtyState>>,
}

impl MockTty {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(TtyState {
                tty: true,
                termios: cooked_termios(),
                columns: 80,
                fail_set: false,
                fail_window_size: false,
                syscalls: 0,
            })),
        }
    }

    pub fn not_a_tty() -> Self {
        let tty = Self::new();
        tty.state.lock().unwrap().tty = false;
        tty
    }

    pub fn set_columns(&self, columns: u16) {
        self.state.lock().unwrap().columns = columns;
    }

    pub fn fail_set_attributes(&self, fail: bool) {
        self.state.lock().unwrap().fail_set = fail;
    }

    pub fn fail_window_size(&self, fail: bool) {
        self.state.lock().unwrap().fail_window_size = fail;
    }

    pub fn syscalls(&self) -> usize {
        self.state.lock().unwrap().syscalls
    }

    pub fn termios(&self) -> libc::termios {
        self.state.lock().unwrap().termios
    }

    pub fn is_raw(&self) -> bool {
        self.termios().c_lflag & libc::ICANON == 0
    }
}

impl TerminalControl for MockTty {
    fn is_tty(&self) -> bool {
        let mut state = self.state.lock().unwrap();
        state.syscalls += 1;
        state.tty
    }

    fn get_attributes(&self) -> io::Result<libc::termios> {
        let mut state = self.state.lock().unwrap();
        state.syscalls += 1;

        if state.tty {
            Ok(state.termios)
        } else {
            Err(io::Error::from_raw_os_error(libc::ENOTTY))
        }
    }

    fn set_attributes(&mut self, termios: &libc::termios) -> io::Result<()> {
        let mut state = self.state.lock().unwrap();
        state.syscalls += 1;

        if state.fail_set || !state.tty {
            return Err(io::Error::from_raw_os_error(libc::EIO));
        }

        state.termios = *termios;
        Ok(())
    }

    fn window_columns(&self) -> io::Result<u16> {
        let mut state = self.state.lock().unwrap();
        state.syscalls += 1;

        if state.fail_window_size {
            Err(io::Error::from_raw_os_error(libc::ENOTTY))
        } else {
            Ok(state.columns)
        }
    }
}

pub trait AsByteVec {
    fn as_byte_vec(self) -> Vec<u8>;
}

impl AsByteVec for &str {
    fn as_byte_vec(self) -> Vec<u8> {
        self.bytes().collect()
    }
}

impl<const N: usize> AsByteVec for [&str; N] {
    fn as_byte_vec(self) -> Vec<u8> {
        self.into_iter().flat_map(|s| s.bytes()).collect()
    }
}

impl<const N: usize> AsByteVec for [u8; N] {
    fn as_byte_vec(self) -> Vec<u8> {
        self.to_vec()
    }
}

impl AsByteVec for Vec<u8> {
    fn as_byte_vec(self) -> Vec<u8> {
        self
    }
}

impl AsByteVec for ControlCharacter {
    fn as_byte_vec(self) -> Vec<u8> {
        vec![self.into()]
    }
}

impl<const N: usize> AsByteVec for [ControlCharacter; N] {
    fn as_byte_vec(self) -> Vec<u8> {
        self.into_iter().map(|c| c.into()).collect()
    }
}
