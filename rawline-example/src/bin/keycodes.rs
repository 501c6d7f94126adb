//! Print the bytes each key sends, one per line. Type `quit` to exit.

use std::collections::VecDeque;

use rawline::sync_io::{StdinWrapper, StdoutWrapper, SyncIO, IO};
use rawline::terminal::{RawMode, Tty};
use rawline::RawlineError;

const QUIT: &[u8] = b"quit";

fn printable(byte: u8) -> char {
    if byte.is_ascii_graphic() || byte == b' ' {
        byte as char
    } else {
        '?'
    }
}

fn run() -> Result<(), RawlineError> {
    let mut raw_mode = RawMode::new(Tty::stdio());
    let _session = raw_mode.session()?;

    let mut io = IO::<StdinWrapper, StdoutWrapper>::default();
    let mut recent = VecDeque::with_capacity(QUIT.len());

    io.write(b"Press keys to see their codes. Type \"quit\" to exit.\r\n")?;
    io.flush()?;

    loop {
        let mut byte = [0];

        if io.read(&mut byte)? == 0 {
            break;
        }

        let [byte] = byte;

        io.write(format!("'{}' 0x{:02x} ({})\r\n", printable(byte), byte, byte).as_bytes())?;
        io.flush()?;

        if recent.len() == QUIT.len() {
            recent.pop_front();
        }
        recent.push_back(byte);

        if recent.iter().eq(QUIT) {
            break;
        }
    }

    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("rawline-keycodes: {err}");
        std::process::exit(1);
    }
}
