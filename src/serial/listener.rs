//! Serial line listener
//!
//! Reads bytes from a serial port, splits them into lines and prints
//! each non-empty message.

use std::collections::VecDeque;
use std::io::{ErrorKind, Read, Write};

use crate::error::ListenerError;
use crate::protocol::{decode_message, format_message, LineAccumulator, SERIAL_LABEL};
use crate::shutdown::Shutdown;

/// Reads newline-terminated messages from any byte source.
///
/// Generic over `std::io::Read` so the listener runs on a real
/// `serialport::SerialPort` or on a mock in tests.
pub struct SerialListener<R> {
    port: R,
    accumulator: LineAccumulator,
    /// Lines completed by a read that have not been returned yet
    pending: VecDeque<Vec<u8>>,
}

impl<R: Read> SerialListener<R> {
    pub fn new(port: R) -> Self {
        Self {
            port,
            accumulator: LineAccumulator::new(),
            pending: VecDeque::new(),
        }
    }

    /// Access the underlying port.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.port
    }

    /// Read one complete line, without its terminator.
    ///
    /// Returns `Ok(None)` when a read times out before a line is complete.
    /// The partial line stays buffered for the next call.
    pub fn read_line(&mut self) -> Result<Option<Vec<u8>>, ListenerError> {
        if let Some(line) = self.pending.pop_front() {
            return Ok(Some(line));
        }

        let mut read_buf = [0u8; 64];

        loop {
            match self.port.read(&mut read_buf) {
                Ok(0) => return Ok(None),
                Ok(n) => {
                    self.pending.extend(self.accumulator.extend(&read_buf[..n]));
                    if let Some(line) = self.pending.pop_front() {
                        return Ok(Some(line));
                    }
                }
                Err(e) if e.kind() == ErrorKind::TimedOut => return Ok(None),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Print every received message to `out` until `shutdown` is raised.
    ///
    /// Blank lines are skipped. Invalid UTF-8 and I/O errors end the loop.
    pub fn run<W: Write>(&mut self, out: &mut W, shutdown: &Shutdown) -> Result<(), ListenerError> {
        while !shutdown.is_triggered() {
            let Some(line) = self.read_line()? else {
                continue;
            };

            if let Some(message) = decode_message(&line)? {
                writeln!(out, "{}", format_message(SERIAL_LABEL, message))?;
                out.flush()?;
            }
        }

        log::debug!("serial listener stopped");
        Ok(())
    }
}
