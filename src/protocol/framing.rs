//! Line accumulator for the newline-delimited text protocol
//!
//! Accumulates bytes until a complete line (terminated by `\n`) is received.

/// Line terminator sent by `Serial.println()` and the BLE sketch
pub const LINE_TERMINATOR: u8 = b'\n';

/// Partial-line size past which a warning is logged.
///
/// Lines are never truncated: a device that stops sending terminators
/// makes the buffer grow until one arrives.
pub const LONG_LINE_WARN: usize = 64 * 1024;

/// Accumulates incoming bytes and extracts complete lines.
///
/// The terminator itself is not part of the returned line. A `\r` sent
/// before it is kept and left for [`decode_message`](super::decode_message)
/// to trim.
#[derive(Debug, Default)]
pub struct LineAccumulator {
    buffer: Vec<u8>,
    /// Set once the current line crossed [`LONG_LINE_WARN`]
    warned: bool,
}

impl LineAccumulator {
    /// Create a new empty line accumulator.
    pub fn new() -> Self {
        Self {
            buffer: Vec::new(),
            warned: false,
        }
    }

    /// Push a byte into the accumulator.
    ///
    /// Returns `Some(line)` when the terminator is received, including for
    /// empty lines; suppressing those is left to the caller.
    pub fn push(&mut self, byte: u8) -> Option<Vec<u8>> {
        if byte == LINE_TERMINATOR {
            self.warned = false;
            return Some(std::mem::take(&mut self.buffer));
        }

        self.buffer.push(byte);
        if !self.warned && self.buffer.len() > LONG_LINE_WARN {
            log::warn!(
                "no line terminator after {} bytes, still buffering",
                self.buffer.len()
            );
            self.warned = true;
        }
        None
    }

    /// Push a chunk of bytes, returning every line it completes in order.
    pub fn extend(&mut self, bytes: &[u8]) -> Vec<Vec<u8>> {
        bytes.iter().filter_map(|&byte| self.push(byte)).collect()
    }

    /// Reset the accumulator, discarding any partial line.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.warned = false;
    }

    /// Returns true if no partial line is in progress.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Returns the number of bytes in the partial line.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }
}
