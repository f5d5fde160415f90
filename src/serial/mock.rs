//! Mock serial port for testing

use std::collections::VecDeque;
use std::io::{self, ErrorKind, Read};

use crate::shutdown::Shutdown;

/// Mock serial port for unit testing.
///
/// Behaves like a port opened with a read timeout: once the queued data
/// is drained, reads fail with `TimedOut`.
pub struct MockSerialPort {
    /// Data queued to be returned by read()
    rx_buffer: VecDeque<u8>,
    /// Maximum bytes returned by one read()
    chunk_size: usize,
    /// Error to return on next read
    next_read_error: Option<ErrorKind>,
    /// Error to return instead of timing out once drained
    drained_error: Option<ErrorKind>,
    /// Signal raised once the queued data is drained
    stop_on_drain: Option<Shutdown>,
}

impl MockSerialPort {
    /// Create a new mock serial port
    pub fn new() -> Self {
        Self {
            rx_buffer: VecDeque::new(),
            chunk_size: usize::MAX,
            next_read_error: None,
            drained_error: None,
            stop_on_drain: None,
        }
    }

    /// Limit how many bytes a single read() returns
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Raise `shutdown` when a read finds no data left
    pub fn stop_when_drained(mut self, shutdown: Shutdown) -> Self {
        self.stop_on_drain = Some(shutdown);
        self
    }

    /// Queue data to be returned by read()
    pub fn queue_rx_data(&mut self, data: &[u8]) {
        self.rx_buffer.extend(data);
    }

    /// Set an error to be returned by the next read() call
    pub fn set_next_read_error(&mut self, kind: ErrorKind) {
        self.next_read_error = Some(kind);
    }

    /// Fail with `kind` instead of timing out once the data is drained
    pub fn set_error_when_drained(&mut self, kind: ErrorKind) {
        self.drained_error = Some(kind);
    }
}

impl Default for MockSerialPort {
    fn default() -> Self {
        Self::new()
    }
}

impl Read for MockSerialPort {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if let Some(kind) = self.next_read_error.take() {
            return Err(io::Error::new(kind, "mock read error"));
        }

        if self.rx_buffer.is_empty() {
            if let Some(kind) = self.drained_error {
                return Err(io::Error::new(kind, "mock port closed"));
            }
            if let Some(shutdown) = &self.stop_on_drain {
                shutdown.trigger();
            }
            return Err(io::Error::new(ErrorKind::TimedOut, "mock read timed out"));
        }

        let count = buf.len().min(self.chunk_size).min(self.rx_buffer.len());
        for (slot, byte) in buf.iter_mut().zip(self.rx_buffer.drain(..count)) {
            *slot = byte;
        }

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_partial_read() {
        let mut port = MockSerialPort::new();
        port.queue_rx_data(&[0x01, 0x02, 0x03, 0x04, 0x05]);

        let mut buf = [0u8; 2];
        assert_eq!(port.read(&mut buf).unwrap(), 2);
        assert_eq!(&buf, &[0x01, 0x02]);

        let mut buf = [0u8; 10];
        assert_eq!(port.read(&mut buf).unwrap(), 3);
        assert_eq!(&buf[..3], &[0x03, 0x04, 0x05]);
    }

    #[test]
    fn test_mock_times_out_when_empty() {
        let mut port = MockSerialPort::new();
        let mut buf = [0u8; 4];
        let err = port.read(&mut buf).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TimedOut);
    }

    #[test]
    fn test_mock_read_error_cleared() {
        let mut port = MockSerialPort::new();
        port.set_next_read_error(ErrorKind::Other);
        port.queue_rx_data(&[0x01]);

        let mut buf = [0u8; 4];
        assert!(port.read(&mut buf).is_err());
        assert_eq!(port.read(&mut buf).unwrap(), 1);
    }

    #[test]
    fn test_mock_triggers_shutdown_when_drained() {
        let shutdown = Shutdown::new();
        let mut port = MockSerialPort::new().stop_when_drained(shutdown.clone());
        port.queue_rx_data(b"x");

        let mut buf = [0u8; 4];
        port.read(&mut buf).unwrap();
        assert!(!shutdown.is_triggered());

        let _ = port.read(&mut buf);
        assert!(shutdown.is_triggered());
    }
}
