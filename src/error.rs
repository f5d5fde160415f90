//! Errors raised by the listeners

use std::str::Utf8Error;

use thiserror::Error;
use uuid::Uuid;

/// Errors that end a listener.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// The serial port could not be opened (absent, busy, permissions)
    #[error("could not open {port}: {source}")]
    Open {
        port: String,
        source: serialport::Error,
    },

    /// Listing serial ports for auto-detection failed
    #[error("could not list serial ports: {0}")]
    Enumerate(#[source] serialport::Error),

    /// Auto-detection found no candidate port
    #[error("no serial port found - ensure the board is connected")]
    PortNotFound,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Received bytes were not valid UTF-8
    #[error("invalid UTF-8 in received data: {0}")]
    Decode(#[from] Utf8Error),

    #[error("BLE error: {0}")]
    Ble(#[from] btleplug::Error),

    #[error("no Bluetooth adapters found")]
    NoAdapter,

    /// The peer does not expose the expected characteristic
    #[error("characteristic {0} not found")]
    CharacteristicNotFound(Uuid),
}
