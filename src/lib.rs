//! Workstation listeners for text lines sent by an Arduino GIGA.
//!
//! Two independent entry points share this library: `serial-listener`
//! reads newline-terminated lines from the USB serial port and
//! `ble-listener` prints notifications from a UART-style BLE characteristic.

pub mod ble;
pub mod config;
pub mod error;
pub mod protocol;
pub mod serial;
pub mod shutdown;

pub use error::ListenerError;
pub use shutdown::Shutdown;
