//! Bluetooth Low Energy listener
//!
//! Subscribes to the GIGA sketch's UART-style TX characteristic and prints
//! every notified line.

pub mod btle;
pub mod listener;
pub mod transport;

#[cfg(test)]
pub mod mock;

pub use btle::{BtleDevice, BtleScanner};
pub use listener::{BleListener, BleOutcome, ListenerState};
pub use transport::{BleDevice, BleScanner, NotificationStream};
