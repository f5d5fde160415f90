//! Serial listener for the wired GIGA connection

pub mod listener;
pub mod port;

#[cfg(test)]
pub mod mock;

pub use listener::SerialListener;
pub use port::{open_port, pick_port, resolve_port};
