//! Line-delimited text protocol spoken by the GIGA sketches

pub mod framing;
pub mod message;

pub use framing::LineAccumulator;
pub use message::{decode_message, format_message, peer_label, SERIAL_LABEL};
