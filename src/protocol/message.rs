//! Decoding of received lines and notification payloads into messages

use std::str::Utf8Error;

/// Label printed in front of lines received over serial
pub const SERIAL_LABEL: &str = "Received";

/// Decode a received payload into a printable message.
///
/// The bytes must be valid UTF-8. Surrounding whitespace (including a
/// trailing `\r\n`) is trimmed. Returns `Ok(None)` when nothing is left.
pub fn decode_message(bytes: &[u8]) -> Result<Option<&str>, Utf8Error> {
    let text = std::str::from_utf8(bytes)?.trim();
    if text.is_empty() {
        Ok(None)
    } else {
        Ok(Some(text))
    }
}

/// Format a message for the console, e.g. `Received: hello`.
pub fn format_message(label: &str, message: &str) -> String {
    format!("{}: {}", label, message)
}

/// Label for messages notified by a BLE peer, e.g. `Received from GIGA`.
pub fn peer_label(peer: &str) -> String {
    format!("{} from {}", SERIAL_LABEL, peer)
}
