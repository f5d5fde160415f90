//! Serial port discovery and opening

use serialport::{SerialPort, SerialPortInfo, SerialPortType};

use crate::config::{self, SerialConfig};
use crate::error::ListenerError;

/// Port argument that triggers auto-detection
pub const AUTO_PORT: &str = "auto";

/// Open the configured port with its baud rate and per-read timeout.
pub fn open_port(config: &SerialConfig) -> Result<Box<dyn SerialPort>, ListenerError> {
    log::debug!(
        "opening {} at {} baud (timeout {:?})",
        config.port,
        config.baud_rate,
        config.timeout
    );

    serialport::new(&config.port, config.baud_rate)
        .timeout(config.timeout)
        .open()
        .map_err(|source| ListenerError::Open {
            port: config.port.clone(),
            source,
        })
}

/// Resolve a port argument - returns it unchanged unless it is "auto".
pub fn resolve_port(port_arg: &str) -> Result<String, ListenerError> {
    if port_arg != AUTO_PORT {
        return Ok(port_arg.to_string());
    }

    let ports = serialport::available_ports().map_err(ListenerError::Enumerate)?;
    log::debug!("found {} serial ports", ports.len());

    pick_port(&ports).ok_or(ListenerError::PortNotFound)
}

/// Choose the most likely board among the available ports.
///
/// An Arduino USB port wins, then any USB port. Non-USB ports (built-in
/// UARTs, Bluetooth SPP) are never picked.
pub fn pick_port(ports: &[SerialPortInfo]) -> Option<String> {
    let usb_vid = |info: &SerialPortInfo| match &info.port_type {
        SerialPortType::UsbPort(usb) => Some(usb.vid),
        _ => None,
    };

    ports
        .iter()
        .find(|info| usb_vid(info) == Some(config::serial::ARDUINO_VID))
        .or_else(|| ports.iter().find(|info| usb_vid(info).is_some()))
        .map(|info| info.port_name.clone())
}
