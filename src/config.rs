//! Connection defaults for the GIGA listeners.
//!
//! The constant groups hold the documented defaults; the config structs
//! carry them into the listeners and can be overridden from the CLI.

use std::time::Duration;

use uuid::Uuid;

/// Serial defaults
pub mod serial {
    /// Port the GIGA enumerates as
    #[cfg(windows)]
    pub const PORT: &str = "COM5";
    /// Port the GIGA enumerates as
    #[cfg(not(windows))]
    pub const PORT: &str = "/dev/ttyACM0";

    /// Must match `Serial.begin()` on the board
    pub const BAUD_RATE: u32 = 115200;

    /// Per-read maximum wait
    pub const READ_TIMEOUT_SECS: u64 = 1;

    /// Opening the port resets the board; give it time to boot
    pub const RESET_DELAY_MS: u64 = 2000;

    /// USB vendor id used by Arduino boards, preferred by port auto-detection
    pub const ARDUINO_VID: u16 = 0x2341;
}

/// BLE defaults
pub mod ble {
    use uuid::Uuid;

    /// Advertised local name of the GIGA sketch
    pub const DEVICE_NAME: &str = "GIGA_BLE_UART";

    /// Name used in console output for the peer
    pub const PEER_LABEL: &str = "GIGA";

    /// UART-style service exposed by the sketch
    pub const UART_SERVICE_UUID: Uuid = Uuid::from_u128(0x19b10000_e8f2_537e_4f6c_d104768a1214);

    /// Notify characteristic carrying text from the board
    pub const TX_CHAR_UUID: Uuid = Uuid::from_u128(0x19b10001_e8f2_537e_4f6c_d104768a1214);

    pub const SCAN_TIMEOUT_SECS: u64 = 10;

    /// Pause after connecting so the GATT table settles before subscribing
    pub const SETTLE_DELAY_MS: u64 = 2000;

    /// Interval between checks of the adapter's discovered peripherals
    pub const SCAN_POLL_MS: u64 = 100;
}

/// Serial listener configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialConfig {
    /// Port name, or `auto` to detect the board
    pub port: String,
    pub baud_rate: u32,
    /// Per-read maximum wait
    pub timeout: Duration,
    /// Wait after opening before the first read
    pub reset_delay: Duration,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: serial::PORT.to_string(),
            baud_rate: serial::BAUD_RATE,
            timeout: Duration::from_secs(serial::READ_TIMEOUT_SECS),
            reset_delay: Duration::from_millis(serial::RESET_DELAY_MS),
        }
    }
}

impl SerialConfig {
    /// Create a configuration for the given port with default settings
    pub fn new(port: &str) -> Self {
        Self {
            port: port.to_string(),
            ..Default::default()
        }
    }

    pub fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_reset_delay(mut self, reset_delay: Duration) -> Self {
        self.reset_delay = reset_delay;
        self
    }
}

/// BLE listener configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BleConfig {
    /// Advertised local name to match
    pub device_name: String,
    /// Name printed in `Received from <label>:` lines
    pub peer_label: String,
    pub service_uuid: Uuid,
    pub tx_char_uuid: Uuid,
    pub scan_timeout: Duration,
    pub settle_delay: Duration,
}

impl Default for BleConfig {
    fn default() -> Self {
        Self {
            device_name: ble::DEVICE_NAME.to_string(),
            peer_label: ble::PEER_LABEL.to_string(),
            service_uuid: ble::UART_SERVICE_UUID,
            tx_char_uuid: ble::TX_CHAR_UUID,
            scan_timeout: Duration::from_secs(ble::SCAN_TIMEOUT_SECS),
            settle_delay: Duration::from_millis(ble::SETTLE_DELAY_MS),
        }
    }
}

impl BleConfig {
    pub fn with_device_name(mut self, name: &str) -> Self {
        self.device_name = name.to_string();
        self
    }

    pub fn with_uuids(mut self, service_uuid: Uuid, tx_char_uuid: Uuid) -> Self {
        self.service_uuid = service_uuid;
        self.tx_char_uuid = tx_char_uuid;
        self
    }

    pub fn with_scan_timeout(mut self, scan_timeout: Duration) -> Self {
        self.scan_timeout = scan_timeout;
        self
    }

    pub fn with_settle_delay(mut self, settle_delay: Duration) -> Self {
        self.settle_delay = settle_delay;
        self
    }
}
