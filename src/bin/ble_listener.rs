//! Prints text notified by the GIGA over BLE.
//!
//! Exits with status 0 when stopped with Ctrl+C or when the board is not
//! found, and 1 when no adapter is available or connecting fails. The
//! connection failure trace goes to stderr.

use std::time::Duration;

use clap::Parser;
use colored::Colorize;
use uuid::Uuid;

use giga_listener::ble::{BleListener, BleOutcome, BtleScanner};
use giga_listener::config::{self, BleConfig};
use giga_listener::Shutdown;

#[derive(Parser)]
#[command(name = "ble-listener")]
#[command(about = "Print messages notified by the GIGA over BLE")]
struct Args {
    /// Advertised name of the board
    #[arg(short, long, default_value = config::ble::DEVICE_NAME)]
    name: String,

    /// UART service UUID
    #[arg(long, default_value_t = config::ble::UART_SERVICE_UUID)]
    service_uuid: Uuid,

    /// TX (notify) characteristic UUID
    #[arg(long, default_value_t = config::ble::TX_CHAR_UUID)]
    tx_uuid: Uuid,

    /// BLE scan timeout in seconds
    #[arg(long, default_value_t = config::ble::SCAN_TIMEOUT_SECS)]
    scan_timeout: u64,

    /// Pause after connecting before subscribing, in milliseconds
    #[arg(long, default_value_t = config::ble::SETTLE_DELAY_MS)]
    settle_ms: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let config = BleConfig::default()
        .with_device_name(&args.name)
        .with_uuids(args.service_uuid, args.tx_uuid)
        .with_scan_timeout(Duration::from_secs(args.scan_timeout))
        .with_settle_delay(Duration::from_millis(args.settle_ms));

    let shutdown = Shutdown::new();
    shutdown.trigger_on_ctrl_c();

    let scanner = match BtleScanner::first_adapter().await {
        Ok(scanner) => scanner,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            std::process::exit(1);
        }
    };

    let mut listener = BleListener::new(config);
    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();

    match listener.run(&scanner, &mut stdout, &mut stderr, &shutdown).await {
        Ok(BleOutcome::NotFound) | Ok(BleOutcome::Finished) => Ok(()),
        Ok(BleOutcome::ConnectionFailed) => std::process::exit(1),
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            std::process::exit(1);
        }
    }
}
