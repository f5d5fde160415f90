//! Prints lines sent by the GIGA over its USB serial port.
//!
//! Exits with status 0 when stopped with Ctrl+C and 1 when the port cannot
//! be opened or the read loop fails.

use std::time::Duration;

use clap::Parser;
use colored::Colorize;

use giga_listener::config::{self, SerialConfig};
use giga_listener::serial::{open_port, resolve_port, SerialListener};
use giga_listener::{ListenerError, Shutdown};

#[derive(Parser)]
#[command(name = "serial-listener")]
#[command(about = "Print lines received from the GIGA over serial")]
struct Args {
    /// Serial port for the board (use "auto" to auto-detect)
    #[arg(short, long, default_value = config::serial::PORT)]
    port: String,

    /// Baud rate, must match the sketch
    #[arg(short, long, default_value_t = config::serial::BAUD_RATE,
          value_parser = clap::value_parser!(u32).range(1..))]
    baud: u32,

    /// Per-read timeout in seconds
    #[arg(short, long, default_value_t = config::serial::READ_TIMEOUT_SECS,
          value_parser = clap::value_parser!(u64).range(1..))]
    timeout: u64,

    /// Wait after opening the port while the board resets, in milliseconds
    #[arg(long, default_value_t = config::serial::RESET_DELAY_MS)]
    reset_delay_ms: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();

    let shutdown = Shutdown::new();
    shutdown.trigger_on_ctrl_c();

    let result = tokio::task::spawn_blocking(move || listen(&args, &shutdown)).await?;

    match result {
        Ok(()) => Ok(()),
        Err(e @ (ListenerError::Open { .. } | ListenerError::PortNotFound)) => {
            eprintln!("{} {}", "Serial connection failed:".red().bold(), e);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            std::process::exit(1);
        }
    }
}

/// Open the port, wait out the board reset and print lines until Ctrl+C.
fn listen(args: &Args, shutdown: &Shutdown) -> Result<(), ListenerError> {
    let port = resolve_port(&args.port)?;
    let config = SerialConfig::new(&port)
        .with_baud_rate(args.baud)
        .with_timeout(Duration::from_secs(args.timeout))
        .with_reset_delay(Duration::from_millis(args.reset_delay_ms));

    println!("Connecting to {} at {} baud...", config.port, config.baud_rate);
    let port = open_port(&config)?;

    // Opening the port resets the board
    if shutdown.sleep_blocking(config.reset_delay) {
        return Ok(());
    }
    println!("{}", "Connected! Listening for messages...".green());
    println!();

    let mut stdout = std::io::stdout().lock();
    SerialListener::new(port).run(&mut stdout, shutdown)
}
