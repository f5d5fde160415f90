//! BLE notification listener
//!
//! Scans for the GIGA, connects, subscribes to its TX characteristic and
//! prints each notification until shut down. Whatever happens after a
//! device is found, the link is released before returning.

use std::io::Write;

use futures::StreamExt;

use crate::ble::transport::{BleDevice, BleScanner};
use crate::config::BleConfig;
use crate::error::ListenerError;
use crate::protocol::{decode_message, format_message, peer_label};
use crate::shutdown::Shutdown;

/// Lifecycle of one listener run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerState {
    Scanning,
    Connecting,
    Subscribed,
    Idling,
    Disconnecting,
    Terminated,
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BleOutcome {
    /// Nothing advertised the device name within the scan timeout
    NotFound,
    /// Listened until shut down or until the peer dropped the link
    Finished,
    /// Connecting or subscribing failed; the failure was reported and
    /// cleanup still ran
    ConnectionFailed,
}

/// Listens for text notifications from one BLE peripheral.
pub struct BleListener {
    config: BleConfig,
    /// e.g. `Received from GIGA`
    label: String,
    state: ListenerState,
}

impl BleListener {
    pub fn new(config: BleConfig) -> Self {
        let label = peer_label(&config.peer_label);
        Self {
            config,
            label,
            state: ListenerState::Scanning,
        }
    }

    pub fn state(&self) -> ListenerState {
        self.state
    }

    fn transition(&mut self, next: ListenerState) {
        log::debug!("{:?} -> {:?}", self.state, next);
        self.state = next;
    }

    /// Run the listener, writing status and messages to `out`.
    ///
    /// Errors from the scan itself are returned. Errors while connecting,
    /// subscribing or listening are reported to `diag` with their full chain
    /// and end the run as [`BleOutcome::ConnectionFailed`]. Raising
    /// `shutdown` ends the run from any state; once a device was found the
    /// link is still released.
    pub async fn run<S, W, E>(
        &mut self,
        scanner: &S,
        out: &mut W,
        diag: &mut E,
        shutdown: &Shutdown,
    ) -> Result<BleOutcome, ListenerError>
    where
        S: BleScanner,
        W: Write,
        E: Write,
    {
        self.transition(ListenerState::Scanning);
        writeln!(out, "Scanning for {}...", self.config.device_name)?;
        out.flush()?;

        let found = tokio::select! {
            biased;
            _ = shutdown.wait() => {
                log::debug!("shutdown during scan");
                self.transition(ListenerState::Terminated);
                return Ok(BleOutcome::Finished);
            }
            found = scanner.find_device(&self.config.device_name, self.config.scan_timeout) => found,
        };
        let device = match found {
            Ok(Some(device)) => device,
            Ok(None) => {
                self.transition(ListenerState::Terminated);
                writeln!(
                    out,
                    "Device not found. Make sure {} is powered and advertising.",
                    self.config.peer_label
                )?;
                return Ok(BleOutcome::NotFound);
            }
            Err(e) => {
                self.transition(ListenerState::Terminated);
                return Err(e);
            }
        };

        if shutdown.is_triggered() {
            self.transition(ListenerState::Terminated);
            return Ok(BleOutcome::Finished);
        }

        writeln!(out, "Found {}! Connecting...", self.config.peer_label)?;
        self.transition(ListenerState::Connecting);

        let report = match self.listen(&device, out, shutdown).await {
            Ok(()) => Ok(BleOutcome::Finished),
            Err(e) => report_failure(diag, e).map(|()| BleOutcome::ConnectionFailed),
        };

        let cleanup = self.release(&device, out).await;
        self.transition(ListenerState::Terminated);

        cleanup?;
        report
    }

    /// Connect, subscribe and print notifications until shut down.
    async fn listen<D, W>(
        &mut self,
        device: &D,
        out: &mut W,
        shutdown: &Shutdown,
    ) -> Result<(), ListenerError>
    where
        D: BleDevice,
        W: Write,
    {
        tokio::select! {
            connected = device.connect() => connected?,
            _ = shutdown.wait() => return Ok(()),
        }

        // Let the GATT table settle before subscribing
        tokio::select! {
            _ = tokio::time::sleep(self.config.settle_delay) => {}
            _ = shutdown.wait() => return Ok(()),
        }

        let mut notifications = device
            .subscribe(self.config.service_uuid, self.config.tx_char_uuid)
            .await?;
        self.transition(ListenerState::Subscribed);
        writeln!(out, "Connected. Listening for messages (press Ctrl+C to stop)...")?;
        out.flush()?;

        self.transition(ListenerState::Idling);
        loop {
            tokio::select! {
                payload = notifications.next() => match payload {
                    Some(payload) => self.handle_notification(&payload, out)?,
                    None => {
                        log::warn!("notification stream ended, peer dropped the link");
                        break;
                    }
                },
                _ = shutdown.wait() => break,
            }
        }

        Ok(())
    }

    fn handle_notification<W: Write>(&self, payload: &[u8], out: &mut W) -> Result<(), ListenerError> {
        match decode_message(payload) {
            Ok(Some(message)) => {
                writeln!(out, "{}", format_message(&self.label, message))?;
                out.flush()?;
            }
            Ok(None) => {}
            Err(e) => log::warn!("skipping notification that is not UTF-8: {}", e),
        }
        Ok(())
    }

    /// Unsubscribe and disconnect if the link is still up.
    async fn release<D, W>(&mut self, device: &D, out: &mut W) -> Result<(), ListenerError>
    where
        D: BleDevice,
        W: Write,
    {
        let subscribed = matches!(
            self.state,
            ListenerState::Subscribed | ListenerState::Idling
        );
        self.transition(ListenerState::Disconnecting);

        match device.is_connected().await {
            Ok(true) => {}
            Ok(false) => {
                log::debug!("link already down, nothing to release");
                return Ok(());
            }
            // Unknown state: disconnecting anyway is harmless
            Err(e) => log::warn!("could not query connection state: {}", e),
        }

        if subscribed {
            if let Err(e) = device
                .unsubscribe(self.config.service_uuid, self.config.tx_char_uuid)
                .await
            {
                log::warn!("unsubscribe failed: {}", e);
            }
        }

        device.disconnect().await?;
        writeln!(out, "Disconnected from {}.", self.config.peer_label)?;
        out.flush()?;
        Ok(())
    }
}

/// Print a connection failure with its full error chain.
fn report_failure<E: Write>(diag: &mut E, error: ListenerError) -> Result<(), ListenerError> {
    writeln!(diag, "Connection failed:")?;
    writeln!(diag, "{:?}", anyhow::Error::from(error))?;
    Ok(())
}
