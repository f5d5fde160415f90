//! BLE transport traits for abstraction and testability
//!
//! These traits define the few central-role operations the listener needs,
//! allowing btleplug to be swapped with a fake in tests.

use core::future::Future;
use std::pin::Pin;
use std::time::Duration;

use futures::Stream;
use uuid::Uuid;

use crate::error::ListenerError;

/// Payloads notified on a subscribed characteristic, in arrival order
pub type NotificationStream = Pin<Box<dyn Stream<Item = Vec<u8>> + Send>>;

/// Finds advertising peripherals.
pub trait BleScanner {
    type Device: BleDevice;

    /// Scan until a peripheral advertising `name` is seen or `scan_timeout`
    /// elapses. Returns `Ok(None)` on timeout.
    fn find_device(
        &self,
        name: &str,
        scan_timeout: Duration,
    ) -> impl Future<Output = Result<Option<Self::Device>, ListenerError>>;
}

/// A peripheral found by a [`BleScanner`].
pub trait BleDevice {
    /// Connect and discover the GATT table
    fn connect(&self) -> impl Future<Output = Result<(), ListenerError>>;

    fn is_connected(&self) -> impl Future<Output = Result<bool, ListenerError>>;

    /// Enable notifications on a characteristic and stream its payloads
    fn subscribe(
        &self,
        service: Uuid,
        characteristic: Uuid,
    ) -> impl Future<Output = Result<NotificationStream, ListenerError>>;

    fn unsubscribe(
        &self,
        service: Uuid,
        characteristic: Uuid,
    ) -> impl Future<Output = Result<(), ListenerError>>;

    fn disconnect(&self) -> impl Future<Output = Result<(), ListenerError>>;
}
