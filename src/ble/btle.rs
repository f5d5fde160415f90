//! btleplug implementation of the BLE transport.

use std::time::Duration;

use btleplug::api::{Central as _, Characteristic, Manager as _, Peripheral as _, ScanFilter};
use btleplug::platform::{Adapter, Manager, Peripheral};
use futures::{future, StreamExt};
use tokio::time::Instant;
use uuid::Uuid;

use crate::ble::transport::{BleDevice, BleScanner, NotificationStream};
use crate::config;
use crate::error::ListenerError;

/// Scanner backed by the host's first Bluetooth adapter.
pub struct BtleScanner {
    adapter: Adapter,
}

impl BtleScanner {
    /// Use the first adapter the platform reports.
    pub async fn first_adapter() -> Result<Self, ListenerError> {
        let manager = Manager::new().await?;
        let adapter = manager
            .adapters()
            .await?
            .into_iter()
            .next()
            .ok_or(ListenerError::NoAdapter)?;

        Ok(Self { adapter })
    }

    /// Poll the adapter's discovered peripherals for a matching local name.
    async fn poll_for_name(
        &self,
        name: &str,
        scan_timeout: Duration,
    ) -> Result<Option<Peripheral>, ListenerError> {
        let start = Instant::now();

        while start.elapsed() < scan_timeout {
            for peripheral in self.adapter.peripherals().await? {
                if let Some(props) = peripheral.properties().await? {
                    if props.local_name.as_deref() == Some(name) {
                        log::debug!("found '{}' at {}", name, peripheral.address());
                        return Ok(Some(peripheral));
                    }
                }
            }

            tokio::time::sleep(Duration::from_millis(config::ble::SCAN_POLL_MS)).await;
        }

        Ok(None)
    }
}

impl BleScanner for BtleScanner {
    type Device = BtleDevice;

    async fn find_device(
        &self,
        name: &str,
        scan_timeout: Duration,
    ) -> Result<Option<BtleDevice>, ListenerError> {
        self.adapter.start_scan(ScanFilter::default()).await?;

        let found = self.poll_for_name(name, scan_timeout).await;

        // Stop scanning on both paths before reporting a lookup error
        self.adapter.stop_scan().await?;

        Ok(found?.map(|peripheral| BtleDevice { peripheral }))
    }
}

/// A btleplug peripheral.
pub struct BtleDevice {
    peripheral: Peripheral,
}

impl BtleDevice {
    fn characteristic(
        &self,
        service: Uuid,
        characteristic: Uuid,
    ) -> Result<Characteristic, ListenerError> {
        self.peripheral
            .characteristics()
            .into_iter()
            .find(|c| c.uuid == characteristic && c.service_uuid == service)
            .ok_or(ListenerError::CharacteristicNotFound(characteristic))
    }
}

impl BleDevice for BtleDevice {
    async fn connect(&self) -> Result<(), ListenerError> {
        self.peripheral.connect().await?;
        self.peripheral.discover_services().await?;
        Ok(())
    }

    async fn is_connected(&self) -> Result<bool, ListenerError> {
        Ok(self.peripheral.is_connected().await?)
    }

    async fn subscribe(
        &self,
        service: Uuid,
        characteristic: Uuid,
    ) -> Result<NotificationStream, ListenerError> {
        let tx_char = self.characteristic(service, characteristic)?;

        // Take the stream before enabling notifications so none are missed
        let notifications = self.peripheral.notifications().await?;
        self.peripheral.subscribe(&tx_char).await?;

        Ok(notifications
            .filter_map(move |n| future::ready((n.uuid == characteristic).then_some(n.value)))
            .boxed())
    }

    async fn unsubscribe(&self, service: Uuid, characteristic: Uuid) -> Result<(), ListenerError> {
        let tx_char = self.characteristic(service, characteristic)?;
        self.peripheral.unsubscribe(&tx_char).await?;
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), ListenerError> {
        self.peripheral.disconnect().await?;
        Ok(())
    }
}
