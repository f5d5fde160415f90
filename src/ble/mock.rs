//! Fake BLE transport for testing

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::{future, stream, StreamExt};
use uuid::Uuid;

use crate::ble::transport::{BleDevice, BleScanner, NotificationStream};
use crate::error::ListenerError;

#[derive(Default)]
struct FakeState {
    payloads: Vec<Vec<u8>>,
    fail_connect: bool,
    /// connect() never completes
    hang_connect: bool,
    fail_subscribe: bool,
    fail_unsubscribe: bool,
    /// is_connected() fails
    fail_state_query: bool,
    /// The link goes down right after subscribing
    drop_link: bool,
    /// Keep the notification stream open after the queued payloads
    held_open: bool,
    connected: AtomicBool,
    calls: Mutex<Vec<&'static str>>,
}

/// Fake peripheral that records every call made on it.
///
/// Clones share state, so a test can keep one handle while the listener
/// owns another.
#[derive(Clone, Default)]
pub struct FakeDevice {
    state: Arc<FakeState>,
}

impl FakeDevice {
    pub fn new() -> Self {
        Self::default()
    }

    fn configure(self, f: impl FnOnce(&mut FakeState)) -> Self {
        let mut state = Arc::try_unwrap(self.state).unwrap_or_else(|_| {
            panic!("configure the fake before sharing it")
        });
        f(&mut state);
        Self {
            state: Arc::new(state),
        }
    }

    /// Payloads notified after subscribing, in order
    pub fn with_payloads(self, payloads: &[&[u8]]) -> Self {
        let payloads = payloads.iter().map(|p| p.to_vec()).collect();
        self.configure(|s| s.payloads = payloads)
    }

    pub fn failing_connect(self) -> Self {
        self.configure(|s| s.fail_connect = true)
    }

    pub fn hanging_connect(self) -> Self {
        self.configure(|s| s.hang_connect = true)
    }

    pub fn failing_subscribe(self) -> Self {
        self.configure(|s| s.fail_subscribe = true)
    }

    pub fn failing_unsubscribe(self) -> Self {
        self.configure(|s| s.fail_unsubscribe = true)
    }

    pub fn failing_state_query(self) -> Self {
        self.configure(|s| s.fail_state_query = true)
    }

    pub fn dropping_link(self) -> Self {
        self.configure(|s| s.drop_link = true)
    }

    pub fn held_open(self) -> Self {
        self.configure(|s| s.held_open = true)
    }

    /// Names of the calls made so far
    pub fn calls(&self) -> Vec<&'static str> {
        self.state.calls.lock().unwrap().clone()
    }

    fn record(&self, call: &'static str) {
        self.state.calls.lock().unwrap().push(call);
    }
}

impl BleDevice for FakeDevice {
    async fn connect(&self) -> Result<(), ListenerError> {
        self.record("connect");
        if self.state.hang_connect {
            future::pending::<()>().await;
        }
        if self.state.fail_connect {
            return Err(btleplug::Error::NotConnected.into());
        }
        self.state.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn is_connected(&self) -> Result<bool, ListenerError> {
        self.record("is_connected");
        if self.state.fail_state_query {
            return Err(btleplug::Error::RuntimeError("adapter went away".to_string()).into());
        }
        Ok(self.state.connected.load(Ordering::SeqCst))
    }

    async fn subscribe(
        &self,
        _service: Uuid,
        characteristic: Uuid,
    ) -> Result<NotificationStream, ListenerError> {
        self.record("subscribe");
        if self.state.fail_subscribe {
            return Err(ListenerError::CharacteristicNotFound(characteristic));
        }
        if self.state.drop_link {
            self.state.connected.store(false, Ordering::SeqCst);
        }

        let queued = stream::iter(self.state.payloads.clone());
        if self.state.held_open {
            Ok(queued.chain(stream::pending()).boxed())
        } else {
            Ok(queued.boxed())
        }
    }

    async fn unsubscribe(&self, _service: Uuid, _characteristic: Uuid) -> Result<(), ListenerError> {
        self.record("unsubscribe");
        if self.state.fail_unsubscribe {
            return Err(btleplug::Error::NotConnected.into());
        }
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), ListenerError> {
        self.record("disconnect");
        self.state.connected.store(false, Ordering::SeqCst);
        Ok(())
    }
}

/// Fake scanner that sees at most one advertising device.
pub struct FakeScanner {
    advertised: Option<(String, FakeDevice)>,
    fail: bool,
}

impl FakeScanner {
    pub fn advertising(name: &str, device: FakeDevice) -> Self {
        Self {
            advertised: Some((name.to_string(), device)),
            fail: false,
        }
    }

    /// Scanner whose scan fails as if no adapter were present
    pub fn failing() -> Self {
        Self {
            advertised: None,
            fail: true,
        }
    }
}

impl BleScanner for FakeScanner {
    type Device = FakeDevice;

    async fn find_device(
        &self,
        name: &str,
        scan_timeout: Duration,
    ) -> Result<Option<FakeDevice>, ListenerError> {
        if self.fail {
            return Err(ListenerError::NoAdapter);
        }

        match &self.advertised {
            Some((advertised, device)) if advertised == name => Ok(Some(device.clone())),
            _ => {
                tokio::time::sleep(scan_timeout).await;
                Ok(None)
            }
        }
    }
}
