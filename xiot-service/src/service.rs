//! Session adapter between a device and the xiot protocol client
//!
//! # Lifecycle
//!
//! 1. **Create**: `IotService::new` (no client yet, `Uninitialized`)
//! 2. **Initialize**: build key getter, cipher and client, register the
//!    inbound handlers (`Initialized`)
//! 3. **Connect**: open the session; keepalive and dispatch start (`Connected`)
//! 4. **Disconnect**: stop keepalive and dispatch, close the client
//!    (`Disconnected`); connecting again is allowed
//!
//! # Usage Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use xiot_device::SimulatedDevice;
//! use xiot_service::{IotService, ServiceConfig};
//! # async fn run(factory: impl xiot_xcp::ClientFactory) -> xiot_core::XiotResult<()> {
//! let config = ServiceConfig::load(None)?;
//! let mut service = IotService::create(&config.identity(), Arc::new(SimulatedDevice::new()), &factory)?;
//! service.connect(&config.host, config.port, &config.uri).await?;
//! let key = service.get_access_key().await?;
//! service.disconnect()?;
//! # Ok(())
//! # }
//! ```

use crate::config::DeviceIdentity;
use crate::dispatch::HANDLERS;
use crate::outcome::{AccessKeyOutcome, QueryOutcome};
use crate::session::{ConnectedSession, KEEPALIVE_INTERVAL, SharedReceiver};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use xiot_core::{
    EventOperation, IqQuery, PropertyOperation, QueryKind, ResultKind, Status, XiotError,
    XiotResult,
};
use xiot_device::DeviceHandlers;
use xiot_security::{DeviceKeyPair, FrameCodecType, ProductCipher, decode_server_key};
use xiot_xcp::{ClientFactory, ClientSpec, XcpClient, query_channel};

/// Key written by `reset_access_key`
pub const DEMO_ACCESS_KEY: &str = "this a demo key";

/// Protocol client plus the receiving end of its inbound queries
struct Attached {
    client: Arc<dyn XcpClient>,
    inbound: SharedReceiver,
}

/// Device session adapter
pub struct IotService {
    status: Status,
    device: Arc<dyn DeviceHandlers>,
    attached: Option<Attached>,
    session: Option<ConnectedSession>,
    keepalive_interval: Duration,
}

impl IotService {
    /// Create an adapter for `device` with no client yet
    pub fn new(device: Arc<dyn DeviceHandlers>) -> Self {
        Self {
            status: Status::Uninitialized,
            device,
            attached: None,
            session: None,
            keepalive_interval: KEEPALIVE_INTERVAL,
        }
    }

    /// Create an adapter and initialize it in one step
    pub fn create<F>(
        identity: &DeviceIdentity,
        device: Arc<dyn DeviceHandlers>,
        factory: &F,
    ) -> XiotResult<Self>
    where
        F: ClientFactory + ?Sized,
    {
        let mut service = Self::new(device);
        service.initialize(identity, factory)?;
        Ok(service)
    }

    /// Override the keepalive period; applies to the next connected session
    pub fn with_keepalive_interval(mut self, interval: Duration) -> Self {
        self.keepalive_interval = interval;
        self
    }

    /// Build the client from `identity` and register the inbound handlers
    ///
    /// # Errors
    /// Returns `ClientAlreadyCreated` if a client exists, or the error of
    /// whichever key, cipher or client construction step failed; the status
    /// is then `InitializeFailed`.
    pub fn initialize<F>(&mut self, identity: &DeviceIdentity, factory: &F) -> XiotResult<()>
    where
        F: ClientFactory + ?Sized,
    {
        if self.attached.is_some() {
            return Err(XiotError::ClientAlreadyCreated);
        }

        log::info!("initializing device {}", identity.serial_number);
        self.status = Status::Initializing;

        let client = match Self::build_client(identity, factory) {
            Ok(client) => client,
            Err(e) => {
                log::error!("initialize failed: {}", e);
                self.status = Status::InitializeFailed;
                return Err(e);
            }
        };

        let (sender, receiver) = query_channel();
        for (method, _) in HANDLERS {
            client.add_query_handler(method, sender.clone());
        }

        self.attached = Some(Attached {
            client,
            inbound: Arc::new(Mutex::new(receiver)),
        });
        self.status = Status::Initialized;
        Ok(())
    }

    fn build_client<F>(identity: &DeviceIdentity, factory: &F) -> XiotResult<Arc<dyn XcpClient>>
    where
        F: ClientFactory + ?Sized,
    {
        let server_ltpk = decode_server_key(&identity.server_ltpk)?;
        let getter = Arc::new(DeviceKeyPair::new(&identity.device_ltpk, &identity.device_ltsk)?);
        let cipher = ProductCipher::new(
            identity.product_id,
            identity.product_version,
            getter,
            server_ltpk,
        )?;

        factory.create(ClientSpec {
            serial_number: identity.serial_number.clone(),
            product_id: identity.product_id,
            product_version: identity.product_version,
            cipher,
            codec: FrameCodecType::NotCrypt,
        })
    }

    fn client(&self) -> XiotResult<&Arc<dyn XcpClient>> {
        self.attached
            .as_ref()
            .map(|attached| &attached.client)
            .ok_or(XiotError::ClientNotCreated)
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn uninitialized(&self) -> bool {
        self.status == Status::Uninitialized
    }

    pub fn is_connected(&self) -> bool {
        self.status.is_connected()
    }

    /// Whether the keepalive of a connected session is running
    pub fn keepalive_active(&self) -> bool {
        self.session.is_some()
    }

    /// Device id known to the client
    pub fn did(&self) -> XiotResult<String> {
        Ok(self.client()?.device_id())
    }

    /// Connect to the server at `host:port`, session path `uri`
    ///
    /// On success the status is `Connected` and keepalive is running. On
    /// failure the client's error is returned and the status stays
    /// `Connecting`.
    pub async fn connect(&mut self, host: &str, port: u16, uri: &str) -> XiotResult<()> {
        let client = self.client()?.clone();
        self.status = Status::Connecting;
        log::info!("connecting to xcp server {}:{}{}", host, port, uri);

        if let Err(e) = client.connect(host, port, uri).await {
            log::error!("connect to xcp server failed: {}", e);
            return Err(e);
        }

        log::info!("connect to xcp server ok!");
        self.status = Status::Connected;

        if self.session.is_none() {
            if let Some(attached) = &self.attached {
                self.session = Some(ConnectedSession::start(
                    client,
                    self.device.clone(),
                    attached.inbound.clone(),
                    self.keepalive_interval,
                ));
            }
        }
        Ok(())
    }

    /// Stop keepalive and dispatch, then close the client
    pub fn disconnect(&mut self) -> XiotResult<()> {
        let client = self.client()?.clone();
        log::info!("disconnect");
        self.status = Status::Disconnecting;
        self.session = None;
        client.disconnect();
        self.status = Status::Disconnected;
        Ok(())
    }

    /// Ask the server for the device's access key
    ///
    /// Any result other than a get-access-key result is logged and yields
    /// `Mismatch` with an empty key.
    pub async fn get_access_key(&self) -> XiotResult<AccessKeyOutcome> {
        let client = self.client()?;
        let query = IqQuery::new(client.next_id(), QueryKind::GetAccessKey);
        let outcome = match client.send_query(query).await?.kind {
            ResultKind::GetAccessKey { key } => QueryOutcome::Confirmed(key),
            other => {
                log::error!("invalid result: {}", other.method());
                QueryOutcome::Mismatch(String::new())
            }
        };
        Ok(outcome)
    }

    /// Replace the device's access key with `DEMO_ACCESS_KEY`
    ///
    /// The demo key is returned whatever the server answers; only the
    /// variant tells whether the server confirmed it.
    pub async fn reset_access_key(&self) -> XiotResult<AccessKeyOutcome> {
        let client = self.client()?;
        let key = DEMO_ACCESS_KEY.to_string();
        let query = IqQuery::new(client.next_id(), QueryKind::SetAccessKey { key: key.clone() });
        let outcome = match client.send_query(query).await?.kind {
            ResultKind::SetAccessKey => QueryOutcome::Confirmed(key),
            other => {
                log::error!("invalid result: {}", other.method());
                QueryOutcome::Mismatch(key)
            }
        };
        Ok(outcome)
    }

    /// Report changed property values to the server
    ///
    /// `Confirmed` carries the per-property statuses the server sent back,
    /// `Mismatch` the properties as they were sent.
    pub async fn notify_properties_changed(
        &self,
        properties: Vec<PropertyOperation>,
    ) -> XiotResult<QueryOutcome<Vec<PropertyOperation>>> {
        let client = self.client()?;
        let query = IqQuery::new(
            client.next_id(),
            QueryKind::PropertiesChanged {
                properties: properties.clone(),
            },
        );
        let outcome = match client.send_query(query).await?.kind {
            ResultKind::PropertiesChanged { properties } => QueryOutcome::Confirmed(properties),
            other => {
                log::error!("invalid result: {}", other.method());
                QueryOutcome::Mismatch(properties)
            }
        };
        Ok(outcome)
    }

    /// Report an event occurrence to the server
    pub async fn notify_event_occurred(&self, event: EventOperation) -> XiotResult<QueryOutcome<()>> {
        let client = self.client()?;
        let eid = event.eid;
        let query = IqQuery::new(client.next_id(), QueryKind::EventOccurred { event });
        let outcome = match client.send_query(query).await?.kind {
            ResultKind::EventOccurred => QueryOutcome::Confirmed(()),
            other => {
                log::error!("invalid result for event {}: {}", eid, other.method());
                QueryOutcome::Mismatch(())
            }
        };
        Ok(outcome)
    }
}
