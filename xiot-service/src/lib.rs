//! Device session adapter for xiot
//!
//! `IotService` ties a device's property/action callbacks to a protocol
//! client: it builds the client from the device identity, answers inbound
//! get/set-properties and invoke-action queries, keeps the session alive
//! with periodic pings, and exposes the device-originated queries (access
//! key, change and event notifications).

pub mod config;
pub mod dispatch;
pub mod outcome;
pub mod service;
pub mod session;

#[cfg(test)]
mod testing;

pub use config::{DeviceIdentity, ServiceConfig};
pub use dispatch::{Outbound, QueryHandler};
pub use outcome::{AccessKeyOutcome, QueryOutcome};
pub use service::{DEMO_ACCESS_KEY, IotService};
pub use session::KEEPALIVE_INTERVAL;
