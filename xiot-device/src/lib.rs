//! Device side of an xiot session
//!
//! `DeviceHandlers` is the capability the session adapter forwards inbound
//! property and action queries to. `SimulatedDevice` implements it over an
//! in-memory property table.

pub mod handlers;
pub mod simulated;

pub use handlers::DeviceHandlers;
pub use simulated::SimulatedDevice;
