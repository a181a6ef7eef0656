//! xiot - device side session adapter
//!
//! Binds a device's property and action handlers to an XCP protocol
//! client and keeps the resulting session alive.
//!
//! # Architecture
//!
//! This library is organized as a workspace with multiple crates:
//!
//! - `xiot-core`: Error type, lifecycle status, spec identifiers and IQ messages
//! - `xiot-security`: Device key pair, product cipher, frame codec selector
//! - `xiot-xcp`: Protocol client boundary (`XcpClient`, `ClientFactory`)
//! - `xiot-device`: Device handler capability and a simulated device
//! - `xiot-service`: Session adapter (`IotService`), dispatch and keepalive
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use xiot::device::SimulatedDevice;
//! use xiot::service::{IotService, ServiceConfig};
//! use xiot::xcp::{ClientSpec, XcpClient};
//!
//! # fn make_client(_spec: ClientSpec) -> xiot::XiotResult<Arc<dyn XcpClient>> { unimplemented!() }
//! # async fn run() -> xiot::XiotResult<()> {
//! let config = ServiceConfig::load(None)?;
//! let device = Arc::new(SimulatedDevice::new());
//! let mut service = IotService::create(&config.identity(), device, &make_client)?
//!     .with_keepalive_interval(config.keepalive_interval());
//! service.connect(&config.host, config.port, &config.uri).await?;
//! # Ok(())
//! # }
//! ```

// Re-export core types
pub use xiot_core::{Status, XiotError, XiotResult};
pub use xiot_core::{message::*, spec::*};

// Re-export security objects
pub mod security {
    pub use xiot_security::*;
}

// Re-export client boundary
pub mod xcp {
    pub use xiot_xcp::*;
}

// Re-export device handlers
pub mod device {
    pub use xiot_device::*;
}

// Re-export session adapter
pub mod service {
    pub use xiot_service::*;
}
