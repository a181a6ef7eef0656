//! Client construction
//!
//! The adapter builds the cipher and picks the codec, then hands both to a
//! factory together with the product identity. Which concrete client comes
//! out is up to the factory.

use crate::client::XcpClient;
use std::sync::Arc;
use xiot_core::XiotResult;
use xiot_security::{FrameCodecType, ProductCipher};

/// Everything a client needs to be created
#[derive(Debug, Clone)]
pub struct ClientSpec {
    pub serial_number: String,
    pub product_id: u32,
    pub product_version: u32,
    pub cipher: ProductCipher,
    pub codec: FrameCodecType,
}

/// Builds protocol clients
pub trait ClientFactory {
    fn create(&self, spec: ClientSpec) -> XiotResult<Arc<dyn XcpClient>>;
}

impl<F> ClientFactory for F
where
    F: Fn(ClientSpec) -> XiotResult<Arc<dyn XcpClient>>,
{
    fn create(&self, spec: ClientSpec) -> XiotResult<Arc<dyn XcpClient>> {
        self(spec)
    }
}
