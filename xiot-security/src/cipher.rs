//! Product cipher for the client side of a session
//!
//! The cipher binds the product identity to the device key material and
//! the server's long-term public key. The protocol client drives the actual
//! key exchange with it; this type only holds and checks the inputs.

use crate::key::{KEY_LENGTH, LtskGetter, decode_base64};
use ring::signature::{ED25519, UnparsedPublicKey};
use std::sync::Arc;
use xiot_core::{XiotError, XiotResult};

/// Decode the base64 server long-term public key
pub fn decode_server_key(service_key: &str) -> XiotResult<Vec<u8>> {
    let key = decode_base64("server LTPK", service_key)?;
    if key.len() != KEY_LENGTH {
        return Err(XiotError::InvalidKey(format!(
            "server LTPK must be {} bytes, got {}",
            KEY_LENGTH,
            key.len()
        )));
    }
    Ok(key)
}

/// Client cipher keyed by product identity
#[derive(Debug, Clone)]
pub struct ProductCipher {
    product_id: u32,
    product_version: u32,
    key_getter: Arc<dyn LtskGetter>,
    server_ltpk: Vec<u8>,
}

impl ProductCipher {
    /// Create a product cipher
    ///
    /// # Errors
    /// Returns `InvalidKey` if `server_ltpk` is not a 32-byte key
    pub fn new(
        product_id: u32,
        product_version: u32,
        key_getter: Arc<dyn LtskGetter>,
        server_ltpk: Vec<u8>,
    ) -> XiotResult<Self> {
        if server_ltpk.len() != KEY_LENGTH {
            return Err(XiotError::InvalidKey(format!(
                "server LTPK must be {} bytes, got {}",
                KEY_LENGTH,
                server_ltpk.len()
            )));
        }

        Ok(Self {
            product_id,
            product_version,
            key_getter,
            server_ltpk,
        })
    }

    pub fn product_id(&self) -> u32 {
        self.product_id
    }

    pub fn product_version(&self) -> u32 {
        self.product_version
    }

    pub fn key_getter(&self) -> &Arc<dyn LtskGetter> {
        &self.key_getter
    }

    pub fn server_ltpk(&self) -> &[u8] {
        &self.server_ltpk
    }

    /// Sign handshake data with the device key
    pub fn sign(&self, message: &[u8]) -> XiotResult<Vec<u8>> {
        self.key_getter.sign(message)
    }

    /// Check a signature produced by the server's long-term key
    pub fn verify_server_signature(&self, message: &[u8], signature: &[u8]) -> XiotResult<()> {
        UnparsedPublicKey::new(&ED25519, &self.server_ltpk)
            .verify(message, signature)
            .map_err(|_| XiotError::Protocol("server signature verification failed".to_string()))
    }
}
