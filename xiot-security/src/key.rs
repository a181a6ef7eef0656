//! Device long-term key material
//!
//! A device is provisioned with an Ed25519 key pair: the long-term public
//! key (LTPK) and the long-term secret key (LTSK). Both arrive base64
//! encoded. The LTSK is either the 32-byte seed or the 64-byte
//! `seed || public key` form; in the latter case the trailing half must be
//! the LTPK.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use ring::signature::{Ed25519KeyPair, KeyPair};
use std::fmt;
use xiot_core::{XiotError, XiotResult};

/// Length of an Ed25519 public key or seed in bytes
pub const KEY_LENGTH: usize = 32;

/// Source of the device's long-term keys, consumed by the product cipher
pub trait LtskGetter: Send + Sync + fmt::Debug {
    /// Device long-term public key
    fn device_ltpk(&self) -> &[u8];

    /// Device long-term secret key (seed)
    fn device_ltsk(&self) -> &[u8];

    /// Sign `message` with the device's long-term secret key
    fn sign(&self, message: &[u8]) -> XiotResult<Vec<u8>>;
}

/// Decode a base64 string, naming the key in the error
pub fn decode_base64(name: &str, encoded: &str) -> XiotResult<Vec<u8>> {
    STANDARD
        .decode(encoded.trim())
        .map_err(|e| XiotError::InvalidKey(format!("{} is not valid base64: {}", name, e)))
}

/// Device key pair built from base64 LTPK/LTSK strings
pub struct DeviceKeyPair {
    ltpk: Vec<u8>,
    ltsk: Vec<u8>,
    key_pair: Ed25519KeyPair,
}

impl DeviceKeyPair {
    /// Create a key pair from base64 encoded keys
    ///
    /// # Errors
    /// Returns `InvalidKey` if either key is not base64, has the wrong
    /// length, or the public key does not belong to the secret key.
    pub fn new(device_ltpk: &str, device_ltsk: &str) -> XiotResult<Self> {
        let ltpk = decode_base64("device LTPK", device_ltpk)?;
        let mut ltsk = decode_base64("device LTSK", device_ltsk)?;

        if ltpk.len() != KEY_LENGTH {
            return Err(XiotError::InvalidKey(format!(
                "device LTPK must be {} bytes, got {}",
                KEY_LENGTH,
                ltpk.len()
            )));
        }

        match ltsk.len() {
            KEY_LENGTH => {}
            len if len == KEY_LENGTH * 2 => {
                if ltsk[KEY_LENGTH..] != ltpk[..] {
                    return Err(XiotError::InvalidKey(
                        "device LTSK does not embed the device LTPK".to_string(),
                    ));
                }
                ltsk.truncate(KEY_LENGTH);
            }
            len => {
                return Err(XiotError::InvalidKey(format!(
                    "device LTSK must be {} or {} bytes, got {}",
                    KEY_LENGTH,
                    KEY_LENGTH * 2,
                    len
                )));
            }
        }

        let key_pair = Ed25519KeyPair::from_seed_and_public_key(&ltsk, &ltpk)
            .map_err(|e| XiotError::InvalidKey(format!("device key pair rejected: {}", e)))?;

        Ok(Self {
            ltpk,
            ltsk,
            key_pair,
        })
    }

    /// Public key as reported by the underlying key pair
    pub fn public_key(&self) -> &[u8] {
        self.key_pair.public_key().as_ref()
    }
}

impl LtskGetter for DeviceKeyPair {
    fn device_ltpk(&self) -> &[u8] {
        &self.ltpk
    }

    fn device_ltsk(&self) -> &[u8] {
        &self.ltsk
    }

    fn sign(&self, message: &[u8]) -> XiotResult<Vec<u8>> {
        Ok(self.key_pair.sign(message).as_ref().to_vec())
    }
}

impl fmt::Debug for DeviceKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceKeyPair")
            .field("ltpk", &STANDARD.encode(&self.ltpk))
            .finish_non_exhaustive()
    }
}
