//! Security module for xiot device sessions
//!
//! This crate holds the device key material, the product cipher handed to
//! the protocol client, and the frame codec selector.

pub mod cipher;
pub mod codec;
pub mod key;

pub use cipher::{ProductCipher, decode_server_key};
pub use codec::FrameCodecType;
pub use key::{DeviceKeyPair, LtskGetter};
