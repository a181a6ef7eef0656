//! XCP protocol client boundary
//!
//! This crate defines the interface of the protocol client a device
//! session runs on (`XcpClient`) and how one is created (`ClientFactory`).
//! Connection handling, the cipher handshake, frame encoding and query
//! correlation are the client implementation's business.

pub mod client;
pub mod factory;

pub use client::{QueryReceiver, QuerySender, XcpClient, query_channel};
pub use factory::{ClientFactory, ClientSpec};
