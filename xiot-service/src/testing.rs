//! Mocks and fixtures shared by the unit tests

use crate::config::DeviceIdentity;
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use mockall::mock;
use ring::signature::{Ed25519KeyPair, KeyPair};
use xiot_core::{ActionOperation, IqError, IqQuery, IqReply, IqResult, PropertyOperation, XiotResult};
use xiot_device::DeviceHandlers;
use xiot_xcp::{QuerySender, XcpClient};

mock! {
    pub Device {}

    impl DeviceHandlers for Device {
        fn get_property(&self, operation: &mut PropertyOperation);
        fn set_property(&self, operation: &mut PropertyOperation);
        fn invoke_action(&self, operation: &mut ActionOperation);
    }
}

mock! {
    pub Client {}

    #[async_trait]
    impl XcpClient for Client {
        fn device_id(&self) -> String;
        fn next_id(&self) -> String;
        fn add_query_handler(&self, method: &str, sender: QuerySender);
        async fn connect(&self, host: &str, port: u16, uri: &str) -> XiotResult<()>;
        fn disconnect(&self);
        async fn send_query(&self, query: IqQuery) -> XiotResult<IqResult>;
        fn send_result(&self, reply: IqReply);
        fn send_error(&self, error: IqError);
    }
}

fn public_key(seed: u8) -> String {
    let pair = Ed25519KeyPair::from_seed_unchecked(&[seed; 32]).unwrap();
    STANDARD.encode(pair.public_key().as_ref())
}

/// Identity with well-formed device and server keys
pub fn identity() -> DeviceIdentity {
    DeviceIdentity {
        serial_number: "sn-0001".to_string(),
        product_id: 100,
        product_version: 1,
        device_ltpk: public_key(1),
        device_ltsk: STANDARD.encode([1u8; 32]),
        server_ltpk: public_key(2),
    }
}
