//! Protocol client trait
//!
//! The XCP client owns the socket, the cipher handshake, frame encoding and
//! the correlation of queries with their results. The session adapter only
//! sees this trait.
//!
//! # Inbound queries
//!
//! Queries sent by the server are decoded by the client and delivered
//! through the `QuerySender` registered for their method. A query whose
//! payload could not be decoded into a known shape still reaches the sender
//! registered for its method, as `QueryKind::Unknown`.

use async_trait::async_trait;
use tokio::sync::mpsc;
use xiot_core::{IqError, IqQuery, IqReply, IqResult, XiotResult};

/// Channel end the client pushes inbound queries into
pub type QuerySender = mpsc::UnboundedSender<IqQuery>;

/// Channel end the adapter reads inbound queries from
pub type QueryReceiver = mpsc::UnboundedReceiver<IqQuery>;

/// Create the channel pair used to route inbound queries
pub fn query_channel() -> (QuerySender, QueryReceiver) {
    mpsc::unbounded_channel()
}

/// Client side of an XCP session
#[async_trait]
pub trait XcpClient: Send + Sync {
    /// Device id assigned to this client
    fn device_id(&self) -> String;

    /// Next free query id
    fn next_id(&self) -> String;

    /// Route inbound queries with `method` to `sender`
    fn add_query_handler(&self, method: &str, sender: QuerySender);

    /// Connect to `host:port` and open the session at `uri`
    ///
    /// Resolves once the handshake has completed.
    async fn connect(&self, host: &str, port: u16, uri: &str) -> XiotResult<()>;

    /// Close the session; in-flight queries are left to the client
    fn disconnect(&self);

    /// Send a query and wait for the correlated result
    async fn send_query(&self, query: IqQuery) -> XiotResult<IqResult>;

    /// Answer an inbound query
    fn send_result(&self, reply: IqReply);

    /// Answer an inbound query with an error
    fn send_error(&self, error: IqError);
}
