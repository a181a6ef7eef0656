//! Connected-session resources
//!
//! While connected, the adapter runs two tasks: the keepalive ticker and the
//! inbound query dispatcher. `ConnectedSession` owns both and aborts them
//! when dropped, so leaving the connected state is just dropping it.

use crate::dispatch::{deliver, dispatch};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use xiot_core::{IqQuery, QueryKind};
use xiot_device::DeviceHandlers;
use xiot_xcp::{QueryReceiver, XcpClient};

/// Default period between keepalive pings
pub const KEEPALIVE_INTERVAL: Duration = Duration::from_secs(30);

/// Receiver shared across successive connected sessions
pub(crate) type SharedReceiver = Arc<Mutex<QueryReceiver>>;

pub(crate) struct ConnectedSession {
    keepalive: JoinHandle<()>,
    dispatcher: JoinHandle<()>,
}

impl ConnectedSession {
    /// Spawn the keepalive and dispatcher tasks; needs a tokio runtime
    pub(crate) fn start(
        client: Arc<dyn XcpClient>,
        device: Arc<dyn DeviceHandlers>,
        inbound: SharedReceiver,
        period: Duration,
    ) -> Self {
        let keepalive = tokio::spawn(keepalive(client.clone(), period));
        let dispatcher = tokio::spawn(serve(client, device, inbound));
        Self {
            keepalive,
            dispatcher,
        }
    }
}

impl Drop for ConnectedSession {
    fn drop(&mut self) {
        self.keepalive.abort();
        self.dispatcher.abort();
    }
}

/// Ping every `period`, first ping one period after start
///
/// Each ping runs as its own task so a slow pong never delays the next
/// tick. A ping still in flight when the session ends completes on its
/// own and only logs.
async fn keepalive(client: Arc<dyn XcpClient>, period: Duration) {
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let failures = Arc::new(AtomicU32::new(0));

    loop {
        ticker.tick().await;
        tokio::spawn(ping(client.clone(), failures.clone()));
    }
}

async fn ping(client: Arc<dyn XcpClient>, failures: Arc<AtomicU32>) {
    let query = IqQuery::new(client.next_id(), QueryKind::Ping);
    match client.send_query(query).await {
        Ok(pong) => {
            failures.store(0, Ordering::Relaxed);
            log::debug!("recv pong: {}", pong.id);
        }
        Err(e) => {
            let failed = failures.fetch_add(1, Ordering::Relaxed) + 1;
            log::warn!("ping failed ({} in a row): {}", failed, e);
        }
    }
}

async fn serve(
    client: Arc<dyn XcpClient>,
    device: Arc<dyn DeviceHandlers>,
    inbound: SharedReceiver,
) {
    let mut queries = inbound.lock().await;
    while let Some(query) = queries.recv().await {
        log::debug!("recv query {} ({})", query.id, query.method());
        let outbound = dispatch(device.as_ref(), query);
        deliver(client.as_ref(), outbound);
    }
    log::debug!("inbound query channel closed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockClient, MockDevice};
    use std::sync::atomic::AtomicUsize;
    use xiot_core::{IqResult, OperationStatus, ResultKind, XiotError};
    use xiot_xcp::query_channel;

    fn counting_client(pings: Arc<AtomicUsize>, fail: bool) -> MockClient {
        let mut client = MockClient::new();
        client.expect_next_id().returning(|| "7".to_string());
        client
            .expect_send_query()
            .withf(|query| query.kind == QueryKind::Ping)
            .returning(move |query| {
                pings.fetch_add(1, Ordering::SeqCst);
                if fail {
                    Err(XiotError::Timeout)
                } else {
                    Ok(IqResult::new(query.id, ResultKind::Pong))
                }
            });
        client
    }

    fn start(client: MockClient, device: MockDevice) -> (ConnectedSession, xiot_xcp::QuerySender) {
        let (tx, rx) = query_channel();
        let session = ConnectedSession::start(
            Arc::new(client),
            Arc::new(device),
            Arc::new(Mutex::new(rx)),
            KEEPALIVE_INTERVAL,
        );
        (session, tx)
    }

    #[tokio::test(start_paused = true)]
    async fn test_keepalive_pings_every_period() {
        let pings = Arc::new(AtomicUsize::new(0));
        let (session, _tx) = start(counting_client(pings.clone(), false), MockDevice::new());

        time::sleep(Duration::from_secs(29)).await;
        assert_eq!(pings.load(Ordering::SeqCst), 0);

        time::sleep(Duration::from_secs(32)).await;
        assert_eq!(pings.load(Ordering::SeqCst), 2);

        drop(session);
        time::sleep(Duration::from_secs(120)).await;
        assert_eq!(pings.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_keepalive_failures_do_not_stop_pinging() {
        let pings = Arc::new(AtomicUsize::new(0));
        let (_session, _tx) = start(counting_client(pings.clone(), true), MockDevice::new());

        time::sleep(Duration::from_secs(91)).await;
        assert_eq!(pings.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_dispatcher_answers_inbound_queries() {
        let errors = Arc::new(AtomicUsize::new(0));
        let mut client = MockClient::new();
        let seen = errors.clone();
        client
            .expect_send_error()
            .withf(|error| error.id == "40" && error.status == OperationStatus::Undefined)
            .returning(move |_| {
                seen.fetch_add(1, Ordering::SeqCst);
            });

        let (_session, tx) = start(client, MockDevice::new());
        tx.send(IqQuery::new("40", QueryKind::Ping)).unwrap();

        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert_eq!(errors.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_receiver_reused_after_restart() {
        let results = Arc::new(AtomicUsize::new(0));
        let mut client = MockClient::new();
        let seen = results.clone();
        client.expect_send_error().returning(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        let client: Arc<dyn XcpClient> = Arc::new(client);
        let device: Arc<dyn DeviceHandlers> = Arc::new(MockDevice::new());
        let (tx, rx) = query_channel();
        let inbound = Arc::new(Mutex::new(rx));

        let first = ConnectedSession::start(client.clone(), device.clone(), inbound.clone(), KEEPALIVE_INTERVAL);
        drop(first);
        let _second = ConnectedSession::start(client, device, inbound, KEEPALIVE_INTERVAL);

        tx.send(IqQuery::new("41", QueryKind::Ping)).unwrap();
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert_eq!(results.load(Ordering::SeqCst), 1);
    }
}
