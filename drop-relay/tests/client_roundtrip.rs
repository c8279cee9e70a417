//! End-to-end tests: a real relay on a loopback socket driven by the client.

use drop_client::{ClientError, RelayClient, Secret};
use drop_relay::{serve_with_shutdown, Config, DropRelay};
use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

struct TestRelay {
    url: String,
    relay: Arc<DropRelay>,
    shutdown: Option<oneshot::Sender<()>>,
    server: Option<JoinHandle<std::io::Result<()>>>,
}

impl TestRelay {
    async fn start(config: Config) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let relay = Arc::new(DropRelay::new(config));
        let (tx, rx) = oneshot::channel::<()>();

        let server = tokio::spawn(serve_with_shutdown(listener, Arc::clone(&relay), async {
            let _ = rx.await;
        }));

        Self {
            url: format!("http://{addr}"),
            relay,
            shutdown: Some(tx),
            server: Some(server),
        }
    }

    fn client(&self) -> RelayClient {
        RelayClient::new(&self.url, false).unwrap()
    }

    async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(server) = self.server.take() {
            tokio::time::timeout(Duration::from_secs(5), server)
                .await
                .expect("relay should shut down")
                .unwrap()
                .unwrap();
        }
    }
}

fn payload(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 31 % 256) as u8).collect()
}

#[tokio::test]
async fn file_round_trips_through_the_relay() {
    let relay = TestRelay::start(Config::default()).await;
    let client = relay.client();
    let data = payload(3 * 1024 * 1024 + 17);

    let pending = client.offer("holiday.tar").await.unwrap();
    let secret = pending.secret().clone();
    assert_eq!(secret.as_str().split('-').count(), 3);

    let sender = tokio::spawn(pending.send(Cursor::new(data.clone())));

    let incoming = client.receive(&secret).await.unwrap();
    assert_eq!(incoming.suggested_filename(), "holiday.tar");
    assert_eq!(incoming.safe_filename().unwrap(), "holiday.tar");

    let mut received = Vec::new();
    let written = incoming.write_to(&mut received).await.unwrap();

    sender.await.unwrap().unwrap();
    assert_eq!(written, data.len() as u64);
    assert_eq!(received, data);

    relay.stop().await;
}

#[tokio::test]
async fn receiver_can_arrive_before_the_upload() {
    let relay = TestRelay::start(Config::default()).await;
    let client = relay.client();

    let pending = client.offer("early.txt").await.unwrap();
    let secret = pending.secret().clone();

    let receiver = {
        let client = client.clone();
        tokio::spawn(async move {
            let incoming = client.receive(&secret).await?;
            let mut out = Vec::new();
            incoming.write_to(&mut out).await?;
            Ok::<_, ClientError>(out)
        })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;

    pending.send(Cursor::new(b"patience".to_vec())).await.unwrap();
    assert_eq!(receiver.await.unwrap().unwrap(), b"patience");

    relay.stop().await;
}

#[tokio::test]
async fn file_lands_on_disk_under_a_safe_name() {
    let relay = TestRelay::start(Config::default()).await;
    let client = relay.client();
    let src_dir = tempfile::tempdir().unwrap();
    let dst_dir = tempfile::tempdir().unwrap();

    let src_path = src_dir.path().join("report.csv");
    let data = payload(200_000);
    tokio::fs::write(&src_path, &data).await.unwrap();

    let pending = client.offer("../../reports/report.csv").await.unwrap();
    let secret = pending.secret().clone();
    let file = tokio::fs::File::open(&src_path).await.unwrap();
    let sender = tokio::spawn(pending.send(file));

    let incoming = client.receive(&secret).await.unwrap();
    assert_eq!(incoming.suggested_filename(), "../../reports/report.csv");
    let name = incoming.safe_filename().unwrap();
    assert_eq!(name, "report.csv");

    let dst_path = dst_dir.path().join(&name);
    let mut out = tokio::fs::File::create(&dst_path).await.unwrap();
    incoming.write_to(&mut out).await.unwrap();
    drop(out);
    sender.await.unwrap().unwrap();

    assert_eq!(tokio::fs::read(&dst_path).await.unwrap(), data);

    relay.stop().await;
}

#[tokio::test]
async fn wrong_secret_is_not_found() {
    let relay = TestRelay::start(Config::default()).await;
    let client = relay.client();
    let _pending = client.offer("real.txt").await.unwrap();

    let guess = Secret::parse("not-the-secret").unwrap();
    let err = client.receive(&guess).await.unwrap_err();
    assert!(matches!(err, ClientError::NotFound), "got {err:?}");

    relay.stop().await;
}

#[tokio::test]
async fn used_secret_is_not_found() {
    let relay = TestRelay::start(Config::default()).await;
    let client = relay.client();

    let pending = client.offer("once.txt").await.unwrap();
    let secret = pending.secret().clone();
    let sender = tokio::spawn(pending.send(Cursor::new(b"one time".to_vec())));
    let incoming = client.receive(&secret).await.unwrap();
    incoming.write_to(&mut Vec::new()).await.unwrap();
    sender.await.unwrap().unwrap();

    let err = client.receive(&secret).await.unwrap_err();
    assert!(matches!(err, ClientError::NotFound), "got {err:?}");
    assert_eq!(relay.relay.offers_active(), 0);

    relay.stop().await;
}

#[tokio::test]
async fn upload_without_receiver_times_out() {
    let mut config = Config::default();
    config.offers.timeout_secs = 1;
    let relay = TestRelay::start(config).await;
    let client = relay.client();

    let pending = client.offer("unwanted.txt").await.unwrap();
    let secret = pending.secret().clone();

    let err = pending
        .send(Cursor::new(b"hello?".to_vec()))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::NoReceiver), "got {err:?}");

    let err = client.receive(&secret).await.unwrap_err();
    assert!(matches!(err, ClientError::NotFound), "got {err:?}");

    relay.stop().await;
}

#[tokio::test]
async fn three_concurrent_transfers_stay_separate() {
    let relay = TestRelay::start(Config::default()).await;
    let client = relay.client();

    let mut transfers = Vec::new();
    for i in 0..3usize {
        let name = format!("part-{i}.bin");
        let data = vec![i as u8; 100_000 + i * 1000];
        let pending = client.offer(&name).await.unwrap();
        let secret = pending.secret().clone();
        let sender = tokio::spawn(pending.send(Cursor::new(data.clone())));
        transfers.push((name, data, secret, sender));
    }

    // Receive in reverse order to rule out accidental FIFO pairing.
    for (name, data, secret, sender) in transfers.into_iter().rev() {
        let incoming = client.receive(&secret).await.unwrap();
        assert_eq!(incoming.suggested_filename(), name);
        let mut out = Vec::new();
        incoming.write_to(&mut out).await.unwrap();
        sender.await.unwrap().unwrap();
        assert_eq!(out, data);
    }

    relay.stop().await;
}

#[tokio::test]
async fn shutdown_releases_a_waiting_receiver() {
    let relay = TestRelay::start(Config::default()).await;
    let client = relay.client();

    let pending = client.offer("never-sent.txt").await.unwrap();
    let secret = pending.secret().clone();
    let receiver = tokio::spawn(async move { client.receive(&secret).await.map(|_| ()) });
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(relay.relay.offer_counts().pending, 1);

    // The offer would otherwise keep the server up for its full timeout.
    let started = tokio::time::Instant::now();
    relay.stop().await;
    assert!(started.elapsed() < Duration::from_secs(5));

    let err = receiver.await.unwrap().unwrap_err();
    assert!(matches!(err, ClientError::NotFound), "got {err:?}");
}
