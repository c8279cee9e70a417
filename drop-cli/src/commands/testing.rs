//! A relay on a loopback port for command tests.

use drop_client::RelayClient;
use drop_relay::{serve_with_shutdown, Config, DropRelay};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

pub(crate) struct LocalRelay {
    pub client: RelayClient,
    shutdown: oneshot::Sender<()>,
    server: JoinHandle<std::io::Result<()>>,
}

impl LocalRelay {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let relay = Arc::new(DropRelay::new(Config::default()));
        let (shutdown, rx) = oneshot::channel::<()>();
        let server = tokio::spawn(serve_with_shutdown(listener, relay, async {
            let _ = rx.await;
        }));

        Self {
            client: RelayClient::new(&url, false).unwrap(),
            shutdown,
            server,
        }
    }

    pub async fn stop(self) {
        let _ = self.shutdown.send(());
        self.server.await.unwrap().unwrap();
    }
}
