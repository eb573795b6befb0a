//! Mock alert receiver that records every notification posted to it

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::{Router, routing};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

/// Notification as received, with the request headers it arrived with
#[derive(Debug, Clone)]
pub struct Received {
    pub headers: HeaderMap,
    /// Payload exactly as sent
    pub raw: String,
    pub body: Value,
}

impl Received {
    /// Field of the notification as a string
    pub fn field(&self, key: &str) -> &str {
        self.body[key].as_str().unwrap_or_default()
    }

    /// Field of the notification that holds JSON text, parsed
    pub fn json_field(&self, key: &str) -> Value {
        serde_json::from_str(self.field(key)).unwrap_or(Value::Null)
    }
}

/// Mock webhook endpoint
pub struct MockReceiver {
    addr: SocketAddr,
    shutdown: CancellationToken,
    received: Arc<Mutex<Vec<Received>>>,
}

impl MockReceiver {
    /// Start the receiver, returning immediately
    pub async fn start() -> anyhow::Result<Self> {
        let received = Arc::new(Mutex::new(Vec::new()));

        let app = Router::new()
            .route("/alerts", routing::post(handle_alert))
            .with_state(Arc::clone(&received));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, received })
    }

    /// URL to configure as the webhook target
    pub fn url(&self) -> String {
        format!("http://{}/alerts", self.addr)
    }

    /// Notifications received so far
    pub fn received(&self) -> Vec<Received> {
        self.received.lock().unwrap().clone()
    }

    /// Wait until at least `count` notifications arrived or two seconds pass
    pub async fn wait_for(&self, count: usize) -> Vec<Received> {
        for _ in 0..200 {
            let received = self.received();
            if received.len() >= count {
                return received;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        self.received()
    }
}

impl Drop for MockReceiver {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn handle_alert(State(received): State<Arc<Mutex<Vec<Received>>>>, headers: HeaderMap, raw: String) -> StatusCode {
    let Ok(body) = serde_json::from_str(&raw) else {
        return StatusCode::BAD_REQUEST;
    };

    received.lock().unwrap().push(Received { headers, raw, body });
    StatusCode::NO_CONTENT
}
