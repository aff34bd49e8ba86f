//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde_json::Value;
use tokio::net::TcpListener;

use substation_router::config::{RouterConfig, SubstationConfig};
use substation_router::{HttpServer, Shutdown};

/// What a mock substation answers.
#[derive(Debug, Clone)]
pub struct Behavior {
    pub metrics_status: u16,
    pub metrics_body: String,
    pub metrics_delay: Duration,
    pub charge_status: u16,
    pub charge_body: String,
    pub charge_delay: Duration,
}

impl Behavior {
    /// Healthy substation reporting `load`.
    pub fn with_load(load: f64) -> Self {
        Self {
            metrics_status: 200,
            metrics_body: metrics_text(load),
            metrics_delay: Duration::ZERO,
            charge_status: 200,
            charge_body: r#"{"ok": true}"#.to_string(),
            charge_delay: Duration::ZERO,
        }
    }
}

pub fn metrics_text(load: f64) -> String {
    format!(
        "# HELP substation_current_load Current load\n\
         # TYPE substation_current_load gauge\n\
         substation_active_sessions 4\n\
         substation_current_load {}\n",
        load
    )
}

#[derive(Default)]
struct Recorded {
    charges: AtomicUsize,
    last_payload: Mutex<Option<Value>>,
    last_request_id: Mutex<Option<String>>,
}

#[derive(Clone)]
struct MockState {
    behavior: Arc<Mutex<Behavior>>,
    recorded: Arc<Recorded>,
}

/// A running mock substation.
pub struct MockSubstation {
    pub addr: SocketAddr,
    behavior: Arc<Mutex<Behavior>>,
    recorded: Arc<Recorded>,
}

impl MockSubstation {
    pub async fn start(behavior: Behavior) -> Self {
        let state = MockState {
            behavior: Arc::new(Mutex::new(behavior)),
            recorded: Arc::new(Recorded::default()),
        };
        let app = Router::new()
            .route("/metrics", get(metrics_handler))
            .route("/charge", post(charge_handler))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            addr,
            behavior: state.behavior,
            recorded: state.recorded,
        }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn update(&self, f: impl FnOnce(&mut Behavior)) {
        let mut behavior = self.behavior.lock().unwrap();
        f(&mut *behavior);
    }

    pub fn charges(&self) -> usize {
        self.recorded.charges.load(Ordering::SeqCst)
    }

    pub fn last_payload(&self) -> Option<Value> {
        self.recorded.last_payload.lock().unwrap().clone()
    }

    pub fn last_request_id(&self) -> Option<String> {
        self.recorded.last_request_id.lock().unwrap().clone()
    }
}

async fn metrics_handler(State(state): State<MockState>) -> impl IntoResponse {
    let behavior = state.behavior.lock().unwrap().clone();
    tokio::time::sleep(behavior.metrics_delay).await;
    (
        StatusCode::from_u16(behavior.metrics_status).unwrap(),
        behavior.metrics_body,
    )
}

async fn charge_handler(
    State(state): State<MockState>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let behavior = state.behavior.lock().unwrap().clone();
    state.recorded.charges.fetch_add(1, Ordering::SeqCst);
    *state.recorded.last_payload.lock().unwrap() = serde_json::from_slice(&body).ok();
    *state.recorded.last_request_id.lock().unwrap() = headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    tokio::time::sleep(behavior.charge_delay).await;
    (
        StatusCode::from_u16(behavior.charge_status).unwrap(),
        [(header::CONTENT_TYPE, "application/json")],
        behavior.charge_body,
    )
}

/// An address nothing is listening on.
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Router config over `substations` (name, url) with sampling disabled.
pub fn router_config(substations: &[(&str, String)]) -> RouterConfig {
    let mut config = RouterConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.substations = substations
        .iter()
        .map(|(name, url)| SubstationConfig {
            name: name.to_string(),
            url: url.clone(),
        })
        .collect();
    config.sampler.enabled = false;
    config
}

/// Start the router on an ephemeral port.
pub async fn start_router(config: RouterConfig) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server = HttpServer::new(config);
    let server_shutdown = shutdown.clone();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });
    (addr, shutdown)
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
