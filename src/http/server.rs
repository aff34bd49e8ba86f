//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, body limit, panic capture)
//! - Own the substation pool and start the load sampler next to it
//! - Serve until the shutdown broadcast fires

use std::any::Any;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::RouterConfig;
use crate::http::client::{upstream_client, UpstreamClient};
use crate::http::handlers;
use crate::http::request::{MakeRequestUuid, X_REQUEST_ID};
use crate::lifecycle::Shutdown;
use crate::load_balancer::SubstationPool;
use crate::routing::{Forwarder, RouteError};
use crate::sampling::LoadSampler;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub pool: Arc<SubstationPool>,
    pub forwarder: Forwarder,
}

/// HTTP server for the substation router.
pub struct HttpServer {
    router: Router,
    config: RouterConfig,
    pool: Arc<SubstationPool>,
    client: UpstreamClient,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: RouterConfig) -> Self {
        let pool = Arc::new(SubstationPool::new(
            &config.substations,
            config.sampler.penalty_load,
        ));
        let client = upstream_client();

        let state = AppState {
            pool: pool.clone(),
            forwarder: Forwarder::new(client.clone(), &config.forward),
        };

        let router = Self::build_router(&config, state);
        Self {
            router,
            config,
            pool,
            client,
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &RouterConfig, state: AppState) -> Router {
        Router::new()
            .route("/route", post(handlers::route_request))
            .route("/status", get(handlers::status))
            .route("/health", get(handlers::health))
            .with_state(state)
            .layer(DefaultBodyLimit::max(config.listener.max_body_bytes))
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
                    .layer(CatchPanicLayer::custom(handle_panic)),
            )
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// The load sampler runs for as long as the server does.
    pub async fn run(self, listener: TcpListener, shutdown: Shutdown) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            substations = self.pool.len(),
            "HTTP server starting"
        );

        let sampler = LoadSampler::new(
            self.pool.clone(),
            self.config.sampler.clone(),
            self.client.clone(),
        )
        .spawn(shutdown.subscribe());

        let mut server_shutdown = shutdown.subscribe();
        let served = axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = server_shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await;

        if served.is_err() {
            sampler.abort();
        }
        if let Err(e) = sampler.await {
            if e.is_panic() {
                tracing::error!(error = %e, "Load sampler task panicked");
            }
        }
        served?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The substation pool (and its load table) this server routes over.
    pub fn pool(&self) -> &Arc<SubstationPool> {
        &self.pool
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }
}

/// Turn a handler panic into the generic internal-error envelope.
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");
    tracing::error!(panic = %detail, "Unexpected error in load balancer");
    RouteError::Internal(detail.to_string()).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn explode() -> &'static str {
        panic!("charge table corrupted")
    }

    #[tokio::test]
    async fn test_panic_becomes_internal_error_envelope() {
        let app = Router::new()
            .route("/boom", get(explode))
            .layer(CatchPanicLayer::custom(handle_panic));

        let response = app
            .oneshot(Request::get("/boom").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({"status": "error", "message": "Load balancer internal error"}));
    }

    #[tokio::test]
    async fn test_health_route() {
        let server = HttpServer::new(RouterConfig::default());
        let response = server
            .router
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({"status": "healthy", "service": "load_balancer"}));
    }

    #[tokio::test]
    async fn test_status_before_first_sample() {
        let server = HttpServer::new(RouterConfig::default());
        let response = server
            .router
            .oneshot(Request::get("/status").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({"substations": {}, "total_substations": 3}));
    }

    #[tokio::test]
    async fn test_malformed_payload_is_internal_error() {
        let server = HttpServer::new(RouterConfig::default());
        let response = server
            .router
            .oneshot(
                Request::post("/route")
                    .header("content-type", "application/json")
                    .body(Body::from("{\"vehicle_id\": "))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({"status": "error", "message": "Load balancer internal error"}));
    }

    #[tokio::test]
    async fn test_oversized_body_gets_error_envelope() {
        let mut config = RouterConfig::default();
        config.listener.max_body_bytes = 16;
        let server = HttpServer::new(config);
        let response = server
            .router
            .oneshot(
                Request::post("/route")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"vehicle_id": "EV_0001", "battery_level": 12}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({"status": "error", "message": "Load balancer internal error"}));
    }
}
