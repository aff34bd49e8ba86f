//! Request handlers.
//!
//! - `POST /route`: select a substation and forward the payload to it
//! - `GET /status`: current loads and substation count
//! - `GET /health`: liveness

use std::time::Instant;

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    Json,
};

use crate::http::request::request_id;
use crate::http::response::{HealthReport, StatusReport, SuccessEnvelope};
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::routing::{decode_payload, RouteError};

/// Route one work request to the least-loaded substation.
pub async fn route_request(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let start_time = Instant::now();
    let request_id = request_id(&headers);

    // an unreadable body (e.g. over the size limit) still gets the JSON envelope
    let payload = match body
        .map_err(|e| RouteError::InvalidPayload(e.body_text()))
        .and_then(|body| decode_payload(&body))
    {
        Ok(payload) => payload,
        Err(e) => {
            tracing::warn!(request_id = %request_id, error = %e, "Rejecting request payload");
            metrics::record_request(e.outcome(), "", start_time);
            return e.into_response();
        }
    };

    let selection = match state.pool.pick() {
        Some(selection) => selection,
        None => {
            let e = RouteError::NoSubstation;
            tracing::error!(request_id = %request_id, error = %e, "Unexpected error in load balancer");
            metrics::record_request(e.outcome(), "", start_time);
            return e.into_response();
        }
    };
    let name = selection.substation.name.as_str();

    tracing::info!(request_id = %request_id, substation = %name, "Routing request");

    match state
        .forwarder
        .forward(&selection.substation, &payload, &request_id)
        .await
    {
        Ok(response) => {
            metrics::record_request("success", name, start_time);
            SuccessEnvelope::new(name, response).into_response()
        }
        Err(e) => {
            match &e {
                RouteError::Rejected { .. } => {
                    tracing::error!(request_id = %request_id, substation = %name, error = %e, "Substation returned error")
                }
                RouteError::Unreachable { .. } | RouteError::TimedOut { .. } => {
                    tracing::error!(request_id = %request_id, substation = %name, error = %e, "Connection error to substation")
                }
                _ => tracing::error!(request_id = %request_id, error = %e, "Unexpected error in load balancer"),
            }
            metrics::record_request(e.outcome(), name, start_time);
            e.into_response()
        }
    }
}

/// Current load table and substation count.
pub async fn status(State(state): State<AppState>) -> Json<StatusReport> {
    Json(StatusReport {
        substations: state.pool.snapshot(),
        total_substations: state.pool.len(),
    })
}

pub async fn health() -> Json<HealthReport> {
    Json(HealthReport::default())
}
