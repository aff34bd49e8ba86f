//! Request forwarding.
//!
//! # Responsibilities
//! - Decode the caller's payload (empty body means `{}`)
//! - Deliver it to the chosen substation's work endpoint, once
//! - Classify the result: success body, rejected, unreachable, timed out
//!   (an oversized success body is an internal error, not a connectivity fault)
//!
//! # Design Decisions
//! - Exactly one attempt per request; no retry and no second substation
//! - The deadline covers connect, response head and response body
//! - Payload and response are opaque JSON values

use std::time::Duration;

use axum::body::Body;
use axum::http::{
    header::{CONTENT_TYPE, USER_AGENT},
    Method, Request,
};
use http_body_util::{BodyExt, LengthLimitError, Limited};
use serde_json::{Map, Value};
use tokio::time;

use crate::config::ForwardConfig;
use crate::http::client::UpstreamClient;
use crate::http::request::X_REQUEST_ID;
use crate::load_balancer::Substation;
use crate::routing::error::RouteError;

/// Forwards work payloads to substations.
#[derive(Clone)]
pub struct Forwarder {
    client: UpstreamClient,
    path: String,
    timeout: Duration,
    max_response_bytes: usize,
}

impl Forwarder {
    pub fn new(client: UpstreamClient, config: &ForwardConfig) -> Self {
        Self {
            client,
            path: config.path.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
            max_response_bytes: config.max_response_bytes,
        }
    }

    /// Deliver `payload` to `substation` and return its response body.
    pub async fn forward(
        &self,
        substation: &Substation,
        payload: &Value,
        request_id: &str,
    ) -> Result<Value, RouteError> {
        let uri = substation
            .endpoint(&self.path)
            .map_err(|e| RouteError::Internal(format!("invalid forward uri: {}", e)))?;
        let body = serde_json::to_vec(payload)
            .map_err(|e| RouteError::Internal(format!("payload encoding failed: {}", e)))?;
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .header(USER_AGENT, "substation-router")
            .header(X_REQUEST_ID, request_id)
            .body(Body::from(body))
            .map_err(|e| RouteError::Internal(format!("failed to build forward request: {}", e)))?;

        let exchange = async {
            let response = self.client.request(request).await.map_err(|e| RouteError::Unreachable {
                substation: substation.name.clone(),
                reason: e.to_string(),
            })?;

            let status = response.status();
            if !status.is_success() {
                return Err(RouteError::Rejected {
                    substation: substation.name.clone(),
                    status,
                });
            }

            let bytes = Limited::new(response.into_body(), self.max_response_bytes)
                .collect()
                .await
                .map_err(|e| {
                    if e.is::<LengthLimitError>() {
                        RouteError::Internal(format!(
                            "substation {} response exceeds {} bytes",
                            substation.name, self.max_response_bytes
                        ))
                    } else {
                        RouteError::Unreachable {
                            substation: substation.name.clone(),
                            reason: format!("failed to read response body: {}", e),
                        }
                    }
                })?
                .to_bytes();
            Ok(decode_response(&bytes))
        };

        match time::timeout(self.timeout, exchange).await {
            Ok(result) => result,
            Err(_) => Err(RouteError::TimedOut {
                substation: substation.name.clone(),
                timeout: self.timeout,
            }),
        }
    }
}

/// Decode an inbound body. Empty, whitespace-only and `null` bodies become `{}`.
pub fn decode_payload(body: &[u8]) -> Result<Value, RouteError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Map::new()));
    }
    match serde_json::from_slice(body) {
        Ok(Value::Null) => Ok(Value::Object(Map::new())),
        Ok(value) => Ok(value),
        Err(e) => Err(RouteError::InvalidPayload(e.to_string())),
    }
}

/// Decode a substation response body for nesting in the success envelope.
///
/// JSON bodies pass through as-is; an empty body is `null`; anything else is
/// nested as a string.
pub fn decode_response(body: &[u8]) -> Value {
    if body.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(body)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).into_owned()))
}
