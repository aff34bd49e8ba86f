//! Response envelopes.
//!
//! Every `/route` outcome is a JSON object with an explicit `status` field:
//! `"success"` with the substation's body nested, or `"error"` with a message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::load_balancer::LoadSnapshot;
use crate::routing::RouteError;

/// Successful routing result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SuccessEnvelope {
    pub status: String,
    pub assigned_substation: String,
    pub substation_response: Value,
}

impl SuccessEnvelope {
    pub fn new(assigned_substation: impl Into<String>, substation_response: Value) -> Self {
        Self {
            status: "success".to_string(),
            assigned_substation: assigned_substation.into(),
            substation_response,
        }
    }
}

impl IntoResponse for SuccessEnvelope {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Failed routing result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorEnvelope {
    pub status: String,
    pub message: String,
}

impl ErrorEnvelope {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
        }
    }
}

impl IntoResponse for RouteError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(ErrorEnvelope::new(self.public_message()))).into_response()
    }
}

/// `/status` body.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub substations: LoadSnapshot,
    pub total_substations: usize,
}

/// `/health` body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthReport {
    pub status: String,
    pub service: String,
}

impl Default for HealthReport {
    fn default() -> Self {
        Self {
            status: "healthy".to_string(),
            service: "load_balancer".to_string(),
        }
    }
}
