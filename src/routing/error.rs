//! Routing error taxonomy.

use std::time::Duration;

use axum::http::StatusCode;
use thiserror::Error;

/// Everything that can end a routing request without a success envelope.
#[derive(Debug, Error)]
pub enum RouteError {
    /// The chosen substation answered with a non-success status.
    #[error("substation {substation} answered with status {status}")]
    Rejected {
        substation: String,
        status: StatusCode,
    },

    /// The chosen substation could not be reached.
    #[error("substation {substation} unreachable: {reason}")]
    Unreachable { substation: String, reason: String },

    /// The chosen substation did not answer within the forward deadline.
    #[error("substation {substation} did not answer within {timeout:?}")]
    TimedOut {
        substation: String,
        timeout: Duration,
    },

    /// The caller's body could not be read or is not valid JSON.
    /// Reported to the caller as an internal error.
    #[error("invalid request payload: {0}")]
    InvalidPayload(String),

    /// The pool has no substation to route to.
    #[error("no substation available for selection")]
    NoSubstation,

    /// Anything else.
    #[error("internal error: {0}")]
    Internal(String),
}

impl RouteError {
    /// HTTP status the caller receives.
    pub fn status_code(&self) -> StatusCode {
        match self {
            RouteError::Rejected { .. } => StatusCode::BAD_GATEWAY,
            RouteError::Unreachable { .. } | RouteError::TimedOut { .. } => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            RouteError::InvalidPayload(_) | RouteError::NoSubstation | RouteError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message the caller receives. Never carries internal detail.
    pub fn public_message(&self) -> String {
        match self {
            RouteError::Rejected { substation, .. } => format!("Substation {} unavailable", substation),
            RouteError::Unreachable { .. } | RouteError::TimedOut { .. } => {
                "Selected substation temporarily unavailable".to_string()
            }
            RouteError::InvalidPayload(_) | RouteError::NoSubstation | RouteError::Internal(_) => {
                "Load balancer internal error".to_string()
            }
        }
    }

    /// Short label for metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            RouteError::Rejected { .. } => "gateway_error",
            RouteError::Unreachable { .. } | RouteError::TimedOut { .. } => "unavailable",
            RouteError::InvalidPayload(_) => "invalid_payload",
            RouteError::NoSubstation | RouteError::Internal(_) => "internal_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classes() {
        let rejected = RouteError::Rejected {
            substation: "substation2".into(),
            status: StatusCode::INTERNAL_SERVER_ERROR,
        };
        assert_eq!(rejected.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(rejected.public_message(), "Substation substation2 unavailable");

        let timed_out = RouteError::TimedOut {
            substation: "substation1".into(),
            timeout: Duration::from_secs(10),
        };
        assert_eq!(timed_out.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(timed_out.public_message(), "Selected substation temporarily unavailable");
    }

    #[test]
    fn test_internal_detail_not_exposed() {
        let err = RouteError::Internal("uri parse failure at http://10.0.0.7".into());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), "Load balancer internal error");
        assert!(err.to_string().contains("10.0.0.7"));
    }

    #[test]
    fn test_invalid_payload_is_internal_class() {
        let err = RouteError::InvalidPayload("expected value at line 1 column 2".into());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), "Load balancer internal error");
        assert_eq!(err.outcome(), "invalid_payload");
    }
}
