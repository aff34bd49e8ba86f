//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (assign / keep request ID)
//!     → handlers.rs (/route, /status, /health)
//!     → response.rs (JSON envelopes)
//!     → Send to client
//!
//! Outbound:
//!     client.rs (pooled hyper client for probes and forwards)
//! ```

pub mod client;
pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use response::{ErrorEnvelope, HealthReport, StatusReport, SuccessEnvelope};
pub use server::{AppState, HttpServer};
