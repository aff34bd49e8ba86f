//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Work request (JSON body)
//!     → forwarder.rs (decode payload)
//!     → load balancer picks a substation
//!     → forwarder.rs (single POST with deadline)
//!     → Ok(substation response) or error.rs (RouteError)
//!     → http layer renders the envelope
//! ```
//!
//! # Design Decisions
//! - Backend faults are converted to `RouteError` where they occur
//! - Gateway (502) and unavailable (503) are distinct classes
//! - No retries: a failed forward is reported, not replayed

pub mod error;
pub mod forwarder;

pub use error::RouteError;
pub use forwarder::{decode_payload, decode_response, Forwarder};
