//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → shutdown.rs trigger
//!
//! Shutdown (shutdown.rs):
//!     broadcast → load sampler exits its loop
//!               → HTTP server stops accepting and drains
//! ```
//!
//! # Design Decisions
//! - Every long-running task subscribes to one broadcast channel
//! - In-flight forwards are not cancelled; they finish or hit their deadline

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
pub use signals::wait_for_signal;
