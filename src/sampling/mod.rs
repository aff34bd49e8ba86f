//! Load sampling subsystem.
//!
//! # Data Flow
//! ```text
//! Periodic timer
//!     → sampler.rs (probe every substation concurrently, bounded by timeout)
//!     → metrics_text.rs (extract the load line from the metrics body)
//!     → failed probe → penalty load
//!     → load table (single write per cycle)
//! ```
//!
//! # Design Decisions
//! - Probe failures never stop the loop and never leave an entry stale
//! - A missing or unparseable metric reads as 0.0, not as a failure
//! - The table lock is only held to commit a finished cycle

pub mod metrics_text;
pub mod sampler;

pub use metrics_text::parse_load;
pub use sampler::{LoadSampler, ProbeFailure, SampleOutcome};
