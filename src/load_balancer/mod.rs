//! Load balancing subsystem.
//!
//! # Data Flow
//! ```text
//! Sampler cycle → table.rs (one write window per cycle)
//!
//! Work request
//!     → pool.rs (snapshot the table)
//!     → least_load.rs (pick the minimum, earliest wins ties)
//!     → Selection handed to the forwarder
//! ```
//!
//! # Design Decisions
//! - Strategy is stateless; the pool owns the substations and the table
//! - Cold start (empty table) routes to the first configured substation
//! - Unsampled substations are treated as carrying the penalty load

use std::sync::Arc;

pub mod least_load;
pub mod pool;
pub mod substation;
pub mod table;

pub use least_load::LeastLoaded;
pub use pool::SubstationPool;
pub use substation::Substation;
pub use table::{LoadSnapshot, LoadTable};

/// Result of a selection: the chosen substation and the load it was chosen at.
#[derive(Debug, Clone)]
pub struct Selection {
    pub substation: Arc<Substation>,
    /// `None` when the table was empty (cold start).
    pub load: Option<f64>,
}

/// Selection strategy over a consistent load snapshot.
pub trait LoadBalancer: Send + Sync + std::fmt::Debug {
    /// Returns `None` only when `substations` is empty.
    fn select(&self, substations: &[Arc<Substation>], loads: &LoadSnapshot) -> Option<Selection>;
}
