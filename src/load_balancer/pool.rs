//! Substation pool management.
//!
//! # Responsibilities
//! - Own the fixed, ordered substation list
//! - Own the shared load table
//! - Apply the selection strategy against a table snapshot

use std::sync::Arc;

use crate::config::SubstationConfig;
use crate::load_balancer::{
    least_load::LeastLoaded,
    substation::Substation,
    table::{LoadSnapshot, LoadTable},
    LoadBalancer, Selection,
};

/// Manages the substation set, its load table and the selection strategy.
#[derive(Debug)]
pub struct SubstationPool {
    substations: Vec<Arc<Substation>>,
    table: Arc<LoadTable>,
    balancer: Box<dyn LoadBalancer>,
}

impl SubstationPool {
    /// Create a new pool from configuration, selecting by least load.
    pub fn new(configs: &[SubstationConfig], penalty_load: f64) -> Self {
        Self::with_balancer(configs, Box::new(LeastLoaded::new(penalty_load)))
    }

    /// Create a new pool with an explicit selection strategy.
    pub fn with_balancer(configs: &[SubstationConfig], balancer: Box<dyn LoadBalancer>) -> Self {
        let mut substations = Vec::with_capacity(configs.len());
        for config in configs {
            match Substation::new(config.name.clone(), &config.url) {
                Ok(substation) => substations.push(Arc::new(substation)),
                Err(e) => {
                    tracing::warn!(name = %config.name, url = %config.url, error = %e, "Invalid substation url, skipping");
                }
            }
        }

        Self {
            substations,
            table: Arc::new(LoadTable::new()),
            balancer,
        }
    }

    /// Select the substation to route the next request to.
    pub fn pick(&self) -> Option<Selection> {
        let snapshot = self.table.snapshot();
        let selection = self.balancer.select(&self.substations, &snapshot)?;

        match selection.load {
            Some(load) => tracing::info!(
                substation = %selection.substation.name,
                load,
                "Selected substation"
            ),
            None => tracing::info!(
                substation = %selection.substation.name,
                "Selected substation (no load sampled yet)"
            ),
        }
        Some(selection)
    }

    /// All substations in configured order (for sampling).
    pub fn all(&self) -> &[Arc<Substation>] {
        &self.substations
    }

    /// Consistent view of the current loads.
    pub fn snapshot(&self) -> LoadSnapshot {
        self.table.snapshot()
    }

    /// The shared load table.
    pub fn table(&self) -> &Arc<LoadTable> {
        &self.table
    }

    pub fn len(&self) -> usize {
        self.substations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.substations.is_empty()
    }
}
