//! Least-loaded selection strategy.

use std::sync::Arc;

use crate::load_balancer::{substation::Substation, table::LoadSnapshot, LoadBalancer, Selection};

/// Least-loaded selector.
/// Selects the substation with the lowest sampled load.
#[derive(Debug)]
pub struct LeastLoaded {
    /// Load assumed for a substation that has not been sampled yet.
    penalty_load: f64,
}

impl LeastLoaded {
    pub fn new(penalty_load: f64) -> Self {
        Self { penalty_load }
    }
}

impl LoadBalancer for LeastLoaded {
    fn select(&self, substations: &[Arc<Substation>], loads: &LoadSnapshot) -> Option<Selection> {
        let first = substations.first()?;

        // Cold start: nothing sampled yet, stay on the first configured substation
        if loads.is_empty() {
            return Some(Selection {
                substation: first.clone(),
                load: None,
            });
        }

        // Strict `<` keeps the earliest substation on ties
        let mut selected = first;
        let mut min_load = f64::INFINITY;
        for substation in substations {
            let load = loads.get(&substation.name).unwrap_or(self.penalty_load);
            if load < min_load {
                min_load = load;
                selected = substation;
            }
        }

        Some(Selection {
            substation: selected.clone(),
            load: Some(min_load),
        })
    }
}
