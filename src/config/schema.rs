//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the router.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the substation router.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Listener configuration (bind address, body limit).
    pub listener: ListenerConfig,

    /// Substations eligible to receive work, in selection order.
    pub substations: Vec<SubstationConfig>,

    /// Load sampling settings.
    pub sampler: SamplerConfig,

    /// Request forwarding settings.
    pub forward: ForwardConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            listener: ListenerConfig::default(),
            substations: default_substations(),
            sampler: SamplerConfig::default(),
            forward: ForwardConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

fn default_substations() -> Vec<SubstationConfig> {
    (1..=3)
        .map(|i| SubstationConfig {
            name: format!("substation{}", i),
            url: format!("http://substation{}:5000", i),
        })
        .collect()
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:5002").
    pub bind_address: String,

    /// Largest accepted request body in bytes.
    pub max_body_bytes: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:5002".to_string(),
            max_body_bytes: 1024 * 1024,
        }
    }
}

/// A single substation.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SubstationConfig {
    /// Unique substation name, reported back to callers.
    pub name: String,

    /// Base URL (e.g., "http://substation1:5000").
    pub url: String,
}

/// Load sampler configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Enable background sampling.
    pub enabled: bool,

    /// Sampling interval in seconds.
    pub interval_secs: u64,

    /// Per-probe timeout in seconds.
    pub timeout_secs: u64,

    /// Path of the plain-text metrics endpoint.
    pub metrics_path: String,

    /// Metric line carrying the load value.
    pub load_metric: String,

    /// Load recorded for a substation whose probe failed.
    pub penalty_load: f64,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: 5,
            timeout_secs: 5,
            metrics_path: "/metrics".to_string(),
            load_metric: "substation_current_load".to_string(),
            penalty_load: 100.0,
        }
    }
}

/// Forwarding configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ForwardConfig {
    /// Path of the work-accepting endpoint on each substation.
    pub path: String,

    /// Forward timeout in seconds (request and response body).
    pub timeout_secs: u64,

    /// Largest substation response body accepted, in bytes.
    pub max_response_bytes: usize,
}

impl Default for ForwardConfig {
    fn default() -> Self {
        Self {
            path: "/charge".to_string(),
            timeout_secs: 10,
            max_response_bytes: 1024 * 1024,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_reference_deployment() {
        let config = RouterConfig::default();
        assert_eq!(config.substations.len(), 3);
        assert_eq!(config.substations[0].name, "substation1");
        assert_eq!(config.substations[2].url, "http://substation3:5000");
        assert_eq!(config.sampler.interval_secs, 5);
        assert_eq!(config.sampler.penalty_load, 100.0);
        assert_eq!(config.forward.timeout_secs, 10);
    }
}
