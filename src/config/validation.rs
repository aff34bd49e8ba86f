//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Substation names unique, URLs plain http
//! - Validate value ranges (intervals and timeouts > 0, finite penalty)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RouterConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::RouterConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("at least one substation must be configured")]
    NoSubstations,

    #[error("duplicate substation name '{0}'")]
    DuplicateSubstation(String),

    #[error("substation '{name}' has an invalid url: {reason}")]
    InvalidUrl { name: String, reason: String },

    #[error("substation '{name}' uses unsupported scheme '{scheme}' (only http)")]
    UnsupportedScheme { name: String, scheme: String },

    #[error("invalid bind address '{0}'")]
    InvalidBindAddress(String),

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("penalty load must be a finite, non-negative number (got {0})")]
    InvalidPenalty(f64),

    #[error("{field} must start with '/' (got '{value}')")]
    InvalidPath { field: &'static str, value: String },

    #[error("sampler.load_metric must not be empty")]
    EmptyMetricKey,
}

/// Validate a parsed configuration, collecting every problem found.
pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }
    if config.listener.max_body_bytes == 0 {
        errors.push(ValidationError::Zero("listener.max_body_bytes"));
    }

    if config.substations.is_empty() {
        errors.push(ValidationError::NoSubstations);
    }
    let mut seen = HashSet::new();
    for substation in &config.substations {
        if !seen.insert(substation.name.as_str()) {
            errors.push(ValidationError::DuplicateSubstation(substation.name.clone()));
        }
        match Url::parse(&substation.url) {
            Ok(url) if url.scheme() != "http" => errors.push(ValidationError::UnsupportedScheme {
                name: substation.name.clone(),
                scheme: url.scheme().to_string(),
            }),
            Ok(_) => {}
            Err(e) => errors.push(ValidationError::InvalidUrl {
                name: substation.name.clone(),
                reason: e.to_string(),
            }),
        }
    }

    let sampler = &config.sampler;
    if sampler.interval_secs == 0 {
        errors.push(ValidationError::Zero("sampler.interval_secs"));
    }
    if sampler.timeout_secs == 0 {
        errors.push(ValidationError::Zero("sampler.timeout_secs"));
    }
    if !sampler.penalty_load.is_finite() || sampler.penalty_load < 0.0 {
        errors.push(ValidationError::InvalidPenalty(sampler.penalty_load));
    }
    if sampler.load_metric.trim().is_empty() {
        errors.push(ValidationError::EmptyMetricKey);
    }
    check_path(&mut errors, "sampler.metrics_path", &sampler.metrics_path);

    let forward = &config.forward;
    if forward.timeout_secs == 0 {
        errors.push(ValidationError::Zero("forward.timeout_secs"));
    }
    if forward.max_response_bytes == 0 {
        errors.push(ValidationError::Zero("forward.max_response_bytes"));
    }
    check_path(&mut errors, "forward.path", &forward.path);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_path(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if !value.starts_with('/') {
        errors.push(ValidationError::InvalidPath {
            field,
            value: value.to_string(),
        });
    }
}
