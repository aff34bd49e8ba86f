//! Periodic load sampling.
//!
//! # Responsibilities
//! - Periodically probe every substation's metrics endpoint
//! - Convert each probe into a load, substituting the penalty on failure
//! - Commit the whole cycle to the load table in one write

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header::USER_AGENT, Method, Request, StatusCode};
use futures_util::future::join_all;
use thiserror::Error;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use crate::config::SamplerConfig;
use crate::http::client::UpstreamClient;
use crate::load_balancer::{Substation, SubstationPool};
use crate::observability::metrics;
use crate::sampling::metrics_text::parse_load;

/// Upper bound on a metrics body; anything larger is treated as a failed probe.
const MAX_METRICS_BYTES: usize = 256 * 1024;

/// Why a probe produced no load.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProbeFailure {
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("connection error: {0}")]
    Connect(String),

    #[error("non-success status {0}")]
    Status(StatusCode),

    #[error("failed to read metrics body: {0}")]
    Read(String),

    #[error("invalid probe request: {0}")]
    Request(String),
}

impl ProbeFailure {
    /// Short label for metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            ProbeFailure::Timeout(_) => "timeout",
            ProbeFailure::Connect(_) => "connect",
            ProbeFailure::Status(_) => "status",
            ProbeFailure::Read(_) => "read",
            ProbeFailure::Request(_) => "request",
        }
    }
}

/// Result of probing one substation once.
#[derive(Debug, Clone, PartialEq)]
pub enum SampleOutcome {
    Load(f64),
    Failed(ProbeFailure),
}

impl SampleOutcome {
    /// The load to record: the sampled value, or `penalty` for a failed probe.
    pub fn load_or(&self, penalty: f64) -> f64 {
        match self {
            SampleOutcome::Load(load) => *load,
            SampleOutcome::Failed(_) => penalty,
        }
    }
}

/// Background task keeping the load table fresh.
pub struct LoadSampler {
    pool: Arc<SubstationPool>,
    config: SamplerConfig,
    client: UpstreamClient,
}

impl LoadSampler {
    pub fn new(pool: Arc<SubstationPool>, config: SamplerConfig, client: UpstreamClient) -> Self {
        Self { pool, config, client }
    }

    /// Start sampling on its own task. The task ends when `shutdown` fires.
    pub fn spawn(self, shutdown: broadcast::Receiver<()>) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }

    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        if !self.config.enabled {
            tracing::info!("Load sampling disabled");
            return;
        }

        tracing::info!(
            interval = self.config.interval_secs,
            path = %self.config.metrics_path,
            substations = self.pool.len(),
            "Load sampler starting"
        );

        let mut ticker = time::interval(Duration::from_secs(self.config.interval_secs));
        // a cycle can take up to the probe timeout; don't burst to catch up
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.sample_once().await;
                }
                _ = shutdown.recv() => {
                    tracing::info!("Load sampler received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    /// Probe every substation concurrently and commit the cycle.
    ///
    /// Returns the loads recorded, in configured order.
    pub async fn sample_once(&self) -> Vec<(String, f64)> {
        let substations = self.pool.all();
        let outcomes = join_all(substations.iter().map(|s| self.probe(s))).await;

        let mut samples = Vec::with_capacity(outcomes.len());
        for (substation, outcome) in substations.iter().zip(outcomes) {
            if let SampleOutcome::Failed(failure) = &outcome {
                tracing::warn!(
                    substation = %substation.name,
                    url = %substation.base_url,
                    error = %failure,
                    "Failed to get load, assuming penalty load"
                );
                metrics::record_probe_failure(&substation.name, failure.reason());
            }

            let load = outcome.load_or(self.config.penalty_load);
            tracing::info!(substation = %substation.name, load, "Substation load sampled");
            metrics::record_substation_load(&substation.name, load);
            samples.push((substation.name.clone(), load));
        }

        self.pool.table().record_cycle(samples.iter().cloned());
        samples
    }

    /// Probe one substation's metrics endpoint within the configured timeout.
    pub async fn probe(&self, substation: &Substation) -> SampleOutcome {
        let request = match substation
            .endpoint(&self.config.metrics_path)
            .map_err(|e| e.to_string())
            .and_then(|uri| {
                Request::builder()
                    .method(Method::GET)
                    .uri(uri)
                    .header(USER_AGENT, "substation-router-sampler")
                    .body(Body::empty())
                    .map_err(|e| e.to_string())
            }) {
            Ok(req) => req,
            Err(e) => return SampleOutcome::Failed(ProbeFailure::Request(e)),
        };

        let exchange = async {
            let response = self
                .client
                .request(request)
                .await
                .map_err(|e| ProbeFailure::Connect(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(ProbeFailure::Status(status));
            }

            let bytes = axum::body::to_bytes(Body::new(response.into_body()), MAX_METRICS_BYTES)
                .await
                .map_err(|e| ProbeFailure::Read(e.to_string()))?;
            Ok(parse_load(&String::from_utf8_lossy(&bytes), &self.config.load_metric))
        };

        let timeout = Duration::from_secs(self.config.timeout_secs);
        match time::timeout(timeout, exchange).await {
            Ok(Ok(load)) => SampleOutcome::Load(load),
            Ok(Err(failure)) => SampleOutcome::Failed(failure),
            Err(_) => SampleOutcome::Failed(ProbeFailure::Timeout(timeout)),
        }
    }
}
