//! Outbound HTTP client shared by the sampler and the forwarder.

use axum::body::Body;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};

/// Pooled plain-HTTP client used for every substation call.
pub type UpstreamClient = Client<HttpConnector, Body>;

/// Build the upstream client. Deadlines are applied per call, not here.
pub fn upstream_client() -> UpstreamClient {
    let mut connector = HttpConnector::new();
    connector.set_nodelay(true);
    Client::builder(TokioExecutor::new()).build(connector)
}
