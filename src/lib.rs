//! Least-loaded request router for a fixed set of substations.
//!
//! A background sampler reads each substation's reported load into a shared
//! table; every work request is forwarded to the substation with the lowest
//! load in that table.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod load_balancer;
pub mod observability;
pub mod routing;
pub mod sampling;

pub use config::schema::RouterConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
