pub mod context;
pub mod errors;
pub mod grpc;
pub mod metrics;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod startup;

pub use startup::{run, serve, serve_with_drain, HTTP_DRAIN_TIMEOUT};
