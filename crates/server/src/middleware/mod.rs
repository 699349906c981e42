pub mod disable_log;
pub mod jwt;
pub mod rate_limiter;
pub mod telemetry;
