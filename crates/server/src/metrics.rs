use std::time::Duration;

use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};

/// Request metrics of one server instance, kept in its own registry so that
/// several instances (tests) can live in one process.
pub struct Metrics {
    registry: Registry,
    api_requests: IntCounterVec,
    api_cost: HistogramVec,
    grpc_requests: IntCounterVec,
}

impl Metrics {
    /// `namespace` 只能包含 [a-zA-Z0-9_]
    pub fn new(namespace: &str) -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let api_requests = IntCounterVec::new(
            Opts::new("api_requests_total", "HTTP requests by method and path").namespace(namespace),
            &["method", "path"],
        )?;
        let api_cost = HistogramVec::new(
            HistogramOpts::new("api_requests_cost_seconds", "HTTP request latency in seconds").namespace(namespace),
            &["method", "path", "http_code", "business_code"],
        )?;
        let grpc_requests = IntCounterVec::new(
            Opts::new("grpc_requests_total", "gRPC calls by method and status code").namespace(namespace),
            &["method", "code"],
        )?;

        registry.register(Box::new(api_requests.clone()))?;
        registry.register(Box::new(api_cost.clone()))?;
        registry.register(Box::new(grpc_requests.clone()))?;

        Ok(Self { registry, api_requests, api_cost, grpc_requests })
    }

    pub fn observe_http(&self, method: &str, path: &str, http_code: u16, business_code: i32, cost: Duration) {
        self.api_requests.with_label_values(&[method, path]).inc();
        self.api_cost
            .with_label_values(&[method, path, &http_code.to_string(), &business_code.to_string()])
            .observe(cost.as_secs_f64());
    }

    pub fn observe_grpc(&self, method: &str, code: tonic::Code) {
        self.grpc_requests.with_label_values(&[method, &format!("{code:?}")]).inc();
    }

    /// Text exposition format.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_namespaced_series() {
        let m = Metrics::new("seckill_goods").unwrap();
        m.observe_http("GET", "/seckill-goods/v1/list", 200, 0, Duration::from_millis(12));
        m.observe_grpc("List", tonic::Code::Ok);
        let text = m.render().unwrap();
        assert!(text.contains(r#"seckill_goods_api_requests_total{method="GET",path="/seckill-goods/v1/list"} 1"#));
        assert!(text.contains("seckill_goods_api_requests_cost_seconds_bucket"));
        let grpc_line = text
            .lines()
            .find(|l| l.starts_with("seckill_goods_grpc_requests_total{"))
            .unwrap();
        assert!(grpc_line.contains(r#"code="Ok""#) && grpc_line.contains(r#"method="List""#));
        assert!(grpc_line.ends_with(" 1"));
    }

    #[test]
    fn invalid_namespace_is_rejected() {
        assert!(Metrics::new("bad-name").is_err());
    }
}
