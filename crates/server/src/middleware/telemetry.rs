use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request, State},
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use common::response::ResponseCode;
use tracing::info;

use crate::context::{TraceId, TRACE_HEADER};
use crate::metrics::Metrics;
use crate::middleware::disable_log::DisableLog;

/// 不计入 metrics 的路径前缀（去掉服务名前缀之后）
const SKIP_PREFIXES: [&str; 4] = ["/metrics", "/debug", "/swagger", "/system"];

/// 未命中任何路由（fallback）时的 path label
pub const UNMATCHED_ROUTE: &str = "unmatched";

#[derive(Clone)]
pub struct Telemetry {
    pub metrics: Arc<Metrics>,
    /// `/{server_name}`
    pub prefix: String,
}

impl Telemetry {
    fn is_skipped(&self, path: &str) -> bool {
        let rest = path.strip_prefix(self.prefix.as_str()).unwrap_or(path);
        SKIP_PREFIXES.iter().any(|p| rest.starts_with(p))
    }
}

fn trace_id_of(req: &Request) -> String {
    req.headers()
        .get(TRACE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}

fn route_label(matched: Option<&MatchedPath>) -> String {
    matched.map_or_else(|| UNMATCHED_ROUTE.to_string(), |m| m.as_str().to_string())
}

/// Middleware: trace id, access log and request metrics
pub async fn access_log(State(t): State<Telemetry>, mut req: Request, next: Next) -> Response {
    let started = Instant::now();
    let trace_id = trace_id_of(&req);
    req.extensions_mut().insert(TraceId(trace_id.clone()));

    let method = req.method().to_string();
    let path = req.uri().path().to_string();
    // 路由模板作为 metrics 的 path label，避免基数膨胀
    let route = route_label(req.extensions().get::<MatchedPath>());

    let mut resp = next.run(req).await;
    let cost = started.elapsed();

    let http_code = resp.status().as_u16();
    let business_code = resp.extensions().get::<ResponseCode>().map_or(0, |c| c.0);
    if let Ok(v) = HeaderValue::from_str(&trace_id) {
        resp.headers_mut().insert(TRACE_HEADER, v);
    }

    if !t.is_skipped(&path) {
        t.metrics.observe_http(&method, &route, http_code, business_code, cost);
    }
    if resp.extensions().get::<DisableLog>().is_none() && !t.is_skipped(&path) {
        info!(
            target: "access",
            %method,
            %path,
            http_code,
            business_code,
            success = http_code == 200 && business_code == 0,
            cost_ms = cost.as_secs_f64() * 1000.0,
            %trace_id,
            "request"
        );
    }
    resp
}
