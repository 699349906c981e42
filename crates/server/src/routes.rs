use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{StatusCode, Uri},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, put},
    Router,
};
use common::response::{ApiError, BusinessCode};
use common::token::Token;
use configs::AppConfig;
use sea_orm::DatabaseConnection;
use service::goods::{GoodsService, SeaOrmGoodsRepository};
use service::shop::{SeaOrmShopRepository, ShopService};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{error, Level};

use crate::errors::StartupError;
use crate::metrics::Metrics;
use crate::middleware::{disable_log::disable_log, jwt::require_jwt, rate_limiter, telemetry};

pub mod goods;
pub mod shop;
pub mod system;

pub type GoodsSvc = GoodsService<SeaOrmGoodsRepository>;
pub type ShopSvc = ShopService<SeaOrmShopRepository>;

#[derive(Clone)]
pub struct ServerState {
    pub goods: Arc<GoodsSvc>,
    pub shop: Arc<ShopSvc>,
    pub metrics: Arc<Metrics>,
    /// `None` 时不校验 JWT
    pub jwt: Option<Arc<Token>>,
    pub rate_limiter: Option<rate_limiter::RateLimiter>,
    pub server_name: String,
    pub enable_cors: bool,
}

impl ServerState {
    pub fn new(db: DatabaseConnection, cfg: &AppConfig) -> Result<Self, StartupError> {
        if cfg.jwt.enabled && cfg.jwt.secret.is_empty() {
            return Err(StartupError::InvalidConfig("jwt.secret is empty".into()));
        }
        let metrics = Metrics::new(&cfg.server.metrics_namespace())?;
        let jwt = cfg.jwt.enabled.then(|| Arc::new(Token::new(cfg.jwt.secret.clone())));
        let rate_limiter = cfg
            .server
            .enable_rate
            .then(|| rate_limiter::RateLimiter::new(cfg.server.rate_per_second, cfg.server.rate_burst));
        Ok(Self {
            goods: Arc::new(GoodsService::new(Arc::new(SeaOrmGoodsRepository::new(db.clone())))),
            shop: Arc::new(ShopService::new(Arc::new(SeaOrmShopRepository::new(db)))),
            metrics: Arc::new(metrics),
            jwt,
            rate_limiter,
            server_name: cfg.server.server_name.clone(),
            enable_cors: cfg.server.enable_cors,
        })
    }

    pub fn prefix(&self) -> String {
        format!("/{}", self.server_name)
    }
}

async fn not_found(uri: Uri) -> ApiError {
    ApiError::new(StatusCode::NOT_FOUND.as_u16(), BusinessCode::NotFound, format!("{} {uri}", BusinessCode::NotFound.text()))
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!(panic = detail, "handler panicked");
    ApiError::server_error().into_response()
}

/// Build the full application router; every route lives under `/{server_name}`
pub fn build_router(state: ServerState) -> Router {
    // 运维接口不写访问日志
    let system_routes = Router::new()
        .route("/system/health", get(system::health))
        .route("/metrics", get(system::metrics))
        .route("/api-docs/openapi.json", get(system::openapi))
        .route_layer(middleware::from_fn(disable_log));

    let mut v1 = Router::new()
        .route("/v1/list", get(goods::list))
        .route("/v1/resource", put(goods::add).post(goods::update).delete(goods::delete))
        .route("/v1/shop/list", get(shop::list));
    if let Some(token) = state.jwt.clone() {
        v1 = v1.route_layer(middleware::from_fn_with_state(token, require_jwt));
    }

    let mut app = Router::new().merge(system_routes).merge(v1);
    if let Some(limiter) = state.rate_limiter.clone() {
        app = app.route_layer(middleware::from_fn_with_state(limiter, rate_limiter::limit));
    }

    // 访问日志包住 fallback 与 panic 恢复，404/500 也带 trace id 并计入 metrics
    let t = telemetry::Telemetry { metrics: Arc::clone(&state.metrics), prefix: state.prefix() };
    let mut router = Router::new()
        .nest(&state.prefix(), app)
        .fallback(not_found)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(middleware::from_fn_with_state(t, telemetry::access_log))
        .with_state(state.clone());
    if state.enable_cors {
        router = router.layer(CorsLayer::very_permissive().max_age(Duration::from_secs(12 * 3600)));
    }
    router.layer(
        TraceLayer::new_for_http()
            // 每次请求创建 span，包含方法和路径等，日志级别为 INFO
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
            // 请求到达时打点
            .on_request(DefaultOnRequest::new().level(Level::DEBUG))
            // 响应返回时打点，包含状态码与耗时
            .on_response(DefaultOnResponse::new().level(Level::DEBUG).include_headers(false))
            // 失败（5xx 等）时以 ERROR 记录
            .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    async fn boom() -> &'static str {
        panic!("boom")
    }

    #[tokio::test]
    async fn handler_panic_becomes_server_error() {
        let app = Router::new().route("/boom", get(boom)).layer(CatchPanicLayer::custom(panic_response));
        let resp = app.oneshot(Request::get("/boom").body(Body::empty()).unwrap()).await.unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["code"], 10001);
    }
}
