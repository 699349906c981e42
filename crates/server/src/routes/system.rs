use axum::{extract::State, http::header, response::IntoResponse, Json};
use common::response::ApiError;
use common::utils::time_parse::cst_layout_string;
use serde::Serialize;
use utoipa::OpenApi;

use crate::context::Payload;
use crate::openapi::ApiDoc;
use crate::routes::ServerState;

#[derive(Debug, Serialize)]
pub struct Health {
    pub timestamp: String,
    pub host: String,
    pub status: &'static str,
}

fn host_name() -> String {
    std::env::var("HOSTNAME").ok().filter(|h| !h.is_empty()).unwrap_or_else(|| "localhost".to_string())
}

#[utoipa::path(get, path = "/system/health", tag = "system", responses((status = 200, description = "OK", body = crate::openapi::HealthDoc)))]
pub async fn health() -> Payload<Health> {
    Payload(Health { timestamp: cst_layout_string(), host: host_name(), status: "ok" })
}

pub async fn metrics(State(state): State<ServerState>) -> Result<impl IntoResponse, ApiError> {
    let body = state.metrics.render().map_err(|e| ApiError::server_error().with_source(e))?;
    Ok(([(header::CONTENT_TYPE, "text/plain; version=0.0.4")], body))
}

pub async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
