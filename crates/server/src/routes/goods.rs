use axum::extract::State;
use common::pagination::{Page, PageRequest};
use common::response::ApiError;
use serde::Deserialize;
use service::goods::domain::{GoodsAdd, GoodsListItem, GoodsUpdate};
use tracing::info;

use crate::context::{Context, JsonBody, Payload, QueryParams};
use crate::errors::api_error;
use crate::routes::ServerState;

#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    pub id: i64,
}

#[utoipa::path(get, path = "/v1/list", tag = "goods",
    params(
        ("pageIndex" = Option<u64>, Query, description = "1-based page"),
        ("pageSize" = Option<u64>, Query, description = "default 10, max 100"),
        ("sort" = Option<String>, Query, description = "e.g. create_time-"),
        ("name" = Option<String>, Query, description = "substring match"),
        ("id" = Option<i64>, Query,),
    ),
    responses((status = 200, description = "Goods page", body = crate::openapi::GoodsPageDoc)))]
pub async fn list(State(state): State<ServerState>, ctx: Context) -> Result<Payload<Page<GoodsListItem>>, ApiError> {
    let pr = PageRequest::from_query(ctx.request_input_params().iter().map(|(k, v)| (k.as_str(), v.as_str())));
    let page = state.goods.list(pr).await.map_err(api_error)?;
    Ok(Payload(page))
}

#[utoipa::path(put, path = "/v1/resource", tag = "goods",
    request_body = crate::openapi::GoodsAddDoc,
    responses((status = 200, description = "Created, or business code 10004 when the name exists"), (status = 400, description = "Bad Request")))]
pub async fn add(
    State(state): State<ServerState>,
    ctx: Context,
    JsonBody(input): JsonBody<GoodsAdd>,
) -> Result<Payload<()>, ApiError> {
    info!(trace_id = ctx.trace_id(), user_id = ctx.user_id(), name = %input.name, "goods_add_request");
    state.goods.add(input).await.map_err(api_error)?;
    Ok(Payload(()))
}

#[utoipa::path(post, path = "/v1/resource", tag = "goods",
    request_body = crate::openapi::GoodsUpdateDoc,
    responses((status = 200, description = "Updated"), (status = 400, description = "Bad Request"), (status = 404, description = "Not Found")))]
pub async fn update(
    State(state): State<ServerState>,
    ctx: Context,
    JsonBody(input): JsonBody<GoodsUpdate>,
) -> Result<Payload<()>, ApiError> {
    if input.id <= 0 {
        return Err(ApiError::param_bind("id must be positive"));
    }
    info!(trace_id = ctx.trace_id(), user_id = ctx.user_id(), goods_id = input.id, "goods_update_request");
    state.goods.update(input).await.map_err(api_error)?;
    Ok(Payload(()))
}

#[utoipa::path(delete, path = "/v1/resource", tag = "goods",
    params(("id" = i64, Query,)),
    responses((status = 200, description = "Deleted"), (status = 400, description = "Bad Request"), (status = 404, description = "Not Found")))]
pub async fn delete(
    State(state): State<ServerState>,
    ctx: Context,
    QueryParams(q): QueryParams<DeleteQuery>,
) -> Result<Payload<()>, ApiError> {
    if q.id <= 0 {
        return Err(ApiError::param_bind("id must be positive"));
    }
    info!(trace_id = ctx.trace_id(), user_id = ctx.user_id(), goods_id = q.id, "goods_delete_request");
    state.goods.delete(q.id).await.map_err(api_error)?;
    Ok(Payload(()))
}
