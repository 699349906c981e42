use axum::extract::State;
use common::pagination::{Page, PageRequest};
use common::response::ApiError;
use service::shop::domain::ShopListItem;

use crate::context::{Context, Payload};
use crate::errors::api_error;
use crate::routes::ServerState;

#[utoipa::path(get, path = "/v1/shop/list", tag = "shop",
    params(
        ("pageIndex" = Option<u64>, Query,),
        ("pageSize" = Option<u64>, Query,),
        ("sort" = Option<String>, Query,),
        ("name" = Option<String>, Query,),
    ),
    responses((status = 200, description = "Shop page", body = crate::openapi::ShopPageDoc)))]
pub async fn list(State(state): State<ServerState>, ctx: Context) -> Result<Payload<Page<ShopListItem>>, ApiError> {
    let pr = PageRequest::from_query(ctx.request_input_params().iter().map(|(k, v)| (k.as_str(), v.as_str())));
    let page = state.shop.list(pr).await.map_err(api_error)?;
    Ok(Payload(page))
}
