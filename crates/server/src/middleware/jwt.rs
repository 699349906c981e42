use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use common::response::ApiError;
use common::token::Token;
use tracing::warn;

use crate::context::SessionUser;

/// Middleware: require a valid JWT in `Authorization` (optional `Bearer ` prefix)
pub async fn require_jwt(
    State(token): State<Arc<Token>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let raw = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.trim())
        .map(|s| s.strip_prefix("Bearer ").unwrap_or(s).trim())
        .filter(|s| !s.is_empty())
        .ok_or_else(ApiError::unauthorized)?;

    let claims = token.jwt_parse(raw).map_err(|e| {
        warn!(error = %e, "jwt rejected");
        ApiError::unauthorized()
    })?;
    if claims.user_id <= 0 {
        return Err(ApiError::unauthorized());
    }

    req.extensions_mut().insert(SessionUser { user_id: claims.user_id, user_name: claims.user_name });
    Ok(next.run(req).await)
}
