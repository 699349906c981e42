//! Per-request context handed to handlers.
//!
//! Middleware stores the trace id and the authenticated user in the request
//! extensions; `Context` collects them together with the request line so
//! handlers never touch axum internals directly.

use std::convert::Infallible;

use axum::async_trait;
use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::request::Parts;
use axum::http::{HeaderMap, Method, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::response::{ApiError, BusinessCode, JsonResponse, ResponseCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub const TRACE_HEADER: &str = "x-request-id";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceId(pub String);

/// Identity taken from a verified JWT.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub user_id: i64,
    pub user_name: String,
}

#[derive(Debug, Clone)]
pub struct Context {
    trace_id: String,
    user: Option<SessionUser>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    params: Vec<(String, String)>,
}

impl Context {
    pub fn trace_id(&self) -> &str {
        &self.trace_id
    }

    /// 未登录时为 0
    pub fn user_id(&self) -> i64 {
        self.user.as_ref().map_or(0, |u| u.user_id)
    }

    pub fn user_name(&self) -> &str {
        self.user.as_ref().map_or("", |u| u.user_name.as_str())
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    pub fn path(&self) -> &str {
        self.uri.path()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Raw query pairs in request order.
    pub fn request_input_params(&self) -> &[(String, String)] {
        &self.params
    }
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Context {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let trace_id = parts.extensions.get::<TraceId>().map(|t| t.0.clone()).unwrap_or_default();
        let params = Query::<Vec<(String, String)>>::try_from_uri(&parts.uri)
            .map(|Query(p)| p)
            .unwrap_or_default();
        Ok(Self {
            trace_id,
            user: parts.extensions.get::<SessionUser>().cloned(),
            method: parts.method.clone(),
            uri: parts.uri.clone(),
            headers: parts.headers.clone(),
            params,
        })
    }
}

/// 成功响应：`{"code":0,"message":"","data":...}`
pub struct Payload<T>(pub T);

impl<T: Serialize> IntoResponse for Payload<T> {
    fn into_response(self) -> Response {
        match JsonResponse::from_payload(&self.0) {
            Ok(body) => {
                let mut resp = Json(body).into_response();
                resp.extensions_mut().insert(ResponseCode(BusinessCode::Success.code()));
                resp
            }
            Err(e) => ApiError::server_error().with_source(e).into_response(),
        }
    }
}

/// JSON body whose rejections render as `ParamBindError`.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(v)) => Ok(JsonBody(v)),
            Err(rejection) => Err(ApiError::param_bind(rejection.body_text())),
        }
    }
}

/// Typed query string whose rejections render as `ParamBindError`.
pub struct QueryParams<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::try_from_uri(&parts.uri) {
            Ok(Query(v)) => Ok(QueryParams(v)),
            Err(rejection) => Err(ApiError::param_bind(rejection.body_text())),
        }
    }
}
