//! HTTP response envelope and business error codes.
//!
//! Every JSON response has the shape `{"code": .., "message": .., "data": ..}`.
//! `data` is never `null`; responses without a payload carry `{}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use tracing::error;

/// 系统级业务码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum BusinessCode {
    Success = 0,
    ServerError = 10001,
    TooManyRequests = 10002,
    AuthorizationError = 10003,
    ParamBindError = 10004,
    NotFound = 10005,
}

impl BusinessCode {
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn text(self) -> &'static str {
        match self {
            BusinessCode::Success => "",
            BusinessCode::ServerError => "服务器错误",
            BusinessCode::TooManyRequests => "请求发送过多",
            BusinessCode::AuthorizationError => "鉴权失败",
            BusinessCode::ParamBindError => "请检查参数是否正确",
            BusinessCode::NotFound => "资源不存在",
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        Some(match code {
            0 => BusinessCode::Success,
            10001 => BusinessCode::ServerError,
            10002 => BusinessCode::TooManyRequests,
            10003 => BusinessCode::AuthorizationError,
            10004 => BusinessCode::ParamBindError,
            10005 => BusinessCode::NotFound,
            _ => return None,
        })
    }
}

/// Business code of a finished response, stored in the response extensions
/// so that access logging and metrics can read it without parsing the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseCode(pub i32);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonResponse<T = Value> {
    pub code: i32,
    pub message: String,
    pub data: T,
}

impl JsonResponse<Value> {
    pub fn empty() -> Self {
        Self { code: BusinessCode::Success.code(), message: String::new(), data: empty_data() }
    }

    /// 成功响应；payload 序列化为 `null` 时替换为 `{}`
    pub fn from_payload<T: Serialize>(payload: &T) -> Result<Self, serde_json::Error> {
        let data = match serde_json::to_value(payload)? {
            Value::Null => empty_data(),
            v => v,
        };
        Ok(Self { code: BusinessCode::Success.code(), message: String::new(), data })
    }

    pub fn from_error(err: &ApiError) -> Self {
        Self { code: err.business_code().code(), message: err.message().to_string(), data: empty_data() }
    }
}

fn empty_data() -> Value {
    Value::Object(Map::new())
}

/// 封装返回错误（HTTP 状态码 + 业务码 + 描述信息 + 原始错误）
#[derive(Debug)]
pub struct ApiError {
    http_code: u16,
    business_code: BusinessCode,
    message: String,
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

#[derive(Serialize)]
struct ErrorDetail<'a> {
    http_code: u16,
    business_code: i32,
    message: &'a str,
}

impl ApiError {
    pub fn new(http_code: u16, business_code: BusinessCode, message: impl Into<String>) -> Self {
        Self { http_code, business_code, message: message.into(), source: None }
    }

    pub fn with_status_ok(business_code: BusinessCode, message: impl Into<String>) -> Self {
        Self::new(StatusCode::OK.as_u16(), business_code, message)
    }

    pub fn auto_msg(http_code: u16, business_code: BusinessCode) -> Self {
        Self::new(http_code, business_code, business_code.text())
    }

    pub fn with_status_ok_auto_msg(business_code: BusinessCode) -> Self {
        Self::auto_msg(StatusCode::OK.as_u16(), business_code)
    }

    pub fn with_source<E>(mut self, err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    {
        self.source = Some(err.into());
        self
    }

    pub fn server_error() -> Self {
        Self::auto_msg(StatusCode::INTERNAL_SERVER_ERROR.as_u16(), BusinessCode::ServerError)
    }

    pub fn param_bind(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST.as_u16(), BusinessCode::ParamBindError, message)
    }

    pub fn unauthorized() -> Self {
        Self::auto_msg(StatusCode::UNAUTHORIZED.as_u16(), BusinessCode::AuthorizationError)
    }

    pub fn too_many_requests() -> Self {
        Self::auto_msg(StatusCode::TOO_MANY_REQUESTS.as_u16(), BusinessCode::TooManyRequests)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND.as_u16(), BusinessCode::NotFound, message)
    }

    pub fn http_code(&self) -> u16 {
        self.http_code
    }

    /// 非法或为 0 的 HTTP 状态码按 500 处理
    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.http_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn business_code(&self) -> BusinessCode {
        self.business_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn to_json_string(&self) -> String {
        let detail = ErrorDetail {
            http_code: self.http_code,
            business_code: self.business_code.code(),
            message: &self.message,
        };
        serde_json::to_string(&detail).unwrap_or_default()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_json_string())
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_deref().map(|e| e as &(dyn std::error::Error + 'static))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            match &self.source {
                Some(src) => error!(error = %self, source = %src, "request failed"),
                None => error!(error = %self, "request failed"),
            }
        }
        let body = JsonResponse::from_error(&self);
        let mut resp = (status, Json(body)).into_response();
        resp.extensions_mut().insert(ResponseCode(self.business_code.code()));
        resp
    }
}
