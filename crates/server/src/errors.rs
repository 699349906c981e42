use common::response::{ApiError, BusinessCode};
use service::errors::ServiceError;
use thiserror::Error;
use tracing::error;

/// 业务错误到 HTTP 错误的映射
pub fn api_error(e: ServiceError) -> ApiError {
    match e {
        ServiceError::Validation(msg) => ApiError::param_bind(msg),
        ServiceError::NotFound(msg) => ApiError::not_found(msg),
        // 与参数错误同码，但 HTTP 200
        ServiceError::Duplicate(msg) => ApiError::with_status_ok(BusinessCode::ParamBindError, msg),
        ServiceError::Db(msg) => ApiError::server_error().with_source(msg),
    }
}

/// 业务错误到 gRPC 状态的映射
pub fn grpc_status(e: ServiceError) -> tonic::Status {
    match e {
        ServiceError::Validation(msg) | ServiceError::Duplicate(msg) => tonic::Status::invalid_argument(msg),
        ServiceError::NotFound(msg) => tonic::Status::not_found(msg),
        ServiceError::Db(msg) => {
            error!(error = %msg, "grpc call failed");
            tonic::Status::internal(BusinessCode::ServerError.text())
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("metrics registry: {0}")]
    Metrics(#[from] prometheus::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
