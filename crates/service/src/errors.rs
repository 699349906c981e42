use models::errors::{is_duplicate_entry, ModelError};
use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    /// 唯一索引冲突，消息直接返回给调用方
    #[error("{0}")]
    Duplicate(String),
    #[error("database error: {0}")]
    Db(String),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }
}

impl From<ModelError> for ServiceError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::Validation(m) => ServiceError::Validation(m),
            ModelError::Duplicate(m) => ServiceError::Duplicate(m),
            ModelError::Db(m) => ServiceError::Db(m),
        }
    }
}

impl From<DbErr> for ServiceError {
    fn from(e: DbErr) -> Self {
        if is_duplicate_entry(&e) {
            ServiceError::Duplicate(e.to_string())
        } else {
            ServiceError::Db(e.to_string())
        }
    }
}
