use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("duplicate entry: {0}")]
    Duplicate(String),
    #[error("database error: {0}")]
    Db(String),
}

impl From<DbErr> for ModelError {
    fn from(e: DbErr) -> Self {
        if is_duplicate_entry(&e) {
            ModelError::Duplicate(e.to_string())
        } else {
            ModelError::Db(e.to_string())
        }
    }
}

/// 唯一索引冲突（MySQL 1062 / SQLite 2067）
pub fn is_duplicate_entry(e: &DbErr) -> bool {
    matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
