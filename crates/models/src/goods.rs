use sea_orm::sea_query::Expr;
use sea_orm::{entity::prelude::*, ActiveModelTrait, ConnectionTrait, EntityTrait, Set};
use serde::{Deserialize, Serialize};

use crate::errors;

pub const NAME_MAX_LEN: usize = 255;
pub const DESC_MAX_LEN: usize = 500;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "goods")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    pub desc: String,
    pub count: i64,
    /// unix 秒
    pub create_time: i64,
    /// 0 表示未删除
    pub delete_time: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_name(name: &str) -> Result<(), errors::ModelError> {
    if name.trim().is_empty() {
        return Err(errors::ModelError::Validation("name required".into()));
    }
    if name.chars().count() > NAME_MAX_LEN {
        return Err(errors::ModelError::Validation(format!("name longer than {NAME_MAX_LEN}")));
    }
    Ok(())
}

pub fn validate_desc(desc: &str) -> Result<(), errors::ModelError> {
    if desc.chars().count() > DESC_MAX_LEN {
        return Err(errors::ModelError::Validation(format!("desc longer than {DESC_MAX_LEN}")));
    }
    Ok(())
}

pub async fn create<C: ConnectionTrait>(
    db: &C,
    name: &str,
    desc: &str,
    count: i64,
    create_time: i64,
) -> Result<Model, errors::ModelError> {
    validate_name(name)?;
    validate_desc(desc)?;
    let am = ActiveModel {
        name: Set(name.to_string()),
        desc: Set(desc.to_string()),
        count: Set(count),
        create_time: Set(create_time),
        delete_time: Set(0),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}

/// 软删除：写入 delete_time，返回是否命中未删除的记录
pub async fn soft_delete<C: ConnectionTrait>(db: &C, id: i32, now: i64) -> Result<bool, errors::ModelError> {
    let res = Entity::update_many()
        .col_expr(Column::DeleteTime, Expr::value(now))
        .filter(Column::Id.eq(id))
        .filter(Column::DeleteTime.eq(0))
        .exec(db)
        .await?;
    Ok(res.rows_affected > 0)
}

/// count = count + n，不加锁、不开事务
pub async fn incr_count<C: ConnectionTrait>(db: &C, id: i32, n: i64) -> Result<u64, errors::ModelError> {
    let res = Entity::update_many()
        .col_expr(Column::Count, Expr::col(Column::Count).add(n))
        .filter(Column::Id.eq(id))
        .exec(db)
        .await?;
    Ok(res.rows_affected)
}

pub async fn find_live<C: ConnectionTrait>(db: &C, id: i32) -> Result<Option<Model>, errors::ModelError> {
    Ok(Entity::find_by_id(id)
        .filter(Column::DeleteTime.eq(0))
        .one(db)
        .await?)
}
