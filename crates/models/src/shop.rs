use sea_orm::{entity::prelude::*, ActiveModelTrait, ConnectionTrait, Set};
use serde::{Deserialize, Serialize};

use crate::{errors, goods};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "shop")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    pub desc: String,
    pub count: i64,
    pub create_time: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub async fn create<C: ConnectionTrait>(
    db: &C,
    name: &str,
    desc: &str,
    count: i64,
    create_time: i64,
) -> Result<Model, errors::ModelError> {
    goods::validate_name(name)?;
    goods::validate_desc(desc)?;
    let am = ActiveModel {
        name: Set(name.to_string()),
        desc: Set(desc.to_string()),
        count: Set(count),
        create_time: Set(create_time),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}
