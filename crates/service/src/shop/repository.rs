use async_trait::async_trait;
use common::pagination::SortField;
use models::shop;
use sea_orm::{ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect};

use super::domain::ShopFilter;
use crate::errors::ServiceError;

#[async_trait]
pub trait ShopRepository: Send + Sync {
    async fn list(
        &self,
        filter: &ShopFilter,
        sort: &[SortField],
        limit: u64,
        offset: u64,
    ) -> Result<Vec<shop::Model>, ServiceError>;
    async fn count(&self, filter: &ShopFilter) -> Result<u64, ServiceError>;
}

pub struct SeaOrmShopRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmShopRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

fn condition(filter: &ShopFilter) -> Condition {
    let mut cond = Condition::all();
    if let Some(id) = filter.id {
        cond = cond.add(shop::Column::Id.eq(id));
    }
    if let Some(name) = &filter.name {
        cond = cond.add(shop::Column::Name.contains(name.as_str()));
    }
    cond
}

#[async_trait]
impl ShopRepository for SeaOrmShopRepository {
    async fn list(
        &self,
        filter: &ShopFilter,
        sort: &[SortField],
        limit: u64,
        offset: u64,
    ) -> Result<Vec<shop::Model>, ServiceError> {
        let mut query = shop::Entity::find().filter(condition(filter));
        let mut sorted = false;
        for s in sort.iter().filter(|s| s.field == "create_time") {
            query = if s.desc {
                query.order_by_desc(shop::Column::CreateTime)
            } else {
                query.order_by_asc(shop::Column::CreateTime)
            };
            sorted = true;
        }
        if !sorted {
            query = query.order_by_desc(shop::Column::Id);
        }
        Ok(query.limit(limit).offset(offset).all(&self.db).await?)
    }

    async fn count(&self, filter: &ShopFilter) -> Result<u64, ServiceError> {
        Ok(shop::Entity::find().filter(condition(filter)).count(&self.db).await?)
    }
}
