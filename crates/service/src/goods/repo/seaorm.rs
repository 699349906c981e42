use async_trait::async_trait;
use common::pagination::SortField;
use models::goods;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect};

use crate::errors::ServiceError;
use crate::goods::domain::{GoodsFilter, GoodsUpdate};
use crate::goods::repository::GoodsRepository;

/// SeaORM-backed repository implementation.
pub struct SeaOrmGoodsRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmGoodsRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

fn condition(filter: &GoodsFilter) -> Condition {
    let mut cond = Condition::all().add(goods::Column::DeleteTime.eq(0));
    if let Some(id) = filter.id {
        cond = cond.add(goods::Column::Id.eq(id));
    }
    if let Some(name) = &filter.name {
        cond = cond.add(goods::Column::Name.contains(name.as_str()));
    }
    if !filter.ids.is_empty() {
        cond = cond.add(goods::Column::Id.is_in(filter.ids.iter().copied()));
    }
    cond
}

fn sort_column(field: &str) -> Option<goods::Column> {
    match field {
        "id" => Some(goods::Column::Id),
        "name" => Some(goods::Column::Name),
        "count" => Some(goods::Column::Count),
        "create_time" => Some(goods::Column::CreateTime),
        _ => None,
    }
}

#[async_trait]
impl GoodsRepository for SeaOrmGoodsRepository {
    async fn list(
        &self,
        filter: &GoodsFilter,
        sort: &[SortField],
        limit: u64,
        offset: u64,
    ) -> Result<Vec<goods::Model>, ServiceError> {
        let mut query = goods::Entity::find().filter(condition(filter));
        let mut sorted = false;
        for s in sort {
            if let Some(col) = sort_column(&s.field) {
                query = if s.desc { query.order_by_desc(col) } else { query.order_by_asc(col) };
                sorted = true;
            }
        }
        if !sorted {
            query = query.order_by_desc(goods::Column::Id);
        }
        let rows = query.limit(limit).offset(offset).all(&self.db).await?;
        Ok(rows)
    }

    async fn count(&self, filter: &GoodsFilter) -> Result<u64, ServiceError> {
        let n = goods::Entity::find().filter(condition(filter)).count(&self.db).await?;
        Ok(n)
    }

    async fn create(&self, name: &str, desc: &str, count: i64, create_time: i64) -> Result<goods::Model, ServiceError> {
        Ok(goods::create(&self.db, name, desc, count, create_time).await?)
    }

    async fn update_columns(&self, id: i32, changes: &GoodsUpdate) -> Result<(), ServiceError> {
        if !changes.has_changes() {
            return Ok(());
        }
        let mut update = goods::Entity::update_many()
            .filter(goods::Column::Id.eq(id))
            .filter(goods::Column::DeleteTime.eq(0));
        if let Some(name) = &changes.name {
            update = update.col_expr(goods::Column::Name, Expr::value(name.clone()));
        }
        if let Some(desc) = &changes.desc {
            update = update.col_expr(goods::Column::Desc, Expr::value(desc.clone()));
        }
        if let Some(count) = changes.count {
            update = update.col_expr(goods::Column::Count, Expr::value(count));
        }
        update.exec(&self.db).await?;
        Ok(())
    }

    async fn soft_delete(&self, id: i32, now: i64) -> Result<bool, ServiceError> {
        Ok(goods::soft_delete(&self.db, id, now).await?)
    }

    async fn exists(&self, id: i32) -> Result<bool, ServiceError> {
        Ok(goods::find_live(&self.db, id).await?.is_some())
    }

    async fn incr_count(&self, id: i32, n: i64) -> Result<u64, ServiceError> {
        Ok(goods::incr_count(&self.db, id, n).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{get_db, seed_goods};

    #[tokio::test]
    async fn list_filters_sorts_and_pages() {
        let db = get_db().await;
        seed_goods(&db, &[("apple", 1, 300), ("banana", 2, 100), ("pineapple", 3, 200)]).await;
        let repo = SeaOrmGoodsRepository::new(db);

        let all = repo.list(&GoodsFilter::default(), &[], 10, 0).await.unwrap();
        let names: Vec<_> = all.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["pineapple", "banana", "apple"]);

        let by_name = GoodsFilter { name: Some("apple".into()), ..Default::default() };
        assert_eq!(repo.count(&by_name).await.unwrap(), 2);

        let sort = [SortField { field: "create_time".into(), desc: false }];
        let page = repo.list(&GoodsFilter::default(), &sort, 2, 1).await.unwrap();
        let names: Vec<_> = page.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["pineapple", "apple"]);
    }

    #[tokio::test]
    async fn ids_filter_and_soft_deleted_rows() {
        let db = get_db().await;
        let rows = seed_goods(&db, &[("a", 1, 1), ("b", 1, 2), ("c", 1, 3)]).await;
        let repo = SeaOrmGoodsRepository::new(db);
        assert!(repo.soft_delete(rows[1].id, 99).await.unwrap());

        let f = GoodsFilter { ids: vec![i64::from(rows[0].id), i64::from(rows[1].id)], ..Default::default() };
        let got = repo.list(&f, &[], 10, 0).await.unwrap();
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].id, rows[0].id);
        assert_eq!(repo.count(&f).await.unwrap(), 1);
        assert!(!repo.exists(rows[1].id).await.unwrap());
    }

    #[tokio::test]
    async fn update_columns_touches_only_given_fields() {
        let db = get_db().await;
        let rows = seed_goods(&db, &[("a", 5, 1), ("b", 1, 2)]).await;
        let repo = SeaOrmGoodsRepository::new(db.clone());

        let changes = GoodsUpdate { id: i64::from(rows[0].id), desc: Some("fresh".into()), ..Default::default() };
        repo.update_columns(rows[0].id, &changes).await.unwrap();
        let m = goods::find_live(&db, rows[0].id).await.unwrap().unwrap();
        assert_eq!((m.name.as_str(), m.desc.as_str(), m.count), ("a", "fresh", 5));

        let dup = GoodsUpdate { id: i64::from(rows[0].id), name: Some("b".into()), ..Default::default() };
        let err = repo.update_columns(rows[0].id, &dup).await.unwrap_err();
        assert!(matches!(err, ServiceError::Duplicate(_)), "{err:?}");
    }
}
