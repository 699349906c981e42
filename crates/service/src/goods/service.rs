use std::sync::Arc;

use common::pagination::{Page, PageRequest};
use common::utils::time_parse::now_unix;
use serde_json::{Map, Value};
use tracing::{info, instrument};

use super::domain::{
    FieldSelection, GoodsAdd, GoodsFilter, GoodsListItem, GoodsQuery, GoodsUpdate, COLUMN_CREATE_TIME, COLUMN_ID,
    COLUMN_NAME, FILTER_IDS,
};
use super::repository::GoodsRepository;
use crate::errors::ServiceError;

pub const DUPLICATE_NAME_MESSAGE: &str = "商品名重复";

/// Goods business service independent of web framework
pub struct GoodsService<R: GoodsRepository> {
    repo: Arc<R>,
}

fn goods_id(id: i64) -> Option<i32> {
    i32::try_from(id).ok().filter(|v| *v > 0)
}

fn rename_duplicate(e: ServiceError) -> ServiceError {
    match e {
        ServiceError::Duplicate(_) => ServiceError::Duplicate(DUPLICATE_NAME_MESSAGE.into()),
        other => other,
    }
}

impl<R: GoodsRepository> GoodsService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    /// Page through live goods.
    ///
    /// # Examples
    /// ```
    /// use service::goods::{GoodsService, repository::mock::MockGoodsRepository, domain::GoodsAdd};
    /// use common::pagination::PageRequest;
    /// use std::sync::Arc;
    /// let svc = GoodsService::new(Arc::new(MockGoodsRepository::default()));
    /// tokio_test::block_on(svc.add(GoodsAdd { name: "apple".into(), desc: String::new(), count: 3 })).unwrap();
    /// let page = tokio_test::block_on(svc.list(PageRequest::from_query([("name", "app")]))).unwrap();
    /// assert_eq!(page.count, 1);
    /// assert_eq!(page.list[0].name, "apple");
    /// ```
    #[instrument(skip(self, pr), fields(page_index = pr.page_index, page_size = pr.page_size))]
    pub async fn list(&self, mut pr: PageRequest) -> Result<Page<GoodsListItem>, ServiceError> {
        pr.add_allow_sort_field([COLUMN_CREATE_TIME]);
        let filter = GoodsFilter::from_map(&pr.filter)?;
        let (limit, offset) = pr.limit_and_offset();

        let rows = self.repo.list(&filter, &pr.sort_fields(), limit, offset).await?;
        let count = self.repo.count(&filter).await?;
        Ok(Page::new(count, rows.into_iter().map(GoodsListItem::from).collect()))
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn add(&self, input: GoodsAdd) -> Result<(), ServiceError> {
        let created = self
            .repo
            .create(&input.name, &input.desc, input.count, now_unix())
            .await
            .map_err(rename_duplicate)?;
        info!(goods_id = created.id, "goods_created");
        Ok(())
    }

    #[instrument(skip(self, input), fields(goods_id = input.id))]
    pub async fn update(&self, input: GoodsUpdate) -> Result<(), ServiceError> {
        let id = goods_id(input.id).ok_or_else(|| ServiceError::Validation("id must be positive".into()))?;
        if let Some(name) = &input.name {
            models::goods::validate_name(name)?;
        }
        if let Some(desc) = &input.desc {
            models::goods::validate_desc(desc)?;
        }
        // MySQL 只统计真正变化的行，不能用 rows_affected 判断是否存在
        if !self.repo.exists(id).await? {
            return Err(ServiceError::not_found("goods"));
        }
        self.repo.update_columns(id, &input).await.map_err(rename_duplicate)?;
        Ok(())
    }

    /// 软删除
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let id = goods_id(id).ok_or_else(|| ServiceError::Validation("id must be positive".into()))?;
        if !self.repo.soft_delete(id, now_unix()).await? {
            return Err(ServiceError::not_found("goods"));
        }
        info!(goods_id = id, "goods_deleted");
        Ok(())
    }

    /// Listing used by other services over gRPC. Columns outside
    /// `field_list` come back zeroed; `id` is always filled.
    #[instrument(skip(self, query), fields(shop_id = query.shop_id, page_no = query.page_no))]
    pub async fn grpc_list(&self, query: GoodsQuery) -> Result<Vec<GoodsListItem>, ServiceError> {
        let mut filter = Map::new();
        filter.insert(COLUMN_ID.into(), Value::from(query.shop_id));
        filter.insert(COLUMN_NAME.into(), Value::from(query.shop_name));
        filter.insert(FILTER_IDS.into(), Value::from(query.shop_ids));

        let mut pr = PageRequest::new(
            u64::try_from(query.page_no).unwrap_or(0),
            u64::try_from(query.page_size).unwrap_or(0),
            query.sort_by,
            filter,
        );
        pr.add_allow_sort_field([COLUMN_CREATE_TIME]);
        let goods_filter = GoodsFilter::from_map(&pr.filter)?;
        let (limit, offset) = pr.limit_and_offset();
        let selection = FieldSelection::from_list(&query.field_list);

        let rows = self.repo.list(&goods_filter, &pr.sort_fields(), limit, offset).await?;
        Ok(rows.into_iter().map(|m| selection.apply(GoodsListItem::from(m))).collect())
    }

    /// count = count + n，商品必须存在且未删除
    #[instrument(skip(self))]
    pub async fn incr_count(&self, shop_id: i64, n: i64) -> Result<(), ServiceError> {
        let missing = || ServiceError::NotFound(format!("此商品不在数据库中 {shop_id}"));
        let id = goods_id(shop_id).ok_or_else(missing)?;
        if !self.repo.exists(id).await? {
            return Err(missing());
        }
        self.repo.incr_count(id, n).await?;
        Ok(())
    }
}
