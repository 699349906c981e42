use std::sync::Arc;

use common::pagination::{Page, PageRequest};
use tracing::instrument;

use super::domain::{ShopFilter, ShopListItem};
use super::repository::ShopRepository;
use crate::errors::ServiceError;

pub struct ShopService<R: ShopRepository> {
    repo: Arc<R>,
}

impl<R: ShopRepository> ShopService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    #[instrument(skip(self, pr), fields(page_index = pr.page_index, page_size = pr.page_size))]
    pub async fn list(&self, mut pr: PageRequest) -> Result<Page<ShopListItem>, ServiceError> {
        pr.add_allow_sort_field(["create_time"]);
        let filter = ShopFilter::from_map(&pr.filter)?;
        let (limit, offset) = pr.limit_and_offset();
        let rows = self.repo.list(&filter, &pr.sort_fields(), limit, offset).await?;
        let count = self.repo.count(&filter).await?;
        Ok(Page::new(count, rows.into_iter().map(ShopListItem::from).collect()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shop::repository::SeaOrmShopRepository;
    use crate::test_support::get_db;

    #[tokio::test]
    async fn list_shops_with_filter_and_sort() {
        let db = get_db().await;
        models::shop::create(&db, "flagship", "main", 3, 300).await.unwrap();
        models::shop::create(&db, "outlet", "", 0, 100).await.unwrap();
        models::shop::create(&db, "flagship-2", "", 1, 200).await.unwrap();
        let svc = ShopService::new(Arc::new(SeaOrmShopRepository::new(db)));

        let page = svc.list(PageRequest::from_query(Vec::<(String, String)>::new())).await.unwrap();
        assert_eq!(page.count, 3);
        assert_eq!(page.list[0].name, "flagship-2");

        let page = svc.list(PageRequest::from_query([("name", "flagship"), ("sort", "create_time-")])).await.unwrap();
        assert_eq!(page.count, 2);
        let names: Vec<_> = page.list.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["flagship", "flagship-2"]);

        let page = svc.list(PageRequest::from_query([("pageIndex", "2"), ("pageSize", "2")])).await.unwrap();
        assert_eq!(page.count, 3);
        assert_eq!(page.list.len(), 1);
        assert_eq!(page.list[0].name, "flagship");
    }
}
