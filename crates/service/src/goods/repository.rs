use async_trait::async_trait;
use common::pagination::SortField;

use super::domain::{GoodsFilter, GoodsUpdate};
use crate::errors::ServiceError;

/// Repository abstraction for goods persistence.
///
/// Every read only sees live rows (`delete_time = 0`).
#[async_trait]
pub trait GoodsRepository: Send + Sync {
    /// 未给出排序时按 `id DESC`
    async fn list(
        &self,
        filter: &GoodsFilter,
        sort: &[SortField],
        limit: u64,
        offset: u64,
    ) -> Result<Vec<models::goods::Model>, ServiceError>;
    async fn count(&self, filter: &GoodsFilter) -> Result<u64, ServiceError>;
    async fn create(&self, name: &str, desc: &str, count: i64, create_time: i64) -> Result<models::goods::Model, ServiceError>;
    /// Writes only the columns set in `changes`.
    async fn update_columns(&self, id: i32, changes: &GoodsUpdate) -> Result<(), ServiceError>;
    async fn soft_delete(&self, id: i32, now: i64) -> Result<bool, ServiceError>;
    async fn exists(&self, id: i32) -> Result<bool, ServiceError>;
    async fn incr_count(&self, id: i32, n: i64) -> Result<u64, ServiceError>;
}

/// Simple in-memory mock repository for tests, doc examples and benches
pub mod mock {
    use super::*;
    use std::sync::{Mutex, MutexGuard, PoisonError};

    #[derive(Default)]
    pub struct MockGoodsRepository {
        rows: Mutex<Vec<models::goods::Model>>,
    }

    impl MockGoodsRepository {
        fn rows(&self) -> MutexGuard<'_, Vec<models::goods::Model>> {
            self.rows.lock().unwrap_or_else(PoisonError::into_inner)
        }

        fn matches(m: &models::goods::Model, f: &GoodsFilter) -> bool {
            m.delete_time == 0
                && f.id.map_or(true, |id| i64::from(m.id) == id)
                && f.name.as_ref().map_or(true, |n| m.name.contains(n.as_str()))
                && (f.ids.is_empty() || f.ids.contains(&i64::from(m.id)))
        }
    }

    #[async_trait]
    impl GoodsRepository for MockGoodsRepository {
        async fn list(
            &self,
            filter: &GoodsFilter,
            sort: &[SortField],
            limit: u64,
            offset: u64,
        ) -> Result<Vec<models::goods::Model>, ServiceError> {
            let mut out: Vec<_> = self.rows().iter().filter(|m| Self::matches(m, filter)).cloned().collect();
            out.sort_by(|a, b| b.id.cmp(&a.id));
            for s in sort.iter().rev() {
                if s.field == "create_time" {
                    out.sort_by(|a, b| {
                        let ord = a.create_time.cmp(&b.create_time);
                        if s.desc { ord.reverse() } else { ord }
                    });
                }
            }
            Ok(out.into_iter().skip(offset as usize).take(limit as usize).collect())
        }

        async fn count(&self, filter: &GoodsFilter) -> Result<u64, ServiceError> {
            Ok(self.rows().iter().filter(|m| Self::matches(m, filter)).count() as u64)
        }

        async fn create(&self, name: &str, desc: &str, count: i64, create_time: i64) -> Result<models::goods::Model, ServiceError> {
            models::goods::validate_name(name)?;
            models::goods::validate_desc(desc)?;
            let mut rows = self.rows();
            if rows.iter().any(|m| m.name == name) {
                return Err(ServiceError::Duplicate(format!("duplicate goods name {name}")));
            }
            let id = rows.iter().map(|m| m.id).max().unwrap_or(0) + 1;
            let m = models::goods::Model {
                id,
                name: name.to_string(),
                desc: desc.to_string(),
                count,
                create_time,
                delete_time: 0,
            };
            rows.push(m.clone());
            Ok(m)
        }

        async fn update_columns(&self, id: i32, changes: &GoodsUpdate) -> Result<(), ServiceError> {
            let mut rows = self.rows();
            if let Some(name) = &changes.name {
                if rows.iter().any(|m| m.id != id && &m.name == name) {
                    return Err(ServiceError::Duplicate(format!("duplicate goods name {name}")));
                }
            }
            if let Some(m) = rows.iter_mut().find(|m| m.id == id && m.delete_time == 0) {
                if let Some(name) = &changes.name {
                    m.name = name.clone();
                }
                if let Some(desc) = &changes.desc {
                    m.desc = desc.clone();
                }
                if let Some(count) = changes.count {
                    m.count = count;
                }
            }
            Ok(())
        }

        async fn soft_delete(&self, id: i32, now: i64) -> Result<bool, ServiceError> {
            let mut rows = self.rows();
            match rows.iter_mut().find(|m| m.id == id && m.delete_time == 0) {
                Some(m) => {
                    m.delete_time = now;
                    Ok(true)
                }
                None => Ok(false),
            }
        }

        async fn exists(&self, id: i32) -> Result<bool, ServiceError> {
            Ok(self.rows().iter().any(|m| m.id == id && m.delete_time == 0))
        }

        async fn incr_count(&self, id: i32, n: i64) -> Result<u64, ServiceError> {
            let mut rows = self.rows();
            match rows.iter_mut().find(|m| m.id == id) {
                Some(m) => {
                    m.count += n;
                    Ok(1)
                }
                None => Ok(0),
            }
        }
    }
}
