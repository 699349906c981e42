use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::ServiceError;
use crate::filter;

pub const COLUMN_ID: &str = "id";
pub const COLUMN_NAME: &str = "name";
pub const COLUMN_DESC: &str = "desc";
pub const COLUMN_COUNT: &str = "count";
pub const COLUMN_CREATE_TIME: &str = "create_time";
/// gRPC 批量查询使用的过滤 key
pub const FILTER_IDS: &str = "ids";

/// 新增商品
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoodsAdd {
    pub name: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub count: i64,
}

/// 更新商品，`None` 的字段保持不变
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GoodsUpdate {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default)]
    pub count: Option<i64>,
}

impl GoodsUpdate {
    pub fn has_changes(&self) -> bool {
        self.name.is_some() || self.desc.is_some() || self.count.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoodsListItem {
    pub id: i64,
    pub name: String,
    pub desc: String,
    pub count: i64,
    pub create_time: i64,
}

impl From<models::goods::Model> for GoodsListItem {
    fn from(m: models::goods::Model) -> Self {
        Self {
            id: i64::from(m.id),
            name: m.name,
            desc: m.desc,
            count: m.count,
            create_time: m.create_time,
        }
    }
}

/// Filters understood by the goods listing; only live rows are ever returned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoodsFilter {
    pub id: Option<i64>,
    /// `LIKE %name%`
    pub name: Option<String>,
    pub ids: Vec<i64>,
}

impl GoodsFilter {
    pub fn from_map(map: &Map<String, Value>) -> Result<Self, ServiceError> {
        Ok(Self {
            id: filter::int_value(map, COLUMN_ID)?,
            name: filter::string_value(map, COLUMN_NAME),
            ids: filter::int_list(map, FILTER_IDS)?,
        })
    }
}

/// Batch query issued by other services over gRPC.
#[derive(Debug, Clone, Default)]
pub struct GoodsQuery {
    pub shop_id: i64,
    pub shop_name: String,
    pub shop_ids: Vec<i64>,
    pub field_list: Vec<String>,
    pub page_no: i64,
    pub page_size: i64,
    pub sort_by: String,
}

/// Columns returned by a gRPC listing besides `id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSelection {
    pub name: bool,
    pub desc: bool,
    pub count: bool,
    pub create_time: bool,
}

impl FieldSelection {
    pub fn all() -> Self {
        Self { name: true, desc: true, count: true, create_time: true }
    }

    /// 空列表表示全部字段；未知字段忽略
    pub fn from_list<S: AsRef<str>>(fields: &[S]) -> Self {
        if fields.is_empty() {
            return Self::all();
        }
        let mut sel = Self { name: false, desc: false, count: false, create_time: false };
        for f in fields {
            match f.as_ref().trim() {
                COLUMN_NAME => sel.name = true,
                COLUMN_DESC => sel.desc = true,
                COLUMN_COUNT => sel.count = true,
                COLUMN_CREATE_TIME => sel.create_time = true,
                _ => {}
            }
        }
        sel
    }

    pub fn apply(&self, item: GoodsListItem) -> GoodsListItem {
        GoodsListItem {
            id: item.id,
            name: if self.name { item.name } else { String::new() },
            desc: if self.desc { item.desc } else { String::new() },
            count: if self.count { item.count } else { 0 },
            create_time: if self.create_time { item.create_time } else { 0 },
        }
    }
}
