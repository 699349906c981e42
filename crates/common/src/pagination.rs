//! Paging, filtering and sorting helpers shared by HTTP and gRPC listings.
//!
//! Sort syntax: comma separated fields, a trailing `-` means DESC and a
//! trailing `+` (or nothing) means ASC, e.g. `create_time-,id`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

pub const DEFAULT_PAGE_INDEX: u64 = 1;
pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const MAX_PAGE_SIZE: u64 = 100;

const KEY_PAGE_INDEX: &str = "pageIndex";
const KEY_PAGE_SIZE: &str = "pageSize";
const KEY_SORT: &str = "sort";

#[derive(Debug, Error)]
pub enum PageError {
    #[error("json format error: {0}")]
    InvalidJson(String),
}

/// 分页结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub count: u64,
    pub list: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(count: u64, list: Vec<T>) -> Self {
        Self { count, list }
    }
}

/// 不超过 `i64::MAX`，SQL 驱动按有符号整数绑定 OFFSET
pub fn offset(page_index: u64, page_size: u64) -> u64 {
    page_index.saturating_sub(1).saturating_mul(page_size).min(i64::MAX as u64)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortField {
    pub field: String,
    pub desc: bool,
}

/// 分页加筛选
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageRequest {
    pub page_index: u64,
    pub page_size: u64,
    #[serde(rename = "sort")]
    pub sort_by: String,
    #[serde(default)]
    pub filter: Map<String, Value>,
    #[serde(skip)]
    pub allow_fields: Vec<String>,
}

impl PageRequest {
    pub fn new(page_index: u64, page_size: u64, sort_by: impl Into<String>, filter: Map<String, Value>) -> Self {
        let mut req = Self {
            page_index,
            page_size,
            sort_by: sort_by.into(),
            filter,
            allow_fields: Vec::new(),
        };
        req.check_field();
        req
    }

    /// Build from query/form pairs. Only the first value of a repeated key is kept.
    pub fn from_query<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut page_index = 0;
        let mut page_size = 0;
        let mut sort_by = String::new();
        let mut filter = Map::new();
        for (k, v) in pairs {
            let (k, v) = (k.as_ref(), v.as_ref());
            match k {
                KEY_PAGE_INDEX => page_index = v.trim().parse().unwrap_or(0),
                KEY_PAGE_SIZE => page_size = v.trim().parse().unwrap_or(0),
                KEY_SORT => sort_by = v.to_string(),
                _ => {
                    filter.entry(k.to_string()).or_insert_with(|| Value::String(v.to_string()));
                }
            }
        }
        Self::new(page_index, page_size, sort_by, filter)
    }

    /// Build from a JSON object body. Nested objects, arrays and `null` are
    /// not usable as filters and are skipped.
    pub fn from_json(body: &[u8]) -> Result<Self, PageError> {
        let value: Value = serde_json::from_slice(body).map_err(|e| PageError::InvalidJson(e.to_string()))?;
        let Value::Object(map) = value else {
            return Err(PageError::InvalidJson("top level must be an object".into()));
        };

        let page_index = map.get(KEY_PAGE_INDEX).and_then(json_to_u64).unwrap_or(0);
        let page_size = map.get(KEY_PAGE_SIZE).and_then(json_to_u64).unwrap_or(0);
        let sort_by = match map.get(KEY_SORT) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        };

        let filter = map
            .into_iter()
            .filter(|(k, v)| {
                !matches!(k.as_str(), KEY_PAGE_INDEX | KEY_PAGE_SIZE | KEY_SORT)
                    && !matches!(v, Value::Object(_) | Value::Array(_) | Value::Null)
            })
            .collect();

        Ok(Self::new(page_index, page_size, sort_by, filter))
    }

    fn check_field(&mut self) {
        if self.page_index == 0 {
            self.page_index = DEFAULT_PAGE_INDEX;
        }
        if self.page_size == 0 {
            self.page_size = DEFAULT_PAGE_SIZE;
        }
        self.page_size = self.page_size.min(MAX_PAGE_SIZE);
    }

    /// 排序字段白名单
    pub fn add_allow_sort_field<S: Into<String>>(&mut self, fields: impl IntoIterator<Item = S>) {
        self.allow_fields.extend(fields.into_iter().map(Into::into));
    }

    pub fn limit_and_offset(&self) -> (u64, u64) {
        (self.page_size, offset(self.page_index, self.page_size))
    }

    pub fn sort_fields(&self) -> Vec<SortField> {
        self.sort_by
            .split(',')
            .filter_map(|raw| {
                let raw = raw.trim();
                let (name, desc) = if let Some(name) = raw.strip_suffix('-') {
                    (name, true)
                } else if let Some(name) = raw.strip_suffix('+') {
                    (name, false)
                } else {
                    (raw, false)
                };
                let name = name.trim();
                if name.is_empty() || !self.allow_fields.iter().any(|f| f.trim() == name) {
                    return None;
                }
                Some(SortField { field: name.to_string(), desc })
            })
            .collect()
    }

    /// SQL ORDER BY fragment such as `create_time DESC,id`; `None` when no
    /// whitelisted field remains.
    pub fn sort(&self) -> Option<String> {
        let fields = self.sort_fields();
        if fields.is_empty() {
            return None;
        }
        let parts: Vec<String> = fields
            .into_iter()
            .map(|f| if f.desc { format!("{} DESC", f.field) } else { f.field })
            .collect();
        Some(parts.join(","))
    }

    pub fn filter_value(&self, key: &str) -> Option<&Value> {
        self.filter.get(key)
    }
}

fn json_to_u64(v: &Value) -> Option<u64> {
    match v {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
