use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::ServiceError;
use crate::filter;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopListItem {
    pub id: i64,
    pub name: String,
    pub desc: String,
    pub count: i64,
    pub create_time: i64,
}

impl From<models::shop::Model> for ShopListItem {
    fn from(m: models::shop::Model) -> Self {
        Self {
            id: i64::from(m.id),
            name: m.name,
            desc: m.desc,
            count: m.count,
            create_time: m.create_time,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShopFilter {
    pub id: Option<i64>,
    pub name: Option<String>,
}

impl ShopFilter {
    pub fn from_map(map: &Map<String, Value>) -> Result<Self, ServiceError> {
        Ok(Self { id: filter::int_value(map, "id")?, name: filter::string_value(map, "name") })
    }
}
