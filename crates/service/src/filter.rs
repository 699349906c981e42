//! Typed access to the loosely typed filter map carried by `PageRequest`.
//!
//! Query strings deliver every value as a string while JSON bodies and gRPC
//! requests carry numbers, so each reader accepts both. Zero values (`""`,
//! `0`, `[]`, `null`) mean "no filter".

use common::utils::zero::is_zero;
use serde_json::{Map, Value};

use crate::errors::ServiceError;

pub fn int_value(filter: &Map<String, Value>, key: &str) -> Result<Option<i64>, ServiceError> {
    let Some(v) = filter.get(key).filter(|v| !is_zero(v)) else {
        return Ok(None);
    };
    let n = as_i64(v).ok_or_else(|| ServiceError::Validation(format!("{key} must be an integer")))?;
    Ok(Some(n).filter(|n| *n != 0))
}

pub fn string_value(filter: &Map<String, Value>, key: &str) -> Option<String> {
    let v = filter.get(key).filter(|v| !is_zero(v))?;
    let s = match v {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    Some(s).filter(|s| !s.is_empty())
}

/// 支持 JSON 数组与逗号分隔字符串两种写法
pub fn int_list(filter: &Map<String, Value>, key: &str) -> Result<Vec<i64>, ServiceError> {
    let Some(v) = filter.get(key).filter(|v| !is_zero(v)) else {
        return Ok(Vec::new());
    };
    let invalid = || ServiceError::Validation(format!("{key} must be a list of integers"));
    match v {
        Value::Array(items) => items.iter().map(|i| as_i64(i).ok_or_else(invalid)).collect(),
        Value::String(s) => s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<i64>().map_err(|_| invalid()))
            .collect(),
        other => as_i64(other).map(|n| vec![n]).ok_or_else(invalid),
    }
}

fn as_i64(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
