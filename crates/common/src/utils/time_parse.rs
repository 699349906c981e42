//! 时间格式化工具，统一使用中国标准时间（Asia/Shanghai, UTC+8）。
//!
//! Asia/Shanghai 自 1991 年起不再使用夏令时，因此以固定偏移表示。

use chrono::{DateTime, FixedOffset, NaiveDateTime, Offset, TimeZone, Utc};
use thiserror::Error;

/// China Standard Time layout, e.g. `2020-01-24 21:11:11`
pub const CST_LAYOUT: &str = "%Y-%m-%d %H:%M:%S";

/// HTTP date layout, e.g. `Fri, 24 Jan 2020 13:11:11 GMT`
pub const GMT_LAYOUT: &str = "%a, %d %b %Y %H:%M:%S GMT";

const CST_OFFSET_SECS: i32 = 8 * 3600;

#[derive(Debug, Error)]
pub enum TimeParseError {
    #[error("invalid time value: {0}")]
    Invalid(String),
    #[error(transparent)]
    Parse(#[from] chrono::ParseError),
}

pub fn cst() -> FixedOffset {
    FixedOffset::east_opt(CST_OFFSET_SECS).unwrap_or_else(|| Utc.fix())
}

/// 返回当前时间的 `2006-01-02 15:04:05` 格式
pub fn cst_layout_string() -> String {
    Utc::now().with_timezone(&cst()).format(CST_LAYOUT).to_string()
}

pub fn parse_cst_in_location(date: &str) -> Result<DateTime<FixedOffset>, TimeParseError> {
    let naive = NaiveDateTime::parse_from_str(date.trim(), CST_LAYOUT)?;
    cst()
        .from_local_datetime(&naive)
        .single()
        .ok_or_else(|| TimeParseError::Invalid(date.to_string()))
}

/// `2020-11-08T08:18:46+08:00` => `2020-11-08 08:18:46`
pub fn rfc3339_to_cst_layout(value: &str) -> Result<String, TimeParseError> {
    let ts = DateTime::parse_from_rfc3339(value.trim())?;
    Ok(ts.with_timezone(&cst()).format(CST_LAYOUT).to_string())
}

/// `2020-01-24 21:11:11` => `1579871471`
pub fn cst_layout_string_to_unix(value: &str) -> Result<i64, TimeParseError> {
    Ok(parse_cst_in_location(value)?.timestamp())
}

/// `1579871471` => `2020-01-24 21:11:11`
pub fn unix_to_cst_layout_string(value: i64) -> Result<String, TimeParseError> {
    let ts = DateTime::from_timestamp(value, 0)
        .ok_or_else(|| TimeParseError::Invalid(value.to_string()))?;
    Ok(ts.with_timezone(&cst()).format(CST_LAYOUT).to_string())
}

pub fn gmt_layout_string() -> String {
    Utc::now().format(GMT_LAYOUT).to_string()
}

pub fn parse_gmt_in_location(date: &str) -> Result<DateTime<FixedOffset>, TimeParseError> {
    let naive = NaiveDateTime::parse_from_str(date.trim(), GMT_LAYOUT)?;
    Ok(Utc.from_utc_datetime(&naive).with_timezone(&cst()))
}

/// 当前 unix 时间戳（秒）
pub fn now_unix() -> i64 {
    Utc::now().timestamp()
}
