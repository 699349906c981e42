use serde_json::Value;

/// 判断动态值是否为零值：`null`、`false`、`0`、空字符串、空数组与空对象。
pub fn is_zero(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().map(|f| f == 0.0).unwrap_or(false),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

pub fn is_not_zero(value: &Value) -> bool {
    !is_zero(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn zero_values() {
        for v in [json!(null), json!(false), json!(0), json!(0.0), json!(""), json!([]), json!({})] {
            assert!(is_zero(&v), "{v} should be zero");
        }
    }

    #[test]
    fn non_zero_values() {
        for v in [json!(true), json!(1), json!(-3), json!("a"), json!([0]), json!({"a": 0})] {
            assert!(is_not_zero(&v), "{v} should not be zero");
        }
    }
}
