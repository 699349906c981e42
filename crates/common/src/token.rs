//! JWT issuing/parsing and MD5 based URL signing.

use std::collections::BTreeMap;
use std::time::Duration;

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use md5::{Digest, Md5};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// query 转义保留的字符：字母数字与 `-_.~`
const QUERY_ESCAPE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

const ALLOWED_METHODS: [&str; 7] = ["get", "post", "put", "path", "delete", "head", "options"];

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("method param error")]
    Method,
    #[error("token error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "UserID")]
    pub user_id: i64,
    #[serde(rename = "UserName")]
    pub user_name: String,
    pub exp: u64,
    pub iat: u64,
    pub nbf: u64,
}

#[derive(Clone)]
pub struct Token {
    secret: String,
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Token").finish_non_exhaustive()
    }
}

impl Token {
    pub fn new(secret: impl Into<String>) -> Self {
        Self { secret: secret.into() }
    }

    /// HS256 签名，`expire` 为有效期
    pub fn jwt_sign(&self, user_id: i64, user_name: &str, expire: Duration) -> Result<String, TokenError> {
        let now = chrono::Utc::now().timestamp().max(0) as u64;
        let claims = Claims {
            user_id,
            user_name: user_name.to_string(),
            exp: now + expire.as_secs(),
            iat: now,
            nbf: now,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )?;
        Ok(token)
    }

    pub fn jwt_parse(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_nbf = true;
        validation.leeway = 0;
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )?;
        Ok(data.claims)
    }

    /// URL 签名：md5(path + method + sorted(params) + timestamp + secret)
    ///
    /// `path` 不包含 query string；`params` 按 key 排序后做 form 编码。
    pub fn url_sign(
        &self,
        timestamp: i64,
        path: &str,
        method: &str,
        params: &BTreeMap<String, Vec<String>>,
    ) -> Result<String, TokenError> {
        let method = method.to_ascii_lowercase();
        if !ALLOWED_METHODS.contains(&method.as_str()) {
            return Err(TokenError::Method);
        }

        let encoded = params
            .iter()
            .flat_map(|(k, values)| {
                let k = query_escape(k);
                values.iter().map(move |v| format!("{k}={}", query_escape(v)))
            })
            .collect::<Vec<_>>()
            .join("&");

        let raw = format!("{path}{method}{encoded}{timestamp}{}", self.secret);
        Ok(hex::encode(Md5::digest(raw.as_bytes())))
    }
}

/// 空格转成 `+`，其余保留字符外的字节按 `%XX` 转义
fn query_escape(s: &str) -> String {
    // '%' 本身会被转义，输出里的 "%20" 只可能来自空格
    utf8_percent_encode(s, QUERY_ESCAPE).to_string().replace("%20", "+")
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;

    #[test]
    fn jwt_round_trip_keeps_user() {
        let t = Token::new("i1ydX9RtHyuJTrw7frcu");
        let tok = t.jwt_sign(7, "alice", Duration::from_secs(3600)).unwrap();
        let claims = t.jwt_parse(&tok).unwrap();
        assert_eq!(claims.user_id, 7);
        assert_eq!(claims.user_name, "alice");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn jwt_claim_names() {
        let t = Token::new("secret");
        let tok = t.jwt_sign(9, "bob", Duration::from_secs(60)).unwrap();
        let payload = tok.split('.').nth(1).unwrap();
        let raw = base64::engine::general_purpose::URL_SAFE_NO_PAD.decode(payload).unwrap();
        let v: serde_json::Value = serde_json::from_slice(&raw).unwrap();
        assert_eq!(v["UserID"], 9);
        assert_eq!(v["UserName"], "bob");
        assert!(v.get("user_id").is_none());
    }

    #[test]
    fn jwt_with_wrong_secret_is_rejected() {
        let tok = Token::new("a").jwt_sign(1, "bob", Duration::from_secs(60)).unwrap();
        assert!(Token::new("b").jwt_parse(&tok).is_err());
    }

    #[test]
    fn expired_jwt_is_rejected() {
        let t = Token::new("secret");
        let now = chrono::Utc::now().timestamp() as u64;
        let claims = Claims { user_id: 1, user_name: "x".into(), exp: now - 120, iat: now - 240, nbf: now - 240 };
        let tok = encode(&Header::new(Algorithm::HS256), &claims, &EncodingKey::from_secret(b"secret")).unwrap();
        assert!(t.jwt_parse(&tok).is_err());
    }

    #[test]
    fn url_sign_is_deterministic_and_order_independent() {
        let t = Token::new("secret");
        let mut a = BTreeMap::new();
        a.insert("b".to_string(), vec!["2".to_string()]);
        a.insert("a".to_string(), vec!["hello world".to_string()]);
        let s1 = t.url_sign(1579871471, "/v1/list", "GET", &a).unwrap();
        let s2 = t.url_sign(1579871471, "/v1/list", "get", &a).unwrap();
        assert_eq!(s1, s2);
        assert_eq!(s1.len(), 32);

        let expected = hex::encode(Md5::digest(b"/v1/listgeta=hello+world&b=21579871471secret"));
        assert_eq!(s1, expected);
    }

    #[test]
    fn url_sign_escapes_like_query_strings() {
        let t = Token::new("secret");
        let mut params = BTreeMap::new();
        params.insert("a".to_string(), vec!["x~y*".to_string()]);
        // md5("/pgeta=x~y%2A1secret")
        assert_eq!(t.url_sign(1, "/p", "get", &params).unwrap(), "6eabf98e8c7f610e282a906eb8d948f4");

        assert_eq!(query_escape("a b/c&d=é"), "a+b%2Fc%26d%3D%C3%A9");
        assert_eq!(query_escape("100%"), "100%25");
        assert_eq!(query_escape("A-z_0.9~"), "A-z_0.9~");
    }

    #[test]
    fn url_sign_rejects_unknown_method() {
        let t = Token::new("secret");
        let err = t.url_sign(0, "/", "TRACE", &BTreeMap::new()).unwrap_err();
        assert_eq!(err.to_string(), "method param error");
    }
}
