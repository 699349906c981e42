//! Byte/text encodings: base64, base32 (standard and human friendly) and hex.

use base64::engine::general_purpose::{STANDARD, URL_SAFE, URL_SAFE_NO_PAD};
use base64::Engine;
use data_encoding::{Encoding as DataEncoding, Specification, BASE32};

use super::CryptoError;

/// 去掉易混淆字符 O 0 I 1 的 base32 字母表
pub const HUMAN_BASE32_ALPHABET: &str = "ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

pub trait Encoding: Send + Sync {
    fn encode_to_string(&self, src: &[u8]) -> String;
    fn decode_string(&self, s: &str) -> Result<Vec<u8>, CryptoError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Base64Variant {
    #[default]
    Standard,
    UrlSafe,
    UrlSafeNoPad,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Base64Encoding {
    variant: Base64Variant,
}

impl Base64Encoding {
    pub fn new(variant: Base64Variant) -> Self {
        Self { variant }
    }
}

impl Encoding for Base64Encoding {
    fn encode_to_string(&self, src: &[u8]) -> String {
        match self.variant {
            Base64Variant::Standard => STANDARD.encode(src),
            Base64Variant::UrlSafe => URL_SAFE.encode(src),
            Base64Variant::UrlSafeNoPad => URL_SAFE_NO_PAD.encode(src),
        }
    }

    fn decode_string(&self, s: &str) -> Result<Vec<u8>, CryptoError> {
        let res = match self.variant {
            Base64Variant::Standard => STANDARD.decode(s),
            Base64Variant::UrlSafe => URL_SAFE.decode(s),
            Base64Variant::UrlSafeNoPad => URL_SAFE_NO_PAD.decode(s),
        };
        res.map_err(|e| CryptoError::Decode(e.to_string()))
    }
}

#[derive(Debug, Clone)]
pub struct Base32Encoding {
    inner: DataEncoding,
}

impl Default for Base32Encoding {
    fn default() -> Self {
        Self { inner: BASE32 }
    }
}

impl Base32Encoding {
    /// 生成的编码中没有 O 0 I 1 这类易混淆字符，且不带 padding
    pub fn human() -> Result<Self, CryptoError> {
        let mut spec = Specification::new();
        spec.symbols.push_str(HUMAN_BASE32_ALPHABET);
        let inner = spec.encoding().map_err(|e| CryptoError::Decode(e.to_string()))?;
        Ok(Self { inner })
    }
}

impl Encoding for Base32Encoding {
    fn encode_to_string(&self, src: &[u8]) -> String {
        self.inner.encode(src)
    }

    fn decode_string(&self, s: &str) -> Result<Vec<u8>, CryptoError> {
        self.inner.decode(s.as_bytes()).map_err(|e| CryptoError::Decode(e.to_string()))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HexEncoding;

impl Encoding for HexEncoding {
    fn encode_to_string(&self, src: &[u8]) -> String {
        hex::encode(src)
    }

    fn decode_string(&self, s: &str) -> Result<Vec<u8>, CryptoError> {
        hex::decode(s).map_err(|e| CryptoError::Decode(e.to_string()))
    }
}
