use std::path::Path;

use md5::Md5;
use rand::RngCore;
use sha1::Sha1;
use sha2::{Digest, Sha256};

use super::encoding::{Encoding, HexEncoding};
use super::CryptoError;

/// 32 位小写 md5
pub fn md5(s: &str) -> String {
    hex::encode(Md5::digest(s.as_bytes()))
}

pub fn sha1(s: &str) -> String {
    sha1_with_encoding(s, &HexEncoding)
}

pub fn sha1_with_encoding(s: &str, e: &dyn Encoding) -> String {
    e.encode_to_string(&Sha1::digest(s.as_bytes()))
}

pub fn sha1_file_hash(path: impl AsRef<Path>) -> Result<String, CryptoError> {
    let mut file = std::fs::File::open(path)?;
    let mut hasher = Sha1::new();
    std::io::copy(&mut file, &mut hasher)?;
    Ok(hex::encode(hasher.finalize()))
}

pub fn sha256(s: &str) -> String {
    sha256_with_encoding(s, &HexEncoding)
}

pub fn sha256_with_encoding(s: &str, e: &dyn Encoding) -> String {
    e.encode_to_string(&Sha256::digest(s.as_bytes()))
}

/// 8 字节安全随机盐值，hex 编码
pub fn salt() -> String {
    let mut nonce = [0u8; 8];
    rand::rngs::OsRng.fill_bytes(&mut nonce);
    HexEncoding.encode_to_string(&nonce)
}
