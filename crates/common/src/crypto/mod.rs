//! Thin wrappers around standard cryptographic primitives.
//!
//! 所有接口都以字节或字符串为输入，返回显式的 [`CryptoError`]。

pub mod aes;
pub mod encoding;
pub mod hash;
pub mod rc4;
pub mod rsa;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("invalid key length: {0}")]
    InvalidKeyLength(usize),
    #[error("invalid ciphertext: {0}")]
    InvalidCiphertext(String),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("rsa error: {0}")]
    Rsa(String),
    #[error("invalid utf-8 plaintext")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
