//! AES-128/192/256 in ECB or CBC mode with PKCS#5 padding.
//!
//! CBC ciphertext layout: `iv (16 bytes) || blocks`, the IV is random per call.

use aes::{Aes128, Aes192, Aes256};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyInit, KeyIvInit};
use rand::RngCore;

use super::CryptoError;

const BLOCK_SIZE: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AesKeySize {
    Aes128 = 16,
    Aes192 = 24,
    Aes256 = 32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AesMode {
    Ecb,
    Cbc,
}

impl TryFrom<i32> for AesMode {
    type Error = CryptoError;

    fn try_from(v: i32) -> Result<Self, Self::Error> {
        match v {
            1 => Ok(AesMode::Ecb),
            2 => Ok(AesMode::Cbc),
            other => Err(CryptoError::InvalidCiphertext(format!("unsupported aes mode {other}"))),
        }
    }
}

#[derive(Clone)]
pub struct AesCipher {
    key: Vec<u8>,
}

impl std::fmt::Debug for AesCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AesCipher").field("key_len", &self.key.len()).finish()
    }
}

/// 密钥不足时以 '0' 补齐，超出则截断
pub fn padding_key(key: &str, size: AesKeySize) -> Vec<u8> {
    let n = size as usize;
    let mut out: Vec<u8> = key.as_bytes().iter().copied().take(n).collect();
    out.resize(n, b'0');
    out
}

macro_rules! with_cipher {
    ($key:expr, $cipher:ident => $body:expr) => {
        match $key.len() {
            16 => { type $cipher = Aes128; $body }
            24 => { type $cipher = Aes192; $body }
            32 => { type $cipher = Aes256; $body }
            n => Err(CryptoError::InvalidKeyLength(n)),
        }
    };
}

impl AesCipher {
    pub fn new(key: &str, size: AesKeySize) -> Self {
        Self { key: padding_key(key, size) }
    }

    /// 直接使用给定密钥，长度必须为 16/24/32
    pub fn with_key(key: &[u8]) -> Result<Self, CryptoError> {
        match key.len() {
            16 | 24 | 32 => Ok(Self { key: key.to_vec() }),
            n => Err(CryptoError::InvalidKeyLength(n)),
        }
    }

    pub fn ecb_encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        with_cipher!(self.key, C => {
            let enc = ecb::Encryptor::<C>::new_from_slice(&self.key)
                .map_err(|_| CryptoError::InvalidKeyLength(self.key.len()))?;
            Ok(enc.encrypt_padded_vec_mut::<Pkcs7>(plaintext))
        })
    }

    pub fn ecb_decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        if ciphertext.is_empty() || ciphertext.len() % BLOCK_SIZE != 0 {
            return Err(CryptoError::InvalidCiphertext("length is not a multiple of the block size".into()));
        }
        with_cipher!(self.key, C => {
            let dec = ecb::Decryptor::<C>::new_from_slice(&self.key)
                .map_err(|_| CryptoError::InvalidKeyLength(self.key.len()))?;
            dec.decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
                .map_err(|_| CryptoError::InvalidCiphertext("bad padding".into()))
        })
    }

    pub fn cbc_encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let mut iv = [0u8; BLOCK_SIZE];
        rand::rngs::OsRng.fill_bytes(&mut iv);
        let body = self.cbc_encrypt_with(plaintext, &iv)?;
        let mut out = Vec::with_capacity(BLOCK_SIZE + body.len());
        out.extend_from_slice(&iv);
        out.extend_from_slice(&body);
        Ok(out)
    }

    /// 使用指定 IV 加密，输出不包含 IV
    pub fn cbc_encrypt_with(&self, plaintext: &[u8], iv: &[u8]) -> Result<Vec<u8>, CryptoError> {
        with_cipher!(self.key, C => {
            let enc = cbc::Encryptor::<C>::new_from_slices(&self.key, iv)
                .map_err(|_| CryptoError::InvalidCiphertext("invalid iv length".into()))?;
            Ok(enc.encrypt_padded_vec_mut::<Pkcs7>(plaintext))
        })
    }

    pub fn cbc_decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        if ciphertext.len() < BLOCK_SIZE {
            return Err(CryptoError::InvalidCiphertext("missing iv".into()));
        }
        let (iv, body) = ciphertext.split_at(BLOCK_SIZE);
        self.cbc_decrypt_with(body, iv)
    }

    pub fn cbc_decrypt_with(&self, ciphertext: &[u8], iv: &[u8]) -> Result<Vec<u8>, CryptoError> {
        if ciphertext.is_empty() || ciphertext.len() % BLOCK_SIZE != 0 {
            return Err(CryptoError::InvalidCiphertext("length is not a multiple of the block size".into()));
        }
        with_cipher!(self.key, C => {
            let dec = cbc::Decryptor::<C>::new_from_slices(&self.key, iv)
                .map_err(|_| CryptoError::InvalidCiphertext("invalid iv length".into()))?;
            dec.decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
                .map_err(|_| CryptoError::InvalidCiphertext("bad padding".into()))
        })
    }

    /// 加密并以标准 base64 输出
    pub fn en_base64(&self, src: &str, mode: AesMode) -> Result<String, CryptoError> {
        let out = match mode {
            AesMode::Ecb => self.ecb_encrypt(src.as_bytes())?,
            AesMode::Cbc => self.cbc_encrypt(src.as_bytes())?,
        };
        Ok(STANDARD.encode(out))
    }

    pub fn un_base64(&self, src: &str, mode: AesMode) -> Result<String, CryptoError> {
        let raw = STANDARD.decode(src).map_err(|e| CryptoError::Decode(e.to_string()))?;
        let plain = match mode {
            AesMode::Ecb => self.ecb_decrypt(&raw)?,
            AesMode::Cbc => self.cbc_decrypt(&raw)?,
        };
        Ok(String::from_utf8(plain)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_padded_or_truncated() {
        assert_eq!(padding_key("123456789abcdefghi", AesKeySize::Aes128), b"123456789abcdefg");
        assert_eq!(padding_key("12345678", AesKeySize::Aes192), b"123456780000000000000000");
        assert_eq!(padding_key("12345678", AesKeySize::Aes256).len(), 32);
    }

    #[test]
    fn ecb_matches_fips197_vector() {
        // FIPS-197 C.1 with one extra block of PKCS#7 padding
        let key = hex::decode("000102030405060708090a0b0c0d0e0f").unwrap();
        let plain = hex::decode("00112233445566778899aabbccddeeff").unwrap();
        let aes = AesCipher::with_key(&key).unwrap();
        let out = aes.ecb_encrypt(&plain).unwrap();
        assert_eq!(out.len(), 32);
        assert_eq!(hex::encode(&out[..16]), "69c4e0d86a7b0430d8cdb78070b4c55a");
        assert_eq!(aes.ecb_decrypt(&out).unwrap(), plain);
    }

    #[test]
    fn cbc_prepends_random_iv() {
        for size in [AesKeySize::Aes128, AesKeySize::Aes192, AesKeySize::Aes256] {
            let aes = AesCipher::new("seckill", size);
            let a = aes.en_base64("3sCmQNfp4yu", AesMode::Cbc).unwrap();
            let b = aes.en_base64("3sCmQNfp4yu", AesMode::Cbc).unwrap();
            assert_ne!(a, b);
            assert_eq!(aes.un_base64(&a, AesMode::Cbc).unwrap(), "3sCmQNfp4yu");
            assert_eq!(aes.un_base64(&b, AesMode::Cbc).unwrap(), "3sCmQNfp4yu");
        }
    }

    #[test]
    fn ecb_base64_is_deterministic() {
        let aes = AesCipher::new("qZe60QZFxuirub2e", AesKeySize::Aes192);
        let a = aes.en_base64("3sCmQNfp4yu", AesMode::Ecb).unwrap();
        assert_eq!(a, aes.en_base64("3sCmQNfp4yu", AesMode::Ecb).unwrap());
        assert_eq!(aes.un_base64(&a, AesMode::Ecb).unwrap(), "3sCmQNfp4yu");
    }

    #[test]
    fn rejects_bad_input() {
        assert!(AesCipher::with_key(b"short").is_err());
        let aes = AesCipher::new("k", AesKeySize::Aes128);
        assert!(aes.ecb_decrypt(&[1, 2, 3]).is_err());
        assert!(aes.cbc_decrypt(&[0u8; 8]).is_err());
        assert!(AesMode::try_from(3).is_err());
    }
}
